//! Request/response boundary for generation and solving.
//!
//! These are the shapes a service exchanges with clients as JSON. All
//! validation happens here, before any grid exists, so a failed request
//! never leaves a half-built maze behind.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::diagnostics::{NullClock, generate_with_diagnostics, solve_with_diagnostics};
use crate::grid::Maze;
use crate::solve::Solution;
use crate::stats::MazeStats;
use crate::types::{Coord, EngineConfig, EngineError};
use crate::weights::EdgeWeights;

/// Parameters of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Generator name: `kruskal`, `image` or `recursive`.
    pub algorithm: String,
    /// Encoded source image, required by `image`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<Vec<u8>>,
    /// Requested start cell; must be paired with `end`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Coord>,
    /// Requested end cell; must be paired with `start`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Coord>,
}

impl GenerateRequest {
    /// A request for `algorithm` with no image and random placement.
    #[must_use]
    pub fn new(rows: usize, cols: usize, algorithm: impl Into<String>) -> Self {
        Self {
            rows,
            cols,
            algorithm: algorithm.into(),
            image: None,
            start: None,
            end: None,
        }
    }
}

/// A generated maze with its statistics and persistence weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The maze: `rows`, `cols`, `grid`, `start`, `end`.
    #[serde(flatten)]
    pub maze: Maze,
    /// `dead_ends`, `complexity`, `solution_length`, `tortuosity`, `perfect`.
    #[serde(flatten)]
    pub stats: MazeStats,
    /// Snapshot weights; rebuild with [`MazeSnapshot`](crate::MazeSnapshot).
    pub weights: EdgeWeights,
}

/// A maze to solve and the solver to use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    /// The maze; its shape is validated on deserialization.
    pub maze: Maze,
    /// Solver name: `bfs`, `astar` or `greedy`.
    pub algorithm: String,
}

/// How start and end were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    /// Caller-supplied points were accepted.
    Manual,
    /// No points were supplied.
    Random,
    /// Caller-supplied points were rejected; random placement was used.
    Fallback,
}

/// Place start and end, preferring the requested points.
///
/// Invalid or unpaired points fall back to random placement with a
/// warning; they never fail the request.
pub fn place_start_end<R: Rng>(
    maze: &mut Maze,
    start: Option<Coord>,
    end: Option<Coord>,
    rng: &mut R,
) -> Placement {
    match (start, end) {
        (Some(s), Some(e)) => match maze.set_manual_start_end(s, e) {
            Ok(()) => Placement::Manual,
            Err(err) => {
                tracing::warn!(start = %s, end = %e, error = %err, "falling back to random start/end");
                maze.set_random_start_end(rng);
                Placement::Fallback
            }
        },
        (None, None) => {
            maze.set_random_start_end(rng);
            Placement::Random
        }
        _ => {
            tracing::warn!("start and end must be given together, falling back to random start/end");
            maze.set_random_start_end(rng);
            Placement::Fallback
        }
    }
}

/// Validate a request, generate the maze and place its endpoints.
///
/// Checks run in order: `config`, algorithm name, dimensions against
/// `config.limits`, image presence for `image`, then the vision pipeline.
///
/// # Errors
///
/// Returns the first failing check's error: [`EngineError::InvalidConfig`],
/// [`EngineError::UnsupportedAlgorithm`], [`EngineError::InvalidDimensions`],
/// [`EngineError::MissingImage`], or a vision error
/// ([`EngineError::EmptyInput`], [`EngineError::ImageDecode`]).
pub fn generate<R: Rng>(
    request: &GenerateRequest,
    config: &EngineConfig,
    rng: &mut R,
) -> Result<GenerateResponse, EngineError> {
    generate_with_diagnostics(request, config, rng, &NullClock).map(|(response, _)| response)
}

/// Solve a maze with the named solver.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedAlgorithm`] for an unknown solver.
pub fn solve(request: &SolveRequest) -> Result<Solution, EngineError> {
    solve_with_diagnostics(request, &NullClock).map(|(solution, _)| solution)
}
