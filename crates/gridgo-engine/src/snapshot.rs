//! Sparse persistence form of a generated maze.
//!
//! A snapshot stores dimensions, placement and one weight map. Open
//! internal edges are written as [`PASSAGE_WEIGHT`], which sorts ahead of
//! every other weight, so replaying Kruskal over the map carves exactly
//! the captured passages. Wall annotations ride along in the same map and
//! are patched back after generation.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::generate::kruskal;
use crate::grid::Maze;
use crate::types::{Coord, DimensionLimits, Direction, EngineError};
use crate::weights::{EdgeKey, EdgeWeights, PASSAGE_WEIGHT};

/// Seed for the fill weights of unstored edges during a rebuild. In a
/// perfect maze those edges always stay walls.
const REBUILD_SEED: u64 = 0x6772_6964_676f;

/// Captured maze: enough to rebuild the wall grid and annotations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Start cell.
    pub start: Coord,
    /// End cell.
    pub end: Coord,
    /// Passages and positive wall annotations.
    pub weights: EdgeWeights,
}

impl MazeSnapshot {
    /// Capture a maze.
    ///
    /// Every open internal edge is stored as [`PASSAGE_WEIGHT`] under its
    /// canonical key. Every present wall with a positive annotation keeps
    /// it: internal walls under the canonical key, boundary walls under
    /// their own face.
    #[must_use]
    pub fn capture(maze: &Maze) -> Self {
        let mut weights = EdgeWeights::new();
        for cell in maze.cells() {
            let at = cell.coord();
            for dir in Direction::ALL {
                match maze.neighbor(at, dir) {
                    // Each internal edge is visited from its canonical side only.
                    Some(n) => {
                        let Some(key) = EdgeKey::canonical(at, n) else {
                            continue;
                        };
                        if key.coord() != at {
                            continue;
                        }
                        if maze.is_passage(at, dir) {
                            weights.insert(key, PASSAGE_WEIGHT);
                        } else if cell.wall_weight(dir) > 0 {
                            weights.insert(key, cell.wall_weight(dir));
                        }
                    }
                    None => {
                        if cell.has_wall(dir) && cell.wall_weight(dir) > 0 {
                            weights.insert(EdgeKey::face(at, dir), cell.wall_weight(dir));
                        }
                    }
                }
            }
        }

        Self {
            rows: maze.rows(),
            cols: maze.cols(),
            start: maze.start(),
            end: maze.end(),
            weights,
        }
    }

    /// Rebuild the maze.
    ///
    /// For a snapshot of a perfect maze this reproduces the wall grid,
    /// annotations and placement exactly.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDimensions`] if the stored dimensions
    /// hold fewer than two cells, and [`EngineError::NotOnBoundary`] or
    /// [`EngineError::SameStartEnd`] if the stored placement is invalid.
    pub fn rebuild(&self) -> Result<Maze, EngineError> {
        let mut maze = Maze::with_limits(self.rows, self.cols, DimensionLimits::UNBOUNDED)?;
        let mut rng = StdRng::seed_from_u64(REBUILD_SEED);
        kruskal(&mut maze, &self.weights, &mut rng);
        maze.clear_wall_weights();
        maze.apply_wall_weights(&self.weights);
        maze.set_manual_start_end(self.start, self.end)?;
        Ok(maze)
    }

    /// Number of stored passages.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        self.weights
            .iter()
            .filter(|(_, w)| *w == PASSAGE_WEIGHT)
            .count()
    }
}
