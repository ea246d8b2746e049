//! Maze generation: carve a spanning tree into a fully walled grid.
//!
//! Defines the [`Generator`] trait for pluggable strategies and the
//! [`GeneratorKind`] enum for runtime selection by name. Every strategy
//! starts from a freshly reset grid and leaves exactly
//! `cell_count() - 1` walls removed.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::dsu::DisjointSet;
use crate::grid::Maze;
use crate::types::{Coord, Direction, EngineError};
use crate::weights::EdgeWeights;

/// Exclusive upper bound of the random weight given to edges that have
/// no entry in the weight map.
pub const RANDOM_WEIGHT_RANGE: i32 = 100;

/// Selects which generation strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    /// Kruskal's algorithm over uniformly random edge weights.
    #[default]
    Kruskal,

    /// Kruskal's algorithm over weights derived from a source image.
    ///
    /// Edges the vision pipeline marks as structural sort last and tend
    /// to stay walls, so the image's outline shows through the maze.
    Image,

    /// Randomized depth-first search from the top-left cell.
    ///
    /// Produces long, winding corridors with few branches.
    Recursive,
}

impl GeneratorKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 3] = [Self::Kruskal, Self::Image, Self::Recursive];

    /// Name used on the wire and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Kruskal => "kruskal",
            Self::Image => "image",
            Self::Recursive => "recursive",
        }
    }

    /// Whether this strategy needs a source image.
    #[must_use]
    pub const fn needs_image(self) -> bool {
        matches!(self, Self::Image)
    }
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeneratorKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| EngineError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Counts describing one generation run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Walls removed (always `cell_count() - 1`).
    pub removed_walls: usize,
    /// Internal edges considered by Kruskal (zero for depth-first).
    pub candidate_edges: usize,
    /// Candidate edges whose weight came from the weight map.
    pub weighted_edges: usize,
    /// Deepest explicit stack reached by depth-first (zero for Kruskal).
    pub max_depth: usize,
}

/// Trait for generation strategies.
pub trait Generator {
    /// Reset `maze` and carve a spanning tree into it.
    ///
    /// `weights` is consulted only by strategies that use it.
    fn generate<R: Rng>(
        &self,
        maze: &mut Maze,
        weights: &EdgeWeights,
        rng: &mut R,
    ) -> GenerationReport;
}

impl Generator for GeneratorKind {
    fn generate<R: Rng>(
        &self,
        maze: &mut Maze,
        weights: &EdgeWeights,
        rng: &mut R,
    ) -> GenerationReport {
        match *self {
            Self::Kruskal => kruskal(maze, &EdgeWeights::new(), rng),
            Self::Image => kruskal(maze, weights, rng),
            Self::Recursive => carve_depth_first(maze, Coord::new(0, 0), rng),
        }
    }
}

/// A candidate edge between a cell and its lower or right neighbour.
#[derive(Debug, Clone, Copy)]
struct Edge {
    from: Coord,
    dir: Direction,
    weight: i32,
}

/// Kruskal's minimum spanning tree over the cell grid.
///
/// One candidate per down/right adjacency is collected in row-major
/// order. Each takes its weight from `weights` (canonical face first,
/// then the opposite face) or, failing that, a uniform draw from
/// `0..RANDOM_WEIGHT_RANGE`. Candidates are stably sorted by weight and
/// each one joining two components becomes a passage. Edges left as
/// walls are annotated with the weight they were given.
pub fn kruskal<R: Rng>(maze: &mut Maze, weights: &EdgeWeights, rng: &mut R) -> GenerationReport {
    maze.reset();
    let (rows, cols) = (maze.rows(), maze.cols());

    let mut edges = Vec::with_capacity((rows - 1) * cols + rows * (cols - 1));
    let mut weighted_edges = 0;
    for r in 0..rows {
        for c in 0..cols {
            let from = Coord::new(r, c);
            for dir in [Direction::Bottom, Direction::Right] {
                let Some(to) = maze.neighbor(from, dir) else {
                    continue;
                };
                let weight = match weights.edge_weight(from, to) {
                    Some(w) => {
                        weighted_edges += 1;
                        w
                    }
                    None => rng.random_range(0..RANDOM_WEIGHT_RANGE),
                };
                edges.push(Edge { from, dir, weight });
            }
        }
    }
    edges.sort_by_key(|e| e.weight);

    let target = maze.cell_count() - 1;
    let mut dsu = DisjointSet::new(maze.cell_count());
    let mut removed = 0;
    for edge in &edges {
        let to = edge.dir.step(edge.from);
        let ids = to.and_then(|to| Some((maze.index(edge.from)?, maze.index(to)?, to)));
        if let Some((a, b, to)) = ids
            && removed < target
            && dsu.union(a, b)
        {
            maze.remove_walls(edge.from, to);
            removed += 1;
        } else {
            maze.set_edge_weight(edge.from, edge.dir, edge.weight);
        }
    }

    tracing::debug!(
        candidates = edges.len(),
        weighted = weighted_edges,
        removed,
        "kruskal generation complete"
    );
    GenerationReport {
        removed_walls: removed,
        candidate_edges: edges.len(),
        weighted_edges,
        max_depth: 0,
    }
}

/// Randomized depth-first carving ("recursive backtracker") from `origin`.
///
/// # Errors
///
/// Returns [`EngineError::InvalidConfig`] if `origin` is outside the grid.
pub fn recursive_backtracker<R: Rng>(
    maze: &mut Maze,
    origin: Coord,
    rng: &mut R,
) -> Result<GenerationReport, EngineError> {
    if !maze.contains(origin) {
        return Err(EngineError::InvalidConfig(format!(
            "generation origin {origin} is outside the {}x{} grid",
            maze.rows(),
            maze.cols()
        )));
    }
    Ok(carve_depth_first(maze, origin, rng))
}

/// One level of the explicit depth-first stack.
struct Frame {
    at: Coord,
    dirs: [Direction; 4],
    next: usize,
}

impl Frame {
    fn enter<R: Rng>(maze: &mut Maze, at: Coord, rng: &mut R) -> Self {
        if let Some(cell) = maze.cell_mut(at) {
            cell.visited = true;
        }
        let mut dirs = Direction::ALL;
        dirs.shuffle(rng);
        Self { at, dirs, next: 0 }
    }
}

/// Depth-first carving with a heap-allocated stack; `origin` must be
/// inside the grid.
fn carve_depth_first<R: Rng>(maze: &mut Maze, origin: Coord, rng: &mut R) -> GenerationReport {
    maze.reset();
    let mut stack = vec![Frame::enter(maze, origin, rng)];
    let mut removed = 0;
    let mut max_depth = 1;

    while let Some(top) = stack.last_mut() {
        let Some(&dir) = top.dirs.get(top.next) else {
            stack.pop();
            continue;
        };
        top.next += 1;
        let from = top.at;

        let Some(to) = maze.neighbor(from, dir) else {
            continue;
        };
        if maze.cell(to).is_some_and(|c| c.visited) {
            continue;
        }
        maze.remove_walls(from, to);
        removed += 1;
        stack.push(Frame::enter(maze, to, rng));
        max_depth = max_depth.max(stack.len());
    }

    tracing::debug!(removed, max_depth, "depth-first generation complete");
    GenerationReport {
        removed_walls: removed,
        candidate_edges: 0,
        weighted_edges: 0,
        max_depth,
    }
}
