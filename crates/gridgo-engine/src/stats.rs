//! Derived maze statistics.

use petgraph::algo::connected_components;
use petgraph::graph::UnGraph;
use serde::{Deserialize, Serialize};

use crate::grid::Maze;
use crate::solve::bfs;
use crate::types::Direction;

/// Summary numbers for a placed maze.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MazeStats {
    /// Cells with exactly one open passage.
    pub dead_ends: usize,
    /// Dead-end density: `dead_ends / cell_count`, in `[0, 1]`.
    pub complexity: f64,
    /// Cells on the shortest start-to-end path, if one exists.
    pub solution_length: Option<usize>,
    /// Shortest path steps divided by the start-to-end Manhattan distance.
    pub tortuosity: Option<f64>,
    /// Whether the passages form a spanning tree.
    pub perfect: bool,
}

impl MazeStats {
    /// Compute every statistic for `maze` at its current placement.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute(maze: &Maze) -> Self {
        let dead_ends = maze.dead_ends();
        let path = bfs(maze).path;
        let solution_length = (!path.is_empty()).then_some(path.len());
        let distance = maze.start().manhattan(maze.end());
        let tortuosity = solution_length
            .filter(|_| distance > 0)
            .map(|len| (len - 1) as f64 / distance as f64);

        Self {
            dead_ends,
            complexity: dead_ends as f64 / maze.cell_count() as f64,
            solution_length,
            tortuosity,
            perfect: is_perfect(maze),
        }
    }
}

/// Build the passage graph: one node per cell (row-major index order),
/// one edge per open internal wall.
#[must_use]
pub fn passage_graph(maze: &Maze) -> UnGraph<(), ()> {
    let mut graph = UnGraph::with_capacity(maze.cell_count(), maze.cell_count());
    let nodes: Vec<_> = (0..maze.cell_count()).map(|_| graph.add_node(())).collect();

    for cell in maze.cells() {
        let at = cell.coord();
        for dir in [Direction::Right, Direction::Bottom] {
            if maze.is_passage(at, dir)
                && let Some(n) = maze.neighbor(at, dir)
                && let (Some(a), Some(b)) = (maze.index(at), maze.index(n))
            {
                graph.add_edge(nodes[a], nodes[b], ());
            }
        }
    }
    graph
}

/// Whether the passage graph is a spanning tree: `cell_count - 1` edges
/// and a single connected component.
#[must_use]
pub fn is_perfect(maze: &Maze) -> bool {
    let graph = passage_graph(maze);
    graph.edge_count() == maze.cell_count() - 1 && connected_components(&graph) == 1
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::generate::{Generator, GeneratorKind};
    use crate::types::Coord;
    use crate::weights::EdgeWeights;

    fn c(row: usize, col: usize) -> Coord {
        Coord::new(row, col)
    }

    #[test]
    fn walled_grid_is_not_perfect() {
        let maze = Maze::new(3, 3).unwrap();
        let stats = MazeStats::compute(&maze);
        assert!(!stats.perfect);
        assert_eq!(stats.dead_ends, 0);
        assert_eq!(stats.solution_length, None);
        assert_eq!(stats.tortuosity, None);
    }

    #[test]
    fn corridor_statistics() {
        // U-shaped corridor: (0,0) -> (0,1) -> (1,1) -> (1,0).
        let mut maze = Maze::new(2, 2).unwrap();
        maze.remove_walls(c(0, 0), c(0, 1));
        maze.remove_walls(c(0, 1), c(1, 1));
        maze.remove_walls(c(1, 1), c(1, 0));
        maze.set_manual_start_end(c(0, 0), c(1, 0)).unwrap();

        let stats = MazeStats::compute(&maze);
        assert!(stats.perfect);
        assert_eq!(stats.dead_ends, 2);
        assert!((stats.complexity - 0.5).abs() < f64::EPSILON);
        assert_eq!(stats.solution_length, Some(4));
        assert!((stats.tortuosity.unwrap() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn cycle_is_not_perfect() {
        let mut maze = Maze::new(2, 2).unwrap();
        maze.remove_walls(c(0, 0), c(0, 1));
        maze.remove_walls(c(0, 1), c(1, 1));
        maze.remove_walls(c(1, 1), c(1, 0));
        maze.remove_walls(c(1, 0), c(0, 0));
        assert_eq!(passage_graph(&maze).edge_count(), 4);
        assert!(!is_perfect(&maze));
    }

    #[test]
    fn generated_mazes_are_perfect() {
        let mut rng = StdRng::seed_from_u64(8);
        for kind in [GeneratorKind::Kruskal, GeneratorKind::Recursive] {
            let mut maze = Maze::new(20, 13).unwrap();
            kind.generate(&mut maze, &EdgeWeights::new(), &mut rng);
            maze.set_random_start_end(&mut rng);
            let stats = MazeStats::compute(&maze);
            assert!(stats.perfect, "{kind}");
            assert!((0.0..=1.0).contains(&stats.complexity));
            assert!(stats.tortuosity.unwrap() >= 1.0);
        }
    }
}
