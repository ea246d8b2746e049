//! Pathfinding over a generated maze.
//!
//! Every solver treats the grid as an unweighted, undirected graph in
//! which two cells are joined when both faces of the wall between them are
//! open. Wall weights are never read. Neighbours are always expanded in
//! top, right, bottom, left order, so traces are reproducible.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::grid::Maze;
use crate::types::{Coord, EngineError};

/// Selects which search strategy to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Breadth-first search. Shortest path; explores in rings.
    #[default]
    Bfs,

    /// A* with the Manhattan distance heuristic. Shortest path; explores
    /// towards the goal first.
    Astar,

    /// Greedy best-first on the Manhattan distance alone. Fast, but the
    /// path can be longer than the shortest one.
    Greedy,
}

impl SolverKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 3] = [Self::Bfs, Self::Astar, Self::Greedy];

    /// Name used on the wire and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bfs => "bfs",
            Self::Astar => "astar",
            Self::Greedy => "greedy",
        }
    }
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SolverKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| EngineError::UnsupportedAlgorithm(s.to_string()))
    }
}

/// Result of one search.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Cells in the order the search finalized them.
    pub visited: Vec<Coord>,
    /// Start-to-end path, inclusive. Empty if the end is unreachable.
    pub path: Vec<Coord>,
}

impl Solution {
    /// Whether a path was found.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        !self.path.is_empty()
    }
}

/// Trait for search strategies.
pub trait Solver {
    /// Search from the maze's start to its end.
    fn solve(&self, maze: &Maze) -> Solution;
}

impl Solver for SolverKind {
    fn solve(&self, maze: &Maze) -> Solution {
        let solution = match *self {
            Self::Bfs => bfs(maze),
            Self::Astar => best_first(maze, Priority::PathPlusHeuristic),
            Self::Greedy => best_first(maze, Priority::Heuristic),
        };
        tracing::debug!(
            solver = %self,
            visited = solution.visited.len(),
            path = solution.path.len(),
            "solve complete"
        );
        solution
    }
}

/// Breadth-first search; `visited` is the dequeue order.
#[must_use]
pub fn bfs(maze: &Maze) -> Solution {
    let mut search = Search::new(maze);
    let Some(start) = maze.index(maze.start()) else {
        return Solution::default();
    };
    search.seen[start] = true;
    let mut queue = VecDeque::from([maze.start()]);

    while let Some(at) = queue.pop_front() {
        search.visited.push(at);
        if at == maze.end() {
            return search.finish(maze, at);
        }
        for n in maze.open_neighbors(at) {
            if let Some(i) = maze.index(n)
                && !search.seen[i]
            {
                search.seen[i] = true;
                search.parent[i] = Some(at);
                queue.push_back(n);
            }
        }
    }
    search.unreachable()
}

/// A* search; `visited` is the order cells are popped and closed.
#[must_use]
pub fn astar(maze: &Maze) -> Solution {
    best_first(maze, Priority::PathPlusHeuristic)
}

/// Greedy best-first search; `visited` is the pop order.
#[must_use]
pub fn greedy(maze: &Maze) -> Solution {
    best_first(maze, Priority::Heuristic)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Priority {
    /// `g + h` (A*).
    PathPlusHeuristic,
    /// `h` only (greedy).
    Heuristic,
}

/// Shared priority-queue search.
///
/// Heap entries are `(priority, insertion sequence, cell)`, so equal
/// priorities pop in insertion order. A* re-pushes a cell when it finds a
/// cheaper route; the older entry is skipped when popped. Greedy pushes
/// each cell at most once.
fn best_first(maze: &Maze, priority: Priority) -> Solution {
    let end = maze.end();
    let mut search = Search::new(maze);
    let Some(start) = maze.index(maze.start()) else {
        return Solution::default();
    };

    let mut cost = vec![usize::MAX; maze.cell_count()];
    let mut closed = vec![false; maze.cell_count()];
    let mut heap = BinaryHeap::new();
    let mut seq = 0usize;
    let key = |g: usize, at: Coord| match priority {
        Priority::PathPlusHeuristic => g + at.manhattan(end),
        Priority::Heuristic => at.manhattan(end),
    };

    cost[start] = 0;
    search.seen[start] = true;
    heap.push(Reverse((key(0, maze.start()), seq, maze.start())));

    while let Some(Reverse((_, _, at))) = heap.pop() {
        let Some(i) = maze.index(at) else { continue };
        if closed[i] {
            continue;
        }
        closed[i] = true;
        search.visited.push(at);
        if at == end {
            return search.finish(maze, at);
        }

        let g = cost[i] + 1;
        for n in maze.open_neighbors(at) {
            let Some(j) = maze.index(n) else { continue };
            let improve = match priority {
                Priority::PathPlusHeuristic => !closed[j] && g < cost[j],
                Priority::Heuristic => !search.seen[j],
            };
            if improve {
                cost[j] = g;
                search.seen[j] = true;
                search.parent[j] = Some(at);
                seq += 1;
                heap.push(Reverse((key(g, n), seq, n)));
            }
        }
    }
    search.unreachable()
}

/// Bookkeeping shared by every strategy.
struct Search {
    seen: Vec<bool>,
    parent: Vec<Option<Coord>>,
    visited: Vec<Coord>,
}

impl Search {
    fn new(maze: &Maze) -> Self {
        Self {
            seen: vec![false; maze.cell_count()],
            parent: vec![None; maze.cell_count()],
            visited: Vec::new(),
        }
    }

    /// Walk parent links back from `end` and return the solution.
    fn finish(self, maze: &Maze, end: Coord) -> Solution {
        let mut path = vec![end];
        let mut at = end;
        while let Some(prev) = maze.index(at).and_then(|i| self.parent[i]) {
            path.push(prev);
            at = prev;
        }
        path.reverse();
        Solution {
            visited: self.visited,
            path,
        }
    }

    fn unreachable(self) -> Solution {
        Solution {
            visited: self.visited,
            path: Vec::new(),
        }
    }
}
