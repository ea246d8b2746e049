//! Integration tests: generate, place, solve and persist mazes through
//! the public API only.

#![allow(clippy::unwrap_used)]

use std::collections::HashSet;

use gridgo_engine::{
    Coord, DimensionLimits, EdgeWeights, EngineConfig, EngineError, GenerateRequest, Generator,
    GeneratorKind, Maze, MazeSnapshot, MazeStats, Solver, SolverKind, generate,
};
use image::{DynamicImage, GrayImage, Luma};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn c(row: usize, col: usize) -> Coord {
    Coord::new(row, col)
}

fn maze(rows: usize, cols: usize, kind: GeneratorKind, seed: u64) -> Maze {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut maze = Maze::with_limits(rows, cols, DimensionLimits::UNBOUNDED).unwrap();
    kind.generate(&mut maze, &EdgeWeights::new(), &mut rng);
    maze.set_random_start_end(&mut rng);
    maze
}

/// Cells reachable from the top-left cell through open passages.
fn reachable(maze: &Maze) -> usize {
    let mut seen = HashSet::from([c(0, 0)]);
    let mut stack = vec![c(0, 0)];
    while let Some(at) = stack.pop() {
        for n in maze.open_neighbors(at) {
            if seen.insert(n) {
                stack.push(n);
            }
        }
    }
    seen.len()
}

#[test]
fn every_generator_builds_a_spanning_tree() {
    for seed in 0..25 {
        for kind in [GeneratorKind::Kruskal, GeneratorKind::Recursive] {
            let rows = 2 + usize::try_from(seed % 7).unwrap();
            let cols = 3 + usize::try_from(seed % 5).unwrap();
            let m = maze(rows, cols, kind, seed);
            assert_eq!(m.removed_wall_count(), rows * cols - 1, "{kind} seed {seed}");
            assert_eq!(reachable(&m), rows * cols, "{kind} seed {seed}");
            assert!(MazeStats::compute(&m).perfect);
        }
    }
}

#[test]
fn shortest_path_solvers_agree() {
    for seed in 0..30 {
        let m = maze(12, 15, GeneratorKind::Kruskal, seed);
        let bfs = SolverKind::Bfs.solve(&m);
        let astar = SolverKind::Astar.solve(&m);
        let greedy = SolverKind::Greedy.solve(&m);

        assert_eq!(bfs.path, astar.path, "seed {seed}");
        assert!(astar.visited.len() <= bfs.visited.len(), "seed {seed}");
        // A perfect maze has exactly one simple path.
        assert_eq!(greedy.path, bfs.path, "seed {seed}");
        assert_eq!(bfs.path.first(), Some(&m.start()));
        assert_eq!(bfs.path.last(), Some(&m.end()));
    }
}

#[test]
fn paths_follow_open_passages() {
    let m = maze(20, 20, GeneratorKind::Recursive, 99);
    for kind in SolverKind::ALL {
        let solution = kind.solve(&m);
        for pair in solution.path.windows(2) {
            assert_eq!(pair[0].manhattan(pair[1]), 1);
            assert!(m.open_neighbors(pair[0]).any(|n| n == pair[1]), "{kind}");
        }
        let unique: HashSet<_> = solution.visited.iter().collect();
        assert_eq!(unique.len(), solution.visited.len(), "{kind} revisited a cell");
    }
}

#[test]
fn snapshot_round_trips_through_json() {
    for seed in 0..10 {
        let kind = if seed % 2 == 0 {
            GeneratorKind::Kruskal
        } else {
            GeneratorKind::Recursive
        };
        let m = maze(8, 11, kind, seed);
        let json = serde_json::to_string(&MazeSnapshot::capture(&m)).unwrap();
        let rebuilt = serde_json::from_str::<MazeSnapshot>(&json)
            .unwrap()
            .rebuild()
            .unwrap();
        for (a, b) in rebuilt.cells().iter().zip(m.cells()) {
            assert_eq!(a.walls, b.walls, "seed {seed}");
            assert_eq!(a.wall_weights, b.wall_weights, "seed {seed}");
        }
        assert_eq!((rebuilt.start(), rebuilt.end()), (m.start(), m.end()));
    }
}

/// Dark square on a white background, PNG-encoded.
fn square_png() -> Vec<u8> {
    let img = GrayImage::from_fn(48, 48, |x, y| {
        let inside = (12..36).contains(&x) && (12..36).contains(&y);
        Luma([if inside { 0 } else { 255 }])
    });
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}

#[test]
fn image_maze_snapshot_round_trips_through_json() {
    let png = square_png();
    for seed in 0..10 {
        let mut request = GenerateRequest::new(16, 16, "image");
        request.image = Some(png.clone());
        let mut rng = StdRng::seed_from_u64(seed);
        let response = generate(&request, &EngineConfig::default(), &mut rng).unwrap();

        let json = serde_json::to_string(&MazeSnapshot::capture(&response.maze)).unwrap();
        let rebuilt = serde_json::from_str::<MazeSnapshot>(&json)
            .unwrap()
            .rebuild()
            .unwrap();
        assert_eq!(rebuilt, response.maze, "seed {seed}");
    }
}

#[test]
fn two_by_two_maze() {
    let mut m = maze(2, 2, GeneratorKind::Kruskal, 7);
    assert_eq!(m.removed_wall_count(), 3);
    assert_eq!(m.dead_ends(), 2);
    assert!(m.is_boundary(m.start()) && m.is_boundary(m.end()));
    assert_ne!(m.start(), m.end());

    // Removing one edge of the 4-cycle always leaves one 3-cell route
    // between opposite corners.
    m.set_manual_start_end(c(0, 0), c(1, 1)).unwrap();
    let solution = SolverKind::Bfs.solve(&m);
    assert_eq!(solution.path.len(), 3);
    assert!(solution.visited.len() <= 4);
}

#[test]
fn one_row_strip_is_a_corridor() {
    let mut m = maze(1, 6, GeneratorKind::Recursive, 3);
    m.set_manual_start_end(c(0, 0), c(0, 5)).unwrap();
    let solution = SolverKind::Bfs.solve(&m);
    assert_eq!(solution.path, (0..6).map(|col| c(0, col)).collect::<Vec<_>>());
    assert_eq!(m.dead_ends(), 2);
}

#[test]
fn manual_placement_errors() {
    let mut m = maze(5, 5, GeneratorKind::Kruskal, 1);
    let before = (m.start(), m.end());
    assert!(matches!(
        m.set_manual_start_end(c(0, 0), c(0, 0)),
        Err(EngineError::SameStartEnd)
    ));
    assert!(matches!(
        m.set_manual_start_end(c(0, 0), c(2, 2)),
        Err(EngineError::NotOnBoundary { row: 2, col: 2 })
    ));
    assert!(matches!(
        m.set_manual_start_end(c(0, 0), c(9, 9)),
        Err(EngineError::NotOnBoundary { row: 9, col: 9 })
    ));
    assert_eq!((m.start(), m.end()), before);
}

#[test]
fn dimension_limits_are_enforced() {
    assert!(matches!(Maze::new(1, 1), Err(EngineError::InvalidDimensions { .. })));
    // Maze::new has a floor but no ceiling; requests add the ceiling.
    assert!(Maze::new(301, 4).is_ok());
    let limits = EngineConfig::default().limits;
    assert!(matches!(
        Maze::with_limits(301, 4, limits),
        Err(EngineError::InvalidDimensions { max: 300, .. })
    ));
    assert!(Maze::with_limits(300, 300, limits).is_ok());
}

#[test]
fn blank_image_behaves_like_kruskal() {
    let white = GrayImage::from_pixel(64, 48, Luma([255]));
    let mut bytes = Vec::new();
    DynamicImage::ImageLuma8(white)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();

    let mut request = GenerateRequest::new(12, 16, "image");
    request.image = Some(bytes);
    let mut rng = StdRng::seed_from_u64(11);
    let response = generate(&request, &EngineConfig::default(), &mut rng).unwrap();
    assert!(response.stats.perfect);
    // No vision weights, so every annotation is a random fill weight.
    assert!(
        response
            .maze
            .cells()
            .iter()
            .flat_map(|cell| cell.wall_weights)
            .all(|w| w < 100)
    );
}

#[test]
fn large_depth_first_maze_does_not_overflow() {
    let m = maze(300, 300, GeneratorKind::Recursive, 0);
    assert_eq!(m.removed_wall_count(), 300 * 300 - 1);
    assert!(SolverKind::Bfs.solve(&m).is_solved());
}
