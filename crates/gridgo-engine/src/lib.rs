//! gridgo-engine: Maze generation and solving (sans-IO).
//!
//! Builds perfect mazes on a rectangular grid through:
//! optional vision pipeline (grayscale -> Sobel -> non-maximum
//! suppression -> cell sampling -> dual threshold) -> spanning tree
//! generation (Kruskal or depth-first) -> start/end placement ->
//! statistics and snapshot capture.
//!
//! This crate operates on in-memory byte slices and returns structured
//! data. The only filesystem access is [`vision::analyze_path`]; image
//! and vector output lives in `gridgo-export`.

pub mod diagnostics;
pub mod dsu;
pub mod generate;
pub mod gradient;
pub mod grayscale;
pub mod grid;
pub mod request;
pub mod snapshot;
pub mod solve;
pub mod stats;
pub mod suppress;
pub mod types;
pub mod vision;
pub mod weights;

pub use diagnostics::{Clock, GenerationDiagnostics, NullClock, SolveDiagnostics};
pub use generate::{Generator, GeneratorKind};
pub use grid::{Cell, Maze};
pub use request::{GenerateRequest, GenerateResponse, Placement, SolveRequest, generate, solve};
pub use snapshot::MazeSnapshot;
pub use solve::{Solution, Solver, SolverKind};
pub use stats::MazeStats;
pub use types::{Coord, DimensionLimits, Direction, EngineConfig, EngineError, VisionConfig};
pub use weights::{EdgeKey, EdgeWeights, PASSAGE_WEIGHT};
