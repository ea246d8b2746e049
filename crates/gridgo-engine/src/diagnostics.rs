//! Run diagnostics: timing and counts for each stage of a generation or
//! solve.
//!
//! These are permanent instrumentation for comparing algorithms and
//! tuning vision parameters. The engine itself is sans-IO and has no
//! clock; callers pass a [`Clock`] (the bench tool uses
//! `std::time::Instant`) or [`NullClock`] to skip timing.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::generate::{Generator, GeneratorKind};
use crate::grid::Maze;
use crate::request::{GenerateRequest, GenerateResponse, Placement, SolveRequest, place_start_end};
use crate::snapshot::MazeSnapshot;
use crate::solve::{Solution, Solver, SolverKind};
use crate::stats::MazeStats;
use crate::types::{Coord, EngineConfig, EngineError};
use crate::vision;
use crate::weights::EdgeWeights;

/// Serde support for `std::time::Duration` as fractional seconds.
mod duration_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a `Duration` as fractional seconds (`f64`).
    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        duration.as_secs_f64().serialize(serializer)
    }

    /// Deserialize a `Duration` from fractional seconds (`f64`).
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(|_| {
            serde::de::Error::custom(
                "duration seconds must be finite, non-negative, and representable as a Duration",
            )
        })
    }
}

/// Monotonic time source.
pub trait Clock {
    /// Opaque point in time.
    type Instant;

    /// The current instant.
    fn now(&self) -> Self::Instant;

    /// Time elapsed since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// A clock that never advances. Every duration is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullClock;

impl Clock for NullClock {
    type Instant = ();

    fn now(&self) {}

    fn elapsed(&self, (): &()) -> Duration {
        Duration::ZERO
    }
}

/// Diagnostics for a single stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Image-to-weight pipeline.
    Vision {
        /// Source image width in pixels.
        width: u32,
        /// Source image height in pixels.
        height: u32,
        /// Cells classified as structural edges.
        strong_cells: usize,
        /// Cells classified as supporting edges.
        weak_cells: usize,
        /// Entries in the resulting weight map.
        entries: usize,
    },
    /// Spanning tree construction.
    Generation {
        /// Generator name.
        algorithm: String,
        /// Internal edges considered (Kruskal only).
        candidate_edges: usize,
        /// Candidate edges weighted by the map (Kruskal only).
        weighted_edges: usize,
        /// Walls removed.
        removed_walls: usize,
        /// Deepest stack reached (depth-first only).
        max_depth: usize,
    },
    /// Start/end placement.
    Placement {
        /// How the points were chosen.
        mode: Placement,
        /// Start cell.
        start: Coord,
        /// End cell.
        end: Coord,
        /// Manhattan distance between them.
        distance: usize,
    },
    /// Statistics and snapshot capture.
    Analysis {
        /// Cells with exactly one open passage.
        dead_ends: usize,
        /// Dead-end density.
        complexity: f64,
        /// Shortest path length in cells.
        solution_length: Option<usize>,
        /// Whether the passages form a spanning tree.
        perfect: bool,
        /// Entries in the snapshot weight map.
        snapshot_entries: usize,
    },
    /// Pathfinding.
    Solve {
        /// Solver name.
        algorithm: String,
        /// Cells finalized by the search.
        visited: usize,
        /// Cells on the returned path (zero if unreachable).
        path_length: usize,
    },
}

/// Diagnostics collected from one generation request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationDiagnostics {
    /// Vision pipeline (image generation only).
    pub vision: Option<StageDiagnostics>,
    /// Spanning tree construction.
    pub generation: StageDiagnostics,
    /// Start/end placement.
    pub placement: StageDiagnostics,
    /// Statistics and snapshot capture.
    pub analysis: StageDiagnostics,
    /// Total duration of the request (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary of the request.
    pub summary: GenerationSummary,
}

/// High-level summary of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSummary {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns.
    pub cols: usize,
    /// Generator used.
    pub algorithm: GeneratorKind,
    /// Total cell count.
    pub cell_count: usize,
}

/// Diagnostics collected from one solve request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveDiagnostics {
    /// Solver used.
    pub algorithm: SolverKind,
    /// The search stage.
    pub solve: StageDiagnostics,
}

/// Run a generation request, timing each stage.
///
/// # Errors
///
/// Same as [`generate`](crate::generate).
pub fn generate_with_diagnostics<R: Rng, C: Clock>(
    request: &GenerateRequest,
    config: &EngineConfig,
    rng: &mut R,
    clock: &C,
) -> Result<(GenerateResponse, GenerationDiagnostics), EngineError> {
    let total_start = clock.now();
    let (rows, cols) = (request.rows, request.cols);

    config.validate()?;
    let kind: GeneratorKind = request.algorithm.parse()?;
    config.limits.check(rows, cols)?;
    let image = if kind.needs_image() {
        Some(request.image.as_deref().ok_or(EngineError::MissingImage)?)
    } else {
        None
    };

    // 1. Vision (image generation only).
    let (weights, vision) = match image {
        Some(bytes) => {
            let start = clock.now();
            let analysis = vision::analyze_bytes(bytes, rows, cols, &config.vision)?;
            let report = analysis.report;
            let stage = StageDiagnostics {
                duration: clock.elapsed(&start),
                metrics: StageMetrics::Vision {
                    width: report.width,
                    height: report.height,
                    strong_cells: report.strong_cells,
                    weak_cells: report.weak_cells,
                    entries: analysis.weights.len(),
                },
            };
            (analysis.weights, Some(stage))
        }
        None => (EdgeWeights::new(), None),
    };

    // 2. Generation.
    let start = clock.now();
    let mut maze = Maze::with_limits(rows, cols, config.limits)?;
    let report = kind.generate(&mut maze, &weights, rng);
    if image.is_some() {
        maze.apply_wall_weights(&weights);
    }
    let generation = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Generation {
            algorithm: kind.to_string(),
            candidate_edges: report.candidate_edges,
            weighted_edges: report.weighted_edges,
            removed_walls: report.removed_walls,
            max_depth: report.max_depth,
        },
    };

    // 3. Placement.
    let start = clock.now();
    let mode = place_start_end(&mut maze, request.start, request.end, rng);
    let placement = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Placement {
            mode,
            start: maze.start(),
            end: maze.end(),
            distance: maze.start().manhattan(maze.end()),
        },
    };

    // 4. Analysis.
    let start = clock.now();
    let stats = MazeStats::compute(&maze);
    let snapshot = MazeSnapshot::capture(&maze);
    let analysis = StageDiagnostics {
        duration: clock.elapsed(&start),
        metrics: StageMetrics::Analysis {
            dead_ends: stats.dead_ends,
            complexity: stats.complexity,
            solution_length: stats.solution_length,
            perfect: stats.perfect,
            snapshot_entries: snapshot.weights.len(),
        },
    };

    tracing::debug!(
        rows,
        cols,
        algorithm = %kind,
        dead_ends = stats.dead_ends,
        "maze generated"
    );

    let diagnostics = GenerationDiagnostics {
        vision,
        generation,
        placement,
        analysis,
        total_duration: clock.elapsed(&total_start),
        summary: GenerationSummary {
            rows,
            cols,
            algorithm: kind,
            cell_count: maze.cell_count(),
        },
    };
    let response = GenerateResponse {
        maze,
        stats,
        weights: snapshot.weights,
    };
    Ok((response, diagnostics))
}

/// Run a solve request, timing the search.
///
/// # Errors
///
/// Returns [`EngineError::UnsupportedAlgorithm`] for an unknown solver.
pub fn solve_with_diagnostics<C: Clock>(
    request: &SolveRequest,
    clock: &C,
) -> Result<(Solution, SolveDiagnostics), EngineError> {
    let kind: SolverKind = request.algorithm.parse()?;
    let start = clock.now();
    let solution = kind.solve(&request.maze);
    let diagnostics = SolveDiagnostics {
        algorithm: kind,
        solve: StageDiagnostics {
            duration: clock.elapsed(&start),
            metrics: StageMetrics::Solve {
                algorithm: kind.to_string(),
                visited: solution.visited.len(),
                path_length: solution.path.len(),
            },
        },
    };
    Ok((solution, diagnostics))
}

impl GenerationDiagnostics {
    /// Stages that ran, in order, with display names.
    #[must_use]
    pub fn stages(&self) -> Vec<(&'static str, &StageDiagnostics)> {
        let mut stages = Vec::with_capacity(4);
        if let Some(ref v) = self.vision {
            stages.push(("Vision", v));
        }
        stages.push(("Generation", &self.generation));
        stages.push(("Placement", &self.placement));
        stages.push(("Analysis", &self.analysis));
        stages
    }

    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Generation Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Maze: {}x{} ({} cells), algorithm: {}",
            self.summary.rows, self.summary.cols, self.summary.cell_count, self.summary.algorithm,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());
        lines.push(stage_header());
        lines.push("-".repeat(80));

        let total_ms = duration_ms(self.total_duration);
        for (name, diag) in self.stages() {
            lines.push(stage_line(name, diag, total_ms));
        }

        lines.join("\n")
    }
}

impl SolveDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let ms = duration_ms(self.solve.duration);
        [
            format!("Solve Diagnostics Report ({})\n{}", self.algorithm, "=".repeat(60)),
            stage_header(),
            "-".repeat(80),
            stage_line("Solve", &self.solve, ms),
        ]
        .join("\n")
    }
}

fn stage_header() -> String {
    format!(
        "{:<24} {:>10} {:>10}  {}",
        "Stage", "Duration", "% Total", "Details"
    )
}

fn stage_line(name: &str, diag: &StageDiagnostics, total_ms: f64) -> String {
    let ms = duration_ms(diag.duration);
    let pct = if total_ms > 0.0 {
        ms / total_ms * 100.0
    } else {
        0.0
    };
    let details = format_metrics(&diag.metrics);
    format!("{name:<24} {ms:>8.3}ms {pct:>9.1}%  {details}")
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Vision {
            width,
            height,
            strong_cells,
            weak_cells,
            entries,
        } => format!("{width}x{height} strong={strong_cells} weak={weak_cells} entries={entries}"),
        StageMetrics::Generation {
            algorithm,
            candidate_edges,
            weighted_edges,
            removed_walls,
            max_depth,
        } => {
            if *candidate_edges > 0 {
                format!(
                    "{algorithm} removed={removed_walls} candidates={candidate_edges} weighted={weighted_edges}"
                )
            } else {
                format!("{algorithm} removed={removed_walls} depth={max_depth}")
            }
        }
        StageMetrics::Placement {
            mode,
            start,
            end,
            distance,
        } => format!("{mode:?} {start} -> {end} (distance {distance})"),
        StageMetrics::Analysis {
            dead_ends,
            complexity,
            solution_length,
            perfect,
            snapshot_entries,
        } => {
            let length = solution_length.map_or_else(|| "none".to_string(), |n| n.to_string());
            format!(
                "dead_ends={dead_ends} ({:.1}%) path={length} perfect={perfect} snapshot={snapshot_entries}",
                complexity * 100.0,
            )
        }
        StageMetrics::Solve {
            algorithm,
            visited,
            path_length,
        } => format!("{algorithm} visited={visited} path={path_length}"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::cell::Cell;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    /// Advances one millisecond per reading.
    struct StepClock {
        ticks: Cell<u64>,
    }

    impl Clock for StepClock {
        type Instant = u64;

        fn now(&self) -> u64 {
            let t = self.ticks.get();
            self.ticks.set(t + 1);
            t
        }

        fn elapsed(&self, since: &u64) -> Duration {
            Duration::from_millis(self.now() - since)
        }
    }

    #[test]
    fn duration_ms_converts_correctly() {
        let ms = duration_ms(Duration::from_millis(1234));
        assert!((ms - 1234.0).abs() < 0.01);
    }

    #[test]
    fn null_clock_reports_zero() {
        let mut rng = StdRng::seed_from_u64(0);
        let (_, diag) = generate_with_diagnostics(
            &GenerateRequest::new(4, 4, "kruskal"),
            &EngineConfig::default(),
            &mut rng,
            &NullClock,
        )
        .unwrap();
        assert_eq!(diag.total_duration, Duration::ZERO);
        assert!(diag.vision.is_none());
        assert_eq!(diag.stages().len(), 3);
    }

    #[test]
    fn stage_metrics_are_filled() {
        let mut rng = StdRng::seed_from_u64(1);
        let clock = StepClock { ticks: Cell::new(0) };
        let (response, diag) = generate_with_diagnostics(
            &GenerateRequest::new(5, 6, "recursive"),
            &EngineConfig::default(),
            &mut rng,
            &clock,
        )
        .unwrap();
        assert!(diag.total_duration > diag.generation.duration);
        assert_eq!(diag.summary.cell_count, 30);
        assert!(matches!(
            &diag.generation.metrics,
            StageMetrics::Generation { algorithm, removed_walls: 29, .. } if algorithm == "recursive"
        ));
        assert!(matches!(
            diag.placement.metrics,
            StageMetrics::Placement { mode: Placement::Random, start, .. } if start == response.maze.start()
        ));
    }

    #[test]
    fn solve_diagnostics_count_the_trace() {
        let mut rng = StdRng::seed_from_u64(2);
        let (response, _) = generate_with_diagnostics(
            &GenerateRequest::new(6, 6, "kruskal"),
            &EngineConfig::default(),
            &mut rng,
            &NullClock,
        )
        .unwrap();
        let request = SolveRequest {
            maze: response.maze,
            algorithm: "greedy".to_string(),
        };
        let (solution, diag) = solve_with_diagnostics(&request, &NullClock).unwrap();
        assert_eq!(diag.algorithm, SolverKind::Greedy);
        assert_eq!(
            diag.solve.metrics,
            StageMetrics::Solve {
                algorithm: "greedy".to_string(),
                visited: solution.visited.len(),
                path_length: solution.path.len(),
            }
        );
        assert!(diag.report().contains("greedy visited="));
    }

    #[test]
    fn report_lists_every_stage() {
        let mut rng = StdRng::seed_from_u64(3);
        let (_, diag) = generate_with_diagnostics(
            &GenerateRequest::new(3, 3, "kruskal"),
            &EngineConfig::default(),
            &mut rng,
            &NullClock,
        )
        .unwrap();
        let report = diag.report();
        assert!(report.contains("Generation Diagnostics Report"));
        assert!(report.contains("Maze: 3x3 (9 cells), algorithm: kruskal"));
        for stage in ["Generation", "Placement", "Analysis"] {
            assert!(report.contains(stage), "missing {stage}");
        }
        assert!(!report.contains("Vision"));
    }

    #[test]
    fn diagnostics_json_uses_seconds() {
        let diag = SolveDiagnostics {
            algorithm: SolverKind::Bfs,
            solve: StageDiagnostics {
                duration: Duration::from_millis(1500),
                metrics: StageMetrics::Solve {
                    algorithm: "bfs".to_string(),
                    visited: 3,
                    path_length: 2,
                },
            },
        };
        let value = serde_json::to_value(&diag).unwrap();
        assert!((value["solve"]["duration"].as_f64().unwrap() - 1.5).abs() < 1e-9);
        let back: SolveDiagnostics = serde_json::from_value(value).unwrap();
        assert_eq!(back, diag);
    }
}
