//! gridgo-bench: CLI tool for maze generation experiments and diagnostics.
//!
//! Generates a maze from command-line parameters, runs the selected
//! solvers over it and prints per-stage diagnostics. Useful for:
//!
//! - Comparing generators (`kruskal`, `image`, `recursive`)
//! - Comparing how many cells each solver visits
//! - Tuning the vision thresholds against a source image
//! - Measuring per-stage durations across repeated runs
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin gridgo-bench -- [OPTIONS]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use gridgo_engine::diagnostics::{
    Clock, GenerationDiagnostics, SolveDiagnostics, generate_with_diagnostics,
    solve_with_diagnostics,
};
use gridgo_engine::{
    Coord, DimensionLimits, EngineConfig, GenerateRequest, GenerateResponse, GeneratorKind,
    MazeSnapshot, Solution, SolveRequest, SolverKind, VisionConfig,
};
use gridgo_export::{RenderOptions, SvgMetadata};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::Level;

/// Maze generation and solver experimentation for gridgo.
///
/// Generates a maze with configurable parameters, solves it with one or
/// more solvers and prints detailed per-stage timing and count
/// diagnostics.
#[derive(Parser)]
#[command(name = "gridgo-bench", version)]
struct Cli {
    /// Number of rows.
    #[arg(long, default_value_t = 20)]
    rows: usize,

    /// Number of columns.
    #[arg(long, default_value_t = 20)]
    cols: usize,

    /// Generation algorithm.
    #[arg(long, value_enum, default_value_t = Algorithm::Kruskal)]
    algorithm: Algorithm,

    /// Source image for the `image` algorithm (PNG, JPEG, BMP, WebP).
    #[arg(long)]
    image: Option<PathBuf>,

    /// RNG seed. A random seed is chosen and printed when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Start cell as `row,col`; must be paired with `--end`.
    #[arg(long, value_parser = parse_coord)]
    start: Option<Coord>,

    /// End cell as `row,col`; must be paired with `--start`.
    #[arg(long, value_parser = parse_coord)]
    end: Option<Coord>,

    /// Solvers to run, comma-separated. The first one is drawn in exports.
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [Solver::Bfs, Solver::Astar, Solver::Greedy])]
    solvers: Vec<Solver>,

    /// Largest accepted rows or columns.
    #[arg(long, default_value_t = DimensionLimits::DEFAULT_MAX)]
    max_dimension: usize,

    /// Gradient magnitude at or above which a cell is a strong edge.
    #[arg(long, default_value_t = VisionConfig::DEFAULT_HIGH_THRESHOLD)]
    high_threshold: f64,

    /// Gradient magnitude at or above which a cell is a weak edge.
    #[arg(long, default_value_t = VisionConfig::DEFAULT_LOW_THRESHOLD)]
    low_threshold: f64,

    /// Edge weight given to strong cells.
    #[arg(long, default_value_t = VisionConfig::DEFAULT_STRONG_WEIGHT)]
    strong_weight: i32,

    /// Edge weight given to weak cells.
    #[arg(long, default_value_t = VisionConfig::DEFAULT_WEAK_WEIGHT)]
    weak_weight: i32,

    /// Full engine config as a JSON string.
    ///
    /// When provided, the limit and threshold flags are ignored. The JSON
    /// must be a valid `EngineConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,

    /// Write SVG output to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Write PNG output to file.
    #[arg(long)]
    png: Option<PathBuf>,

    /// Pixels per cell in PNG output.
    #[arg(long, default_value_t = RenderOptions::DEFAULT_CELL_SIZE, value_parser = clap::builder::RangedU64ValueParser::<u32>::new().range(1..))]
    cell_size: u32,

    /// Write the maze snapshot (sparse weight map) as JSON to file.
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Print the maze as ASCII art.
    #[arg(long)]
    ascii: bool,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Log engine stage counts at debug level.
    #[arg(long, short)]
    verbose: bool,
}

/// Generator selection.
#[derive(Clone, Copy, ValueEnum)]
enum Algorithm {
    /// Kruskal over random weights.
    Kruskal,
    /// Kruskal over weights traced from `--image`.
    Image,
    /// Randomized depth-first search.
    Recursive,
}

impl From<Algorithm> for GeneratorKind {
    fn from(a: Algorithm) -> Self {
        match a {
            Algorithm::Kruskal => Self::Kruskal,
            Algorithm::Image => Self::Image,
            Algorithm::Recursive => Self::Recursive,
        }
    }
}

/// Solver selection.
#[derive(Clone, Copy, ValueEnum)]
enum Solver {
    /// Breadth-first search.
    Bfs,
    /// A* with the Manhattan heuristic.
    Astar,
    /// Greedy best-first.
    Greedy,
}

impl From<Solver> for SolverKind {
    fn from(s: Solver) -> Self {
        match s {
            Solver::Bfs => Self::Bfs,
            Solver::Astar => Self::Astar,
            Solver::Greedy => Self::Greedy,
        }
    }
}

fn parse_coord(s: &str) -> Result<Coord, String> {
    let (row, col) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `row,col`, got `{s}`"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid coordinate `{v}`: {e}"))
    };
    Ok(Coord::new(parse(row)?, parse(col)?))
}

/// Build an [`EngineConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.
fn config_from_cli(cli: &Cli) -> Result<EngineConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(EngineConfig {
        limits: DimensionLimits {
            max: cli.max_dimension,
            ..EngineConfig::default().limits
        },
        vision: VisionConfig {
            high_threshold: cli.high_threshold,
            low_threshold: cli.low_threshold,
            strong_weight: cli.strong_weight,
            weak_weight: cli.weak_weight,
        },
    })
}

/// Build the generation request, reading `--image` if given.
fn request_from_cli(cli: &Cli) -> Result<GenerateRequest, String> {
    let kind = GeneratorKind::from(cli.algorithm);
    if cli.image.is_some() && !kind.needs_image() {
        return Err(format!("--image is only used by --algorithm image, not {kind}"));
    }
    let mut request = GenerateRequest::new(cli.rows, cli.cols, kind.as_str());
    request.start = cli.start;
    request.end = cli.end;
    if let Some(ref path) = cli.image {
        let bytes = std::fs::read(path)
            .map_err(|e| format!("Error reading {}: {e}", path.display()))?;
        eprintln!("Image: {} ({} bytes)", path.display(), bytes.len());
        request.image = Some(bytes);
    }
    Ok(request)
}

/// One run: generation plus every requested solve.
struct RunOutput {
    response: GenerateResponse,
    generation: GenerationDiagnostics,
    solves: Vec<(Solution, SolveDiagnostics)>,
}

fn run_once(
    cli: &Cli,
    request: &GenerateRequest,
    config: &EngineConfig,
    seed: u64,
) -> Result<RunOutput, String> {
    let mut rng = StdRng::seed_from_u64(seed);
    let (response, generation) = generate_with_diagnostics(request, config, &mut rng, &StdClock)
        .map_err(|e| format!("Generation error: {e}"))?;

    let mut solves = Vec::with_capacity(cli.solvers.len());
    for solver in &cli.solvers {
        let solve_request = SolveRequest {
            maze: response.maze.clone(),
            algorithm: SolverKind::from(*solver).as_str().to_string(),
        };
        let solved = solve_with_diagnostics(&solve_request, &StdClock)
            .map_err(|e| format!("Solve error: {e}"))?;
        solves.push(solved);
    }

    Ok(RunOutput {
        response,
        generation,
        solves,
    })
}

fn print_run(cli: &Cli, output: &RunOutput) -> Result<(), String> {
    if cli.json {
        let solves: Vec<&SolveDiagnostics> = output.solves.iter().map(|(_, d)| d).collect();
        let value = serde_json::json!({
            "generation": output.generation,
            "solves": solves,
        });
        let json = serde_json::to_string_pretty(&value)
            .map_err(|e| format!("Error serializing diagnostics: {e}"))?;
        println!("{json}");
    } else {
        println!("{}", output.generation.report());
        for (_, diagnostics) in &output.solves {
            println!();
            println!("{}", diagnostics.report());
        }
    }
    Ok(())
}

/// Write a file, reporting the outcome on stderr. Failures do not abort
/// the run.
fn write_output(path: &Path, what: &str, bytes: &[u8]) {
    match std::fs::write(path, bytes) {
        Ok(()) => eprintln!("{what} written to {} ({} bytes)", path.display(), bytes.len()),
        Err(e) => eprintln!("Error writing {what} to {}: {e}", path.display()),
    }
}

fn write_exports(cli: &Cli, output: &RunOutput, seed: u64) {
    let maze = &output.response.maze;
    let overlay = output.solves.first().map(|(s, _)| s);

    if let Some(ref path) = cli.svg {
        let title = cli
            .image
            .as_deref()
            .and_then(Path::file_stem)
            .and_then(|s| s.to_str())
            .unwrap_or("gridgo");
        let desc = format!(
            "{} {}x{} seed {seed}",
            output.generation.summary.algorithm,
            maze.rows(),
            maze.cols()
        );
        let metadata = SvgMetadata {
            title: Some(title),
            description: Some(&desc),
        };
        let svg = gridgo_export::to_svg(maze, overlay, &metadata);
        write_output(path, "SVG", svg.as_bytes());
    }

    if let Some(ref path) = cli.png {
        let options = RenderOptions {
            cell_size: cli.cell_size,
            ..RenderOptions::default()
        };
        match gridgo_export::to_png(maze, &options, overlay) {
            Ok(png) => write_output(path, "PNG", &png),
            Err(e) => eprintln!("Error rendering PNG: {e}"),
        }
    }

    if let Some(ref path) = cli.snapshot {
        match serde_json::to_vec_pretty(&MazeSnapshot::capture(maze)) {
            Ok(json) => write_output(path, "Snapshot", &json),
            Err(e) => eprintln!("Error serializing snapshot: {e}"),
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let request = match request_from_cli(&cli) {
        Ok(r) => r,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };
    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());

    eprintln!(
        "Maze: {}x{} ({}), seed {seed}",
        cli.rows, cli.cols, request.algorithm
    );
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut all_runs = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        let output = match run_once(&cli, &request, &config, seed) {
            Ok(output) => output,
            Err(msg) => {
                eprintln!("{msg}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(msg) = print_run(&cli, &output) {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }

        // Write exports on the first run only; later runs use the same seed.
        if run == 0 {
            if cli.ascii {
                println!();
                print!("{}", output.response.maze);
            }
            write_exports(&cli, &output, seed);
        }

        all_runs.push(output);

        if cli.runs > 1 {
            eprintln!();
        }
    }

    if cli.runs > 1 {
        print_multi_run_summary(&all_runs);
    }

    ExitCode::SUCCESS
}

/// [`Clock`] implementation backed by [`std::time::Instant`].
struct StdClock;

impl Clock for StdClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed(&self, since: &Instant) -> Duration {
        since.elapsed()
    }
}

/// Function pointer type for extracting a stage duration from diagnostics.
type StageExtractor = fn(&GenerationDiagnostics) -> Option<Duration>;

fn mean_ms(durations: impl Iterator<Item = Duration>) -> Option<f64> {
    let ms: Vec<f64> = durations.map(|d| d.as_secs_f64() * 1000.0).collect();
    #[allow(clippy::cast_precision_loss)]
    let mean = (!ms.is_empty()).then(|| ms.iter().sum::<f64>() / ms.len() as f64);
    mean
}

/// Print aggregated statistics across multiple runs.
fn print_multi_run_summary(all_runs: &[RunOutput]) {
    debug_assert!(!all_runs.is_empty(), "no runs to summarize");

    println!();
    println!("Summary ({} runs)\n{}", all_runs.len(), "=".repeat(60));

    if all_runs.is_empty() {
        println!("Warning: no runs to summarize");
        return;
    }

    let durations: Vec<f64> = all_runs
        .iter()
        .map(|r| r.generation.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = mean_ms(all_runs.iter().map(|r| r.generation.total_duration)).unwrap_or(0.0);

    println!("Generation total: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    // Per-stage means.
    println!();
    println!("{:<24} {:>12}", "Stage", "Mean (ms)");
    println!("{}", "-".repeat(40));

    let stage_extractors: &[(&str, StageExtractor)] = &[
        ("Vision", |d| d.vision.as_ref().map(|s| s.duration)),
        ("Generation", |d| Some(d.generation.duration)),
        ("Placement", |d| Some(d.placement.duration)),
        ("Analysis", |d| Some(d.analysis.duration)),
    ];

    for (name, extractor) in stage_extractors {
        if let Some(stage_mean) = mean_ms(all_runs.iter().filter_map(|r| extractor(&r.generation)))
        {
            println!("{name:<24} {stage_mean:>10.3}ms");
        }
    }

    let solver_count = all_runs.first().map_or(0, |r| r.solves.len());
    for i in 0..solver_count {
        let durations = all_runs
            .iter()
            .filter_map(|r| r.solves.get(i))
            .map(|(_, d)| d.solve.duration);
        if let (Some(stage_mean), Some((_, first))) =
            (mean_ms(durations), all_runs[0].solves.get(i))
        {
            let name = format!("Solve ({})", first.algorithm);
            println!("{name:<24} {stage_mean:>10.3}ms");
        }
    }
}
