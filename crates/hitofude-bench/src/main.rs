//! hitofude-bench: CLI tool for solver parameter experimentation and
//! diagnostics.
//!
//! Runs the tour solver on a generated or file-loaded point set with
//! configurable parameters, printing detailed per-stage diagnostics.
//! Useful for:
//!
//! - Tuning window size and step against path quality
//! - Comparing terminal policies
//! - Measuring per-stage durations to identify bottlenecks
//! - Understanding how point-set shape affects convergence
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin hitofude-bench -- [OPTIONS]
//! cargo run --release --bin hitofude-bench -- --shape ring --count 200 --svg out.svg
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use hitofude_solver::diagnostics::{Clock, SolveDiagnostics, solve_with_diagnostics};
use hitofude_solver::{Point, SolverConfig, TerminalPolicy};

/// Solver parameter experimentation and diagnostics for hitofude.
///
/// Solves a generated or file-loaded point set with configurable
/// parameters and prints detailed per-stage timing and count
/// diagnostics.
#[derive(Parser)]
#[command(name = "hitofude-bench", version)]
struct Cli {
    /// Load points from a JSON file (an array of {"x": .., "y": ..}
    /// objects) instead of generating them.
    #[arg(long, conflicts_with_all = ["shape", "count", "seed"])]
    points_file: Option<PathBuf>,

    /// Generated point-set shape.
    #[arg(long, value_enum, default_value_t = Shape::Scatter)]
    shape: Shape,

    /// Number of generated points.
    #[arg(long, default_value_t = 100, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(2..))]
    count: usize,

    /// Seed for the scatter generator.
    #[arg(long, default_value_t = 0x5eed)]
    seed: u64,

    /// Optimizer window size (path slots per window).
    #[arg(long, default_value_t = SolverConfig::DEFAULT_WINDOW_SIZE)]
    window_size: usize,

    /// Window advance per optimizer iteration.
    #[arg(long, default_value_t = SolverConfig::DEFAULT_STEP)]
    step: usize,

    /// Coordinate scale applied to input points.
    #[arg(long, default_value_t = SolverConfig::DEFAULT_SCALE)]
    scale: f64,

    /// Mirror the x axis of the input coordinate space.
    #[arg(long)]
    reverse_x: bool,

    /// Mirror the y axis of the input coordinate space.
    #[arg(long)]
    reverse_y: bool,

    /// Which node is reserved as the terminal path endpoint.
    #[arg(long, value_enum, default_value_t = Terminal::NearestCenter)]
    terminal: Terminal,

    /// Write the solved stroke as SVG to file.
    #[arg(long)]
    svg: Option<PathBuf>,

    /// Number of runs for averaging.
    #[arg(long, default_value_t = 1, value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..))]
    runs: usize,

    /// Output diagnostics as JSON instead of human-readable report.
    #[arg(long)]
    json: bool,

    /// Full solver config as a JSON string.
    ///
    /// When provided, all other solver parameter flags are ignored.
    /// The JSON must be a valid `SolverConfig` serialization.
    #[arg(long)]
    config_json: Option<String>,
}

/// Generated point-set shape selection.
#[derive(Clone, Copy, ValueEnum)]
enum Shape {
    /// Uniform axis-aligned grid (near-square).
    Grid,
    /// Points evenly spaced on a circle.
    Ring,
    /// Pseudo-random scatter in a square (deterministic per seed).
    Scatter,
}

/// Terminal policy selection.
#[derive(Clone, Copy, ValueEnum)]
enum Terminal {
    /// The node nearest the centroid.
    NearestCenter,
    /// The node farthest from the centroid.
    FarthestFromCenter,
}

/// Build a [`SolverConfig`] from CLI arguments.
///
/// If `--config-json` is provided, the JSON is parsed directly and all
/// individual parameter flags are ignored.  Otherwise, a config is
/// assembled from the individual flags.
fn config_from_cli(cli: &Cli) -> Result<SolverConfig, String> {
    if let Some(ref json) = cli.config_json {
        return serde_json::from_str(json).map_err(|e| format!("Error parsing --config-json: {e}"));
    }

    Ok(SolverConfig {
        reverse_x: cli.reverse_x,
        reverse_y: cli.reverse_y,
        scale: cli.scale,
        window_size: cli.window_size,
        step: cli.step,
        terminal_policy: match cli.terminal {
            Terminal::NearestCenter => TerminalPolicy::NearestCenter,
            Terminal::FarthestFromCenter => TerminalPolicy::FarthestFromCenter,
        },
    })
}

/// Load or generate the point set described by the CLI arguments.
fn points_from_cli(cli: &Cli) -> Result<Vec<Point>, String> {
    if let Some(ref path) = cli.points_file {
        let bytes = std::fs::read(path).map_err(|e| format!("Error reading {}: {e}", path.display()))?;
        return serde_json::from_slice(&bytes)
            .map_err(|e| format!("Error parsing {}: {e}", path.display()));
    }

    Ok(match cli.shape {
        Shape::Grid => grid_points(cli.count),
        Shape::Ring => ring_points(cli.count),
        Shape::Scatter => scatter_points(cli.count, cli.seed),
    })
}

/// A near-square grid of `count` points with unit spacing.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn grid_points(count: usize) -> Vec<Point> {
    let side = (count as f64).sqrt().ceil() as usize;
    (0..count)
        .map(|i| Point::new((i % side) as f64, (i / side) as f64))
        .collect()
}

/// `count` points evenly spaced on a circle of radius 100.
#[allow(clippy::cast_precision_loss)]
fn ring_points(count: usize) -> Vec<Point> {
    let step = std::f64::consts::TAU / count as f64;
    (0..count)
        .map(|i| {
            let angle = i as f64 * step;
            Point::new(angle.cos() * 100.0, angle.sin() * 100.0)
        })
        .collect()
}

/// `count` pseudo-random points in a 1000 x 1000 square.
///
/// Uses a small LCG (Numerical Recipes constants) so the same seed
/// always yields the same point set, keeping runs comparable.
fn scatter_points(count: usize, seed: u64) -> Vec<Point> {
    let mut state = seed.wrapping_mul(2_862_933_555_777_941_757).wrapping_add(1);
    let mut next = move || {
        state = state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        // Top 53 bits scaled into [0, 1).
        #[allow(clippy::cast_precision_loss)]
        let unit = (state >> 11) as f64 / 9_007_199_254_740_992.0;
        unit * 1000.0
    };
    (0..count).map(|_| Point::new(next(), next())).collect()
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match config_from_cli(&cli) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    let points = match points_from_cli(&cli) {
        Ok(p) => p,
        Err(msg) => {
            eprintln!("{msg}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Points: {}", points.len());
    eprintln!("Config: {config:#?}");
    eprintln!("Runs: {}", cli.runs);
    eprintln!();

    let mut all_diagnostics = Vec::with_capacity(cli.runs);

    for run in 0..cli.runs {
        if cli.runs > 1 {
            eprintln!("--- Run {}/{} ---", run + 1, cli.runs);
        }

        match solve_with_diagnostics(&points, &config, &StdClock) {
            Ok((result, diagnostics)) => {
                if cli.json {
                    match serde_json::to_string_pretty(&diagnostics) {
                        Ok(json) => println!("{json}"),
                        Err(e) => {
                            eprintln!("Error serializing diagnostics: {e}");
                            return ExitCode::FAILURE;
                        }
                    }
                } else {
                    println!("{}", diagnostics.report());
                }

                // Write SVG on the first run only.
                if run == 0
                    && let Some(ref svg_path) = cli.svg
                {
                    let title = cli
                        .points_file
                        .as_deref()
                        .and_then(|p| p.file_stem())
                        .and_then(|s| s.to_str())
                        .unwrap_or("bench");
                    let desc = format!("{config:#?}");
                    let config_json = serde_json::to_string(&config).ok();
                    let metadata = hitofude_export::SvgMetadata {
                        title: Some(title),
                        description: Some(&desc),
                        config_json: config_json.as_deref(),
                    };
                    let svg = hitofude_export::to_svg(&result.polyline(), &metadata);
                    match std::fs::write(svg_path, &svg) {
                        Ok(()) => {
                            eprintln!(
                                "SVG written to {} ({} bytes)",
                                svg_path.display(),
                                svg.len(),
                            );
                        }
                        Err(e) => {
                            eprintln!("Error writing SVG to {}: {e}", svg_path.display());
                        }
                    }
                }

                all_diagnostics.push(diagnostics);
            }
            Err(e) => {
                eprintln!("Solver error: {e}");
                return ExitCode::FAILURE;
            }
        }

        if cli.runs > 1 {
            eprintln!();
        }
    }

    // Print summary when multiple runs.
    if cli.runs > 1 {
        print_multi_run_summary(&all_diagnostics);
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

/// Print aggregated statistics across multiple runs.
#[allow(clippy::cast_precision_loss)]
fn print_multi_run_summary(all_diagnostics: &[SolveDiagnostics]) {
    println!();
    println!(
        "Summary ({} runs)\n{}",
        all_diagnostics.len(),
        "=".repeat(60),
    );

    if all_diagnostics.is_empty() {
        println!("Warning: no diagnostics to summarize");
        return;
    }

    let durations: Vec<f64> = all_diagnostics
        .iter()
        .map(|d| d.total_duration.as_secs_f64() * 1000.0)
        .collect();

    let min = durations.iter().copied().reduce(f64::min).unwrap_or(0.0);
    let max = durations.iter().copied().reduce(f64::max).unwrap_or(0.0);
    let mean = durations.iter().sum::<f64>() / durations.len() as f64;

    println!("Total duration: min={min:.3}ms  mean={mean:.3}ms  max={max:.3}ms");

    // Per-stage means.
    println!();
    println!("{:<16} {:>12}", "Stage", "Mean (ms)");
    println!("{}", "-".repeat(32));

    let stages: &[(&str, fn(&SolveDiagnostics) -> Duration)] = &[
        ("Build", |d| d.build.duration),
        ("Linearize", |d| d.linearize.duration),
        ("Optimize", |d| d.optimize.duration),
    ];

    for (name, extractor) in stages {
        let stage_mean = all_diagnostics
            .iter()
            .map(|d| extractor(d).as_secs_f64() * 1000.0)
            .sum::<f64>()
            / all_diagnostics.len() as f64;
        println!("{name:<16} {stage_mean:>10.3}ms");
    }
}
