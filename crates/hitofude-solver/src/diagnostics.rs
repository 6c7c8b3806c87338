//! Solver diagnostics: timing and counts for each stage.
//!
//! Permanent instrumentation intended for parameter tuning (window
//! size, step, terminal policy). [`solve_with_diagnostics`] runs the
//! full solve and collects metrics alongside the result.
//!
//! Duration measurements use [`std::time::Duration`]; timestamps come
//! from a caller-supplied [`Clock`] so WASM hosts can back them with
//! `performance.now()`. [`SystemClock`] (via the `web-time` crate)
//! covers both native and browser targets.
//!
//! Durations are serialized as fractional seconds (`f64`) for JSON
//! compatibility, since `std::time::Duration` does not implement serde
//! traits.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::solver::Solver;
use crate::types::{Point, SolveResult, SolverConfig, SolverError};

/// Source of monotonic timestamps.
pub trait Clock {
    /// An opaque instant captured by [`now`](Self::now).
    type Instant;

    /// Capture the current instant.
    fn now(&self) -> Self::Instant;

    /// Elapsed time since `since`.
    fn elapsed(&self, since: &Self::Instant) -> Duration;
}

/// [`Clock`] backed by [`web_time::Instant`]: `std::time::Instant` on
/// native targets, `performance.now()` on WASM.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    type Instant = web_time::Instant;

    fn now(&self) -> Self::Instant {
        web_time::Instant::now()
    }

    fn elapsed(&self, since: &Self::Instant) -> Duration {
        since.elapsed()
    }
}

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

/// Diagnostics for a single solver stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageDiagnostics {
    /// Wall-clock duration of this stage (seconds).
    #[serde(with = "duration_serde")]
    pub duration: Duration,
    /// Stage-specific metrics.
    pub metrics: StageMetrics,
}

/// Stage-specific metrics that vary by solver stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageMetrics {
    /// Initial tour construction metrics.
    Build {
        /// Number of nodes in the arena.
        node_count: usize,
        /// Edges recorded, including any final closing link.
        edges_recorded: usize,
        /// Partial chains folded together.
        chain_merges: usize,
        /// Candidate pairs examined across all proximity scans.
        candidates_examined: usize,
    },
    /// Linearization metrics.
    Linearize {
        /// Number of nodes in the first full path.
        path_len: usize,
        /// Total travel distance of the unoptimized path.
        initial_length: f64,
    },
    /// Window optimization metrics.
    Optimize {
        /// Windows examined across all sweeps.
        windows_examined: usize,
        /// Windows whose interior was rewritten.
        windows_improved: usize,
        /// Completed sweeps over the whole path.
        sweeps: usize,
        /// Path length entering this stage.
        length_before: f64,
        /// Path length on convergence.
        length_after: f64,
        /// Reduction ratio: `1.0 - (after / before)`.
        reduction_ratio: f64,
    },
}

/// High-level summary counts for the entire solve.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveSummary {
    /// Number of input points.
    pub node_count: usize,
    /// Total travel distance of the final path.
    pub final_length: f64,
    /// Windows examined during optimization.
    pub windows_examined: usize,
}

/// Diagnostics collected from a single solver run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveDiagnostics {
    /// Stage 1: greedy tour construction.
    pub build: StageDiagnostics,
    /// Stage 2: linearization into the first path.
    pub linearize: StageDiagnostics,
    /// Stage 3: windowed local search to convergence.
    pub optimize: StageDiagnostics,
    /// Total wall-clock duration of the entire solve (seconds).
    #[serde(with = "duration_serde")]
    pub total_duration: Duration,
    /// Summary counts across all stages.
    pub summary: SolveSummary,
}

impl SolveDiagnostics {
    /// Format diagnostics as a human-readable report.
    #[must_use]
    pub fn report(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("Solver Diagnostics Report\n{}", "=".repeat(60)));
        lines.push(format!(
            "Points: {}  |  Final path length: {:.3}",
            self.summary.node_count, self.summary.final_length,
        ));
        lines.push(format!(
            "Total duration: {:.3}ms",
            duration_ms(self.total_duration),
        ));
        lines.push(String::new());

        lines.push(format!(
            "{:<16} {:>10} {:>10}  {}",
            "Stage", "Duration", "% Total", "Details"
        ));
        lines.push("-".repeat(72));

        let total_ms = duration_ms(self.total_duration);
        let stages: [(&str, &StageDiagnostics); 3] = [
            ("Build", &self.build),
            ("Linearize", &self.linearize),
            ("Optimize", &self.optimize),
        ];
        for (name, diag) in stages {
            let ms = duration_ms(diag.duration);
            let pct = if total_ms > 0.0 {
                ms / total_ms * 100.0
            } else {
                0.0
            };
            let details = format_metrics(&diag.metrics);
            lines.push(format!("{name:<16} {ms:>8.3}ms {pct:>9.1}%  {details}"));
        }

        lines.join("\n")
    }
}

/// Convert a `Duration` to milliseconds as `f64`.
fn duration_ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1000.0
}

/// Format stage metrics into a compact detail string.
fn format_metrics(metrics: &StageMetrics) -> String {
    match metrics {
        StageMetrics::Build {
            node_count,
            edges_recorded,
            chain_merges,
            candidates_examined,
        } => {
            format!(
                "{node_count} nodes, {edges_recorded} edges, {chain_merges} merges ({candidates_examined} candidates)",
            )
        }
        StageMetrics::Linearize {
            path_len,
            initial_length,
        } => format!("{path_len} nodes, length {initial_length:.3}"),
        StageMetrics::Optimize {
            windows_examined,
            windows_improved,
            sweeps,
            length_before,
            length_after,
            reduction_ratio,
        } => {
            format!(
                "{windows_examined} windows ({windows_improved} improved, {sweeps} sweeps) {length_before:.3}->{length_after:.3} ({:.1}% shorter)",
                reduction_ratio * 100.0,
            )
        }
    }
}

/// Run the full solve to convergence, collecting per-stage diagnostics.
///
/// # Errors
///
/// Same contract as [`crate::solve`]: input violations are rejected
/// before construction, and construction-phase invariant violations
/// abort the run.
pub fn solve_with_diagnostics<C: Clock>(
    points: &[Point],
    config: &SolverConfig,
    clock: &C,
) -> Result<(SolveResult, SolveDiagnostics), SolverError> {
    let total_start = clock.now();
    let mut solver = Solver::new(points, config)?;

    let build_start = clock.now();
    solver.step()?;
    let build_duration = clock.elapsed(&build_start);
    let report = solver.tour_report().unwrap_or_default();
    let node_count = solver.positions().len();

    let linearize_start = clock.now();
    solver.step()?;
    let linearize_duration = clock.elapsed(&linearize_start);
    let initial = solver.finish()?;

    let optimize_start = clock.now();
    let result = solver.run(|_| true)?;
    let optimize_duration = clock.elapsed(&optimize_start);
    let total_duration = clock.elapsed(&total_start);

    let reduction_ratio = if initial.total_length > 0.0 {
        1.0 - result.total_length / initial.total_length
    } else {
        0.0
    };

    let diagnostics = SolveDiagnostics {
        build: StageDiagnostics {
            duration: build_duration,
            metrics: StageMetrics::Build {
                node_count,
                edges_recorded: report.edges_recorded,
                chain_merges: report.chain_merges,
                candidates_examined: report.candidates_examined,
            },
        },
        linearize: StageDiagnostics {
            duration: linearize_duration,
            metrics: StageMetrics::Linearize {
                path_len: initial.path.len(),
                initial_length: initial.total_length,
            },
        },
        optimize: StageDiagnostics {
            duration: optimize_duration,
            metrics: StageMetrics::Optimize {
                windows_examined: solver.optimizer().windows_examined(),
                windows_improved: solver.optimizer().windows_improved(),
                sweeps: solver.optimizer().sweeps_completed(),
                length_before: initial.total_length,
                length_after: result.total_length,
                reduction_ratio,
            },
        },
        total_duration,
        summary: SolveSummary {
            node_count,
            final_length: result.total_length,
            windows_examined: solver.optimizer().windows_examined(),
        },
    };

    Ok((result, diagnostics))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<Point> {
        (0..16)
            .map(|i| Point::new(f64::from(i * 5 % 16), f64::from(i * 3 % 16)))
            .collect()
    }

    #[test]
    fn diagnostics_counts_match_result() {
        let (result, diagnostics) =
            solve_with_diagnostics(&sample_points(), &SolverConfig::default(), &SystemClock)
                .unwrap();

        assert_eq!(diagnostics.summary.node_count, 16);
        assert!((diagnostics.summary.final_length - result.total_length).abs() < f64::EPSILON);
        assert!(matches!(
            diagnostics.build.metrics,
            StageMetrics::Build { node_count: 16, .. },
        ));
    }

    #[test]
    fn optimize_metrics_show_monotonic_improvement() {
        let (_, diagnostics) =
            solve_with_diagnostics(&sample_points(), &SolverConfig::default(), &SystemClock)
                .unwrap();
        assert!(matches!(
            diagnostics.optimize.metrics,
            StageMetrics::Optimize { .. },
        ));
        if let StageMetrics::Optimize {
            length_before,
            length_after,
            reduction_ratio,
            ..
        } = diagnostics.optimize.metrics
        {
            assert!(length_after <= length_before + 1e-9);
            assert!(reduction_ratio >= -1e-9);
        }
    }

    #[test]
    fn report_mentions_every_stage() {
        let (_, diagnostics) =
            solve_with_diagnostics(&sample_points(), &SolverConfig::default(), &SystemClock)
                .unwrap();
        let report = diagnostics.report();
        assert!(report.contains("Build"));
        assert!(report.contains("Linearize"));
        assert!(report.contains("Optimize"));
        assert!(report.contains("Total duration"));
    }

    #[test]
    fn diagnostics_serde_round_trip() {
        let (_, diagnostics) =
            solve_with_diagnostics(&sample_points(), &SolverConfig::default(), &SystemClock)
                .unwrap();
        let json = serde_json::to_string(&diagnostics).unwrap();
        let back: SolveDiagnostics = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary.node_count, diagnostics.summary.node_count);
        assert!(
            (back.total_duration.as_secs_f64() - diagnostics.total_duration.as_secs_f64()).abs()
                < 1e-9,
        );
    }

    #[test]
    fn duration_serde_rejects_negative_seconds() {
        let json = r#"{"duration":-1.0,"metrics":{"Linearize":{"path_len":2,"initial_length":1.0}}}"#;
        let result: Result<StageDiagnostics, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
