//! Progressive driver: build, linearize, then optimize window by
//! window, surfacing the evolving path between iterations.
//!
//! The driver is a small state machine. Construction validates the
//! input and builds the node model; each [`Solver::step`] call then
//! performs exactly one transition — building the tour, linearizing it,
//! or examining one optimizer window — so a host can interleave its own
//! work (rendering, yielding an event loop) between CPU-bound bursts
//! and cancel at whole-iteration granularity.
//!
//! [`Solver::run`] wraps the same machine in a callback loop for
//! callers that just want a finished path.

use crate::chain::ChainSet;
use crate::linearize;
use crate::node::NodeArena;
use crate::optimize::{WindowOptimizer, WindowStep};
use crate::tour::{self, TourReport};
use crate::types::{NodeId, Point, SolveResult, SolverConfig, SolverError, StrokePath};

/// Which stage the driver is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverPhase {
    /// The node model exists; the tour has not been built yet.
    BuildingTour,
    /// The tour structure is built and awaits linearization.
    Linearizing,
    /// The path exists and optimizer windows are being examined.
    Optimizing,
    /// Terminal: the final path is held for retrieval.
    Done,
}

/// What one [`Solver::step`] call accomplished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The initial tour structure was built (fast and atomic; no
    /// partial results are emitted for this stage).
    TourBuilt,
    /// The first full path was produced; retrieve it via
    /// [`Solver::path`].
    Linearized,
    /// One optimizer window was examined.
    WindowOptimized {
        /// Path index of the window's leading anchor.
        start: usize,
        /// Whether this window shortened the path.
        improved: bool,
    },
    /// Optimization has converged (or the solver was already done);
    /// the driver is now in [`SolverPhase::Done`].
    Converged,
}

/// Progressive tour solver over one point set.
#[derive(Debug, Clone)]
pub struct Solver {
    arena: NodeArena,
    chains: ChainSet,
    path: Option<StrokePath>,
    optimizer: WindowOptimizer,
    phase: SolverPhase,
    tour_report: Option<TourReport>,
}

impl Solver {
    /// Validate the input and construct the node model.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`] for out-of-range
    /// configuration, [`SolverError::TooFewPoints`] for fewer than two
    /// points, and [`SolverError::NonFinitePoint`] for NaN or infinite
    /// coordinates. Nothing is constructed on error.
    pub fn new(points: &[Point], config: &SolverConfig) -> Result<Self, SolverError> {
        config.validate()?;
        let arena = NodeArena::from_points(points, config)?;
        let chains = ChainSet::new(arena.len());
        Ok(Self {
            chains,
            path: None,
            optimizer: WindowOptimizer::new(config.window_size, config.step),
            phase: SolverPhase::BuildingTour,
            tour_report: None,
            arena,
        })
    }

    /// The driver's current phase.
    #[must_use]
    pub const fn phase(&self) -> SolverPhase {
        self.phase
    }

    /// The current path, once linearization has run.
    #[must_use]
    pub const fn path(&self) -> Option<&StrokePath> {
        self.path.as_ref()
    }

    /// Working-space position of a node, if the id is in range.
    #[must_use]
    pub fn node_position(&self, id: NodeId) -> Option<Point> {
        (id.index() < self.arena.len()).then(|| self.arena.node(id).position())
    }

    /// Every node's position, indexed by [`NodeId::index`].
    #[must_use]
    pub fn positions(&self) -> Vec<Point> {
        self.arena.positions()
    }

    /// Counts collected while the initial tour was built.
    #[must_use]
    pub const fn tour_report(&self) -> Option<TourReport> {
        self.tour_report
    }

    /// The window optimizer's running counters.
    #[must_use]
    pub const fn optimizer(&self) -> &WindowOptimizer {
        &self.optimizer
    }

    /// Perform exactly one state transition.
    ///
    /// Stepping a [`Done`](SolverPhase::Done) solver is a no-op that
    /// reports [`StepOutcome::Converged`].
    ///
    /// # Errors
    ///
    /// Construction-phase invariant violations
    /// ([`SolverError::InvariantViolation`]) abort the solve; the
    /// optimizing phase never errors.
    pub fn step(&mut self) -> Result<StepOutcome, SolverError> {
        match self.phase {
            SolverPhase::BuildingTour => {
                self.tour_report = Some(tour::build_tour(&mut self.arena, &mut self.chains)?);
                self.phase = SolverPhase::Linearizing;
                Ok(StepOutcome::TourBuilt)
            }
            SolverPhase::Linearizing => {
                self.path = Some(linearize::linearize(&mut self.arena)?);
                self.phase = SolverPhase::Optimizing;
                Ok(StepOutcome::Linearized)
            }
            SolverPhase::Optimizing => {
                let path = self.path.as_mut().ok_or_else(|| {
                    SolverError::InvariantViolation(
                        "optimizing phase entered without a path".to_string(),
                    )
                })?;
                match self.optimizer.next_window(path, &mut self.arena) {
                    WindowStep::Examined { start, improved } => {
                        Ok(StepOutcome::WindowOptimized { start, improved })
                    }
                    WindowStep::Converged => {
                        self.phase = SolverPhase::Done;
                        Ok(StepOutcome::Converged)
                    }
                }
            }
            SolverPhase::Done => Ok(StepOutcome::Converged),
        }
    }

    /// Stop optimizing now and hold the current path as final.
    ///
    /// This is how a driver loop honors a caller's cancellation: the
    /// check happens between window iterations, never mid-scan.
    pub const fn cancel(&mut self) {
        self.phase = SolverPhase::Done;
    }

    /// Drive the solver to completion.
    ///
    /// `on_progress` is invoked with the current path after every
    /// optimizer window; returning `false` stops the solve early and
    /// the path as of that moment becomes the result (this is
    /// cooperative cancellation, not an error).
    ///
    /// # Errors
    ///
    /// Propagates construction-phase errors from [`step`](Self::step).
    pub fn run(
        &mut self,
        mut on_progress: impl FnMut(&StrokePath) -> bool,
    ) -> Result<SolveResult, SolverError> {
        loop {
            match self.step()? {
                StepOutcome::TourBuilt | StepOutcome::Linearized => {}
                StepOutcome::WindowOptimized { .. } => {
                    let keep_going = self.path.as_ref().is_none_or(&mut on_progress);
                    if !keep_going {
                        self.cancel();
                        break;
                    }
                }
                StepOutcome::Converged => break,
            }
        }
        self.finish()
    }

    /// Assemble the final result from the current state.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvariantViolation`] if no path has been
    /// produced yet.
    pub fn finish(&self) -> Result<SolveResult, SolverError> {
        let path = self.path.clone().ok_or_else(|| {
            SolverError::InvariantViolation("no path has been produced yet".to_string())
        })?;
        let positions = self.arena.positions();
        let total_length = path.total_length(&positions);
        Ok(SolveResult {
            path,
            positions,
            total_length,
        })
    }
}

/// Solve a point set in one call.
///
/// Convenience wrapper over [`Solver::new`] + [`Solver::run`]; see
/// [`Solver::run`] for the `on_progress` contract.
///
/// # Errors
///
/// Returns input-contract errors before any construction begins and
/// invariant violations if tour construction produces a broken
/// structure; see [`SolverError`].
pub fn solve(
    points: &[Point],
    config: &SolverConfig,
    on_progress: impl FnMut(&StrokePath) -> bool,
) -> Result<SolveResult, SolverError> {
    Solver::new(points, config)?.run(on_progress)
}
