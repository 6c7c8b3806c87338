//! hitofude-solver: Progressive single-stroke tour solver (sans-IO).
//!
//! Turns a set of 2D points into one continuous stroke path visiting
//! every point exactly once, with low total travel distance:
//! greedy tour construction -> linearization -> windowed local search.
//!
//! This crate has **no I/O dependencies** -- it operates on in-memory
//! point slices and returns structured data. Rendering and file
//! handling live in the export and bench crates.
//!
//! The solver is progressive: [`Solver::step`] performs one state
//! transition at a time so hosts can render intermediate paths or
//! cancel between iterations, and [`solve`] wraps the same machine in a
//! callback loop for one-shot callers.

pub mod chain;
pub mod diagnostics;
pub mod geometry;
pub mod linearize;
pub mod node;
pub mod optimize;
pub mod solver;
pub mod tour;
pub mod types;

pub use diagnostics::{solve_with_diagnostics, Clock, SolveDiagnostics, SystemClock};
pub use solver::{solve, Solver, SolverPhase, StepOutcome};
pub use types::{
    NodeId, Point, SolveResult, SolverConfig, SolverError, StrokePath, TerminalPolicy,
};
