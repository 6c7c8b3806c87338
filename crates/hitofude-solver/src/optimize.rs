//! Windowed local-search optimizer: bounded exhaustive permutation of a
//! sliding path slice.
//!
//! A window spans `window_size + 1` consecutive path slots. Its two
//! anchors stay fixed while every ordering of the interior nodes is
//! scored; the cheapest ordering (ties keep the incumbent) replaces the
//! slice in place. The window then advances by `step` slots, wrapping
//! into a fresh sweep until one full sweep finds no improvement.
//!
//! Each `next_window` call examines exactly one window, so a caller can
//! observe or cancel between iterations at whole-window granularity.

use crate::geometry;
use crate::node::NodeArena;
use crate::types::{NodeId, StrokePath};

/// Outcome of examining one window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowStep {
    /// A window was examined (and possibly rewritten).
    Examined {
        /// Path index of the window's leading anchor.
        start: usize,
        /// Whether the interior ordering was replaced by a cheaper one.
        improved: bool,
    },
    /// A full sweep completed without any improvement; the path is
    /// locally optimal for every window this optimizer would examine.
    Converged,
}

/// Sliding-window optimizer state over one path.
#[derive(Debug, Clone)]
pub struct WindowOptimizer {
    window_size: usize,
    step: usize,
    cursor: usize,
    improved_this_sweep: bool,
    converged: bool,
    windows_examined: usize,
    windows_improved: usize,
    sweeps_completed: usize,
}

impl WindowOptimizer {
    /// A fresh optimizer. `window_size` and `step` are assumed already
    /// validated by [`SolverConfig::validate`](crate::SolverConfig::validate).
    #[must_use]
    pub const fn new(window_size: usize, step: usize) -> Self {
        Self {
            window_size,
            step,
            cursor: 0,
            improved_this_sweep: false,
            converged: false,
            windows_examined: 0,
            windows_improved: 0,
            sweeps_completed: 0,
        }
    }

    /// Examine the next window, rewriting `path` (and the affected
    /// nodes' resolved successors) when a cheaper interior ordering
    /// exists.
    ///
    /// Returns [`WindowStep::Converged`] once a whole sweep has passed
    /// without improvement; every later call returns `Converged` again
    /// without touching the path.
    pub fn next_window(&mut self, path: &mut StrokePath, arena: &mut NodeArena) -> WindowStep {
        // Paths too short to hold a single window are trivially optimal.
        if self.converged || path.len() < self.window_size + 1 {
            self.converged = true;
            return WindowStep::Converged;
        }

        if self.cursor + self.window_size > path.len() - 1 {
            self.sweeps_completed += 1;
            if !self.improved_this_sweep {
                self.converged = true;
                return WindowStep::Converged;
            }
            self.cursor = 0;
            self.improved_this_sweep = false;
        }

        let start = self.cursor;
        let improved = optimize_window(path, arena, start, self.window_size);
        self.windows_examined += 1;
        if improved {
            self.windows_improved += 1;
            self.improved_this_sweep = true;
        }
        self.cursor += self.step;
        WindowStep::Examined { start, improved }
    }

    /// Whether a full sweep has completed without improvement.
    #[must_use]
    pub const fn converged(&self) -> bool {
        self.converged
    }

    /// Windows examined so far, across all sweeps.
    #[must_use]
    pub const fn windows_examined(&self) -> usize {
        self.windows_examined
    }

    /// Windows whose interior was rewritten.
    #[must_use]
    pub const fn windows_improved(&self) -> usize {
        self.windows_improved
    }

    /// Completed sweeps over the whole path.
    #[must_use]
    pub const fn sweeps_completed(&self) -> usize {
        self.sweeps_completed
    }
}

/// Exhaustively search the window starting at path index `start`;
/// rewrite the interior in place if a strictly cheaper ordering exists.
///
/// Returns whether the path changed. The incumbent ordering wins all
/// ties, which both keeps the search deterministic and makes a second
/// pass over an optimal window a no-op.
fn optimize_window(
    path: &mut StrokePath,
    arena: &mut NodeArena,
    start: usize,
    window_size: usize,
) -> bool {
    let end = start + window_size;
    let ids = path.ids_mut();
    let anchor_a = ids[start];
    let anchor_b = ids[end];

    let current: Vec<NodeId> = ids[start + 1..end].to_vec();
    let mut best = current.clone();
    let mut best_cost = window_cost(arena, anchor_a, &current, anchor_b);

    let mut scratch = current.clone();
    for_each_permutation(&mut scratch, &mut |perm| {
        let cost = window_cost(arena, anchor_a, perm, anchor_b);
        if cost < best_cost {
            best_cost = cost;
            best.copy_from_slice(perm);
        }
    });

    if best == current {
        return false;
    }

    ids[start + 1..end].copy_from_slice(&best);
    for k in start..end {
        let (a, b) = (ids[k], ids[k + 1]);
        arena.set_send_to(a, Some(b));
        arena.set_receive_from(b, Some(a));
    }
    true
}

/// Sum of edge lengths through the window: anchor, interior in order,
/// anchor.
fn window_cost(arena: &NodeArena, from: NodeId, interior: &[NodeId], to: NodeId) -> f64 {
    let mut cost = 0.0;
    let mut prev = from;
    for &id in interior {
        cost += geometry::distance(arena, prev, id);
        prev = id;
    }
    cost + geometry::distance(arena, prev, to)
}

/// Visit every permutation of `items` exactly once (Heap's algorithm,
/// iterative form). The first visit sees the unmodified input order;
/// the enumeration order is fixed, so "first found" tie handling is
/// deterministic.
fn for_each_permutation<T: Copy>(items: &mut [T], visit: &mut impl FnMut(&[T])) {
    let n = items.len();
    let mut counters = vec![0usize; n];
    visit(items);

    let mut i = 0;
    while i < n {
        if counters[i] < i {
            if i % 2 == 0 {
                items.swap(0, i);
            } else {
                items.swap(counters[i], i);
            }
            visit(items);
            counters[i] += 1;
            i = 0;
        } else {
            counters[i] = 0;
            i += 1;
        }
    }
}
