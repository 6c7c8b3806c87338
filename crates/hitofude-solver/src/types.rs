//! Shared types for the hitofude tour solver.

use serde::{Deserialize, Serialize};

/// A 2D point in the solver's working coordinate space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
}

impl Point {
    /// Create a new point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared Euclidean distance to another point.
    ///
    /// Avoids the square root for comparison purposes.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx.mul_add(dx, dy * dy)
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Returns `true` if both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Identifier of a node in the solver's arena.
///
/// A dense 0-based index into the node arena. Edges between nodes are
/// stored as `Option<NodeId>`, so there is no reserved sentinel value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    /// Create an id from a dense arena index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// The underlying arena index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// An ordered visiting sequence of node ids.
///
/// Once fully constructed the path is a Hamiltonian ordering: every node
/// id appears exactly once. The path is built once by the linearizer and
/// then mutated in place, window by window, by the optimizer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrokePath(Vec<NodeId>);

impl StrokePath {
    /// Create a path from an ordered sequence of node ids.
    #[must_use]
    pub const fn new(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }

    /// Returns `true` if the path has no nodes.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of nodes in the path.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// The ordered node ids.
    #[must_use]
    pub fn ids(&self) -> &[NodeId] {
        &self.0
    }

    /// Mutable access to the ordered node ids.
    ///
    /// The optimizer rewrites window slices through this; the length and
    /// the set of ids must not change.
    pub(crate) fn ids_mut(&mut self) -> &mut [NodeId] {
        &mut self.0
    }

    /// Consumes the path and returns the underlying id vector.
    #[must_use]
    pub fn into_ids(self) -> Vec<NodeId> {
        self.0
    }

    /// Total travel distance along the path, given each node's position.
    ///
    /// Ids that fall outside `positions` contribute nothing; a valid
    /// path never contains such ids.
    #[must_use]
    pub fn total_length(&self, positions: &[Point]) -> f64 {
        self.0
            .windows(2)
            .filter_map(|pair| {
                let a = positions.get(pair[0].index())?;
                let b = positions.get(pair[1].index())?;
                Some(a.distance(*b))
            })
            .sum()
    }
}

/// Policy for choosing the distinguished terminal node.
///
/// The terminal node is capped at one edge during tour construction so
/// it keeps capacity to become an endpoint of the final path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TerminalPolicy {
    /// The node nearest the centroid (the last node in the solver's
    /// farthest-first anchor ordering).
    #[default]
    NearestCenter,
    /// The node farthest from the centroid.
    FarthestFromCenter,
}

/// Configuration for the tour solver.
///
/// Constructed with [`Default`] and adjusted field-wise; [`validate`]
/// (called by the solver before any construction begins) rejects
/// out-of-range values with [`SolverError::InvalidConfig`].
///
/// [`validate`]: SolverConfig::validate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Mirror the x axis of the input coordinate space before building
    /// the node model. Affects only the initial embedding.
    pub reverse_x: bool,

    /// Mirror the y axis of the input coordinate space before building
    /// the node model.
    pub reverse_y: bool,

    /// Multiplier applied to raw input coordinates before the fixed
    /// per-point offset is added. Consumers feeding pixel coordinates
    /// should treat this as "distance units per input unit".
    ///
    /// Must be finite and positive.
    pub scale: f64,

    /// Number of path edges spanned by one optimizer window, covering
    /// `window_size + 1` consecutive path slots. The two end slots stay
    /// anchored while the interior (`window_size - 1` nodes) is
    /// re-ordered by exhaustive permutation, so this must stay small; at
    /// most [`MAX_WINDOW_SIZE`](Self::MAX_WINDOW_SIZE).
    pub window_size: usize,

    /// How far the window advances between optimizer iterations.
    /// Values smaller than `window_size` make consecutive windows
    /// overlap, refining previously visited regions.
    ///
    /// Must be at least 1.
    pub step: usize,

    /// Which node is reserved as the terminal path endpoint.
    pub terminal_policy: TerminalPolicy,
}

impl SolverConfig {
    /// Default coordinate scale.
    pub const DEFAULT_SCALE: f64 = 1.0;
    /// Default optimizer window size.
    pub const DEFAULT_WINDOW_SIZE: usize = 5;
    /// Default window advance per iteration.
    pub const DEFAULT_STEP: usize = 2;
    /// Upper bound on `window_size`: a window interior of 6 nodes means
    /// 720 permutations per window, which is still cheap.
    pub const MAX_WINDOW_SIZE: usize = 7;

    /// Check the configuration for out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::InvalidConfig`] naming the offending field
    /// when `scale` is non-finite or non-positive, `window_size` is
    /// outside `2..=MAX_WINDOW_SIZE`, or `step` is zero.
    pub fn validate(&self) -> Result<(), SolverError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SolverError::InvalidConfig(format!(
                "scale must be finite and positive, got {}",
                self.scale,
            )));
        }
        if self.window_size < 2 || self.window_size > Self::MAX_WINDOW_SIZE {
            return Err(SolverError::InvalidConfig(format!(
                "window_size must be in 2..={}, got {}",
                Self::MAX_WINDOW_SIZE,
                self.window_size,
            )));
        }
        if self.step == 0 {
            return Err(SolverError::InvalidConfig(
                "step must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            reverse_x: false,
            reverse_y: false,
            scale: Self::DEFAULT_SCALE,
            window_size: Self::DEFAULT_WINDOW_SIZE,
            step: Self::DEFAULT_STEP,
            terminal_policy: TerminalPolicy::default(),
        }
    }
}

/// Result of running the solver to completion (or until cancelled).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolveResult {
    /// The final visiting order.
    pub path: StrokePath,

    /// Position of each node, indexed by [`NodeId::index`]. These are
    /// working-space coordinates (mirrored, scaled, offset), not the raw
    /// input coordinates.
    pub positions: Vec<Point>,

    /// Total travel distance of `path`.
    pub total_length: f64,
}

impl SolveResult {
    /// Resolve the id path into a position polyline, in visiting order.
    ///
    /// Consumers that render the stroke (SVG export, a plotter driver)
    /// want positions rather than ids.
    #[must_use]
    pub fn polyline(&self) -> Vec<Point> {
        self.path
            .ids()
            .iter()
            .filter_map(|id| self.positions.get(id.index()).copied())
            .collect()
    }
}

/// Errors that can occur while solving.
#[derive(Debug, thiserror::Error)]
pub enum SolverError {
    /// Fewer than two input points were supplied.
    #[error("at least 2 points are required, got {count}")]
    TooFewPoints {
        /// Number of points actually supplied.
        count: usize,
    },

    /// An input point has a NaN or infinite coordinate.
    #[error("point {index} has a non-finite coordinate")]
    NonFinitePoint {
        /// Index of the offending point in the input sequence.
        index: usize,
    },

    /// Solver configuration is out of range.
    #[error("invalid solver configuration: {0}")]
    InvalidConfig(String),

    /// Tour construction produced a structure that violates an internal
    /// invariant. This indicates a defect in the matching predicate or
    /// chain bookkeeping; the solve is aborted rather than returning a
    /// path that could skip or duplicate points.
    #[error("tour construction invariant violated: {0}")]
    InvariantViolation(String),
}
