//! Node arena: per-point connectivity state for tour construction.
//!
//! Each input point becomes one [`Node`] in a dense arena. Nodes are
//! created once and never destroyed; their connectivity fields mutate
//! monotonically while the initial tour is built, and are afterwards
//! touched only by the window optimizer when it rewrites a slice of the
//! path.

use crate::types::{NodeId, Point, SolverConfig, SolverError, TerminalPolicy};

/// Offset added to both coordinates after scaling, so pixel-derived
/// samples sit at the centre of their source pixel rather than its
/// corner. A uniform translation, so distances are unaffected.
const PIXEL_CENTER_OFFSET: f64 = 0.5;

/// One input point plus its connectivity and derived geometric state.
#[derive(Debug, Clone)]
pub struct Node {
    position: Point,
    dist_from_center: f64,
    is_terminal: bool,
    /// Nodes this one has offered a connection to (at most 2).
    offered: Vec<NodeId>,
    /// Nodes that have offered a connection to this one (at most 2).
    accepted: Vec<NodeId>,
    /// Resolved successor, filled in by the linearizer.
    send_to: Option<NodeId>,
    /// Resolved predecessor, filled in by the linearizer.
    receive_from: Option<NodeId>,
}

impl Node {
    /// Position in the working coordinate space.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Precomputed distance from the shared centroid.
    #[must_use]
    pub const fn dist_from_center(&self) -> f64 {
        self.dist_from_center
    }

    /// Whether this node is the distinguished terminal path endpoint.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        self.is_terminal
    }

    /// Combined connection count (offered plus accepted edges).
    #[must_use]
    pub fn degree(&self) -> usize {
        self.offered.len() + self.accepted.len()
    }

    /// Edge capacity: the terminal node is capped at one edge during
    /// tour construction so it keeps capacity to become a true path
    /// endpoint; every other node is an interior vertex of degree <= 2.
    #[must_use]
    pub const fn capacity(&self) -> usize {
        if self.is_terminal { 1 } else { 2 }
    }

    /// Whether an edge (in either direction) already connects this node
    /// to `other`.
    #[must_use]
    pub fn has_edge_to(&self, other: NodeId) -> bool {
        self.offered.contains(&other) || self.accepted.contains(&other)
    }

    /// All tentative neighbors, offered first, in recording order.
    pub fn neighbors(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.offered.iter().chain(self.accepted.iter()).copied()
    }

    /// Resolved successor in the linearized path.
    #[must_use]
    pub const fn send_to(&self) -> Option<NodeId> {
        self.send_to
    }

    /// Resolved predecessor in the linearized path.
    #[must_use]
    pub const fn receive_from(&self) -> Option<NodeId> {
        self.receive_from
    }
}

/// Dense arena of nodes plus the shared centroid they were measured
/// against.
#[derive(Debug, Clone)]
pub struct NodeArena {
    nodes: Vec<Node>,
    center: Point,
}

impl NodeArena {
    /// Build the arena from raw input points.
    ///
    /// Applies the configured axis mirroring and scale, adds the fixed
    /// per-point offset, computes the shared centroid, precomputes each
    /// node's distance from it, and marks the terminal node according to
    /// `config.terminal_policy`.
    ///
    /// # Errors
    ///
    /// Returns [`SolverError::TooFewPoints`] for fewer than two points
    /// and [`SolverError::NonFinitePoint`] for NaN or infinite input
    /// coordinates. Nothing is constructed on error.
    pub fn from_points(points: &[Point], config: &SolverConfig) -> Result<Self, SolverError> {
        if points.len() < 2 {
            return Err(SolverError::TooFewPoints {
                count: points.len(),
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(SolverError::NonFinitePoint { index });
        }

        let positions: Vec<Point> = points
            .iter()
            .map(|p| {
                let x = if config.reverse_x { -p.x } else { p.x };
                let y = if config.reverse_y { -p.y } else { p.y };
                Point::new(
                    x.mul_add(config.scale, PIXEL_CENTER_OFFSET),
                    y.mul_add(config.scale, PIXEL_CENTER_OFFSET),
                )
            })
            .collect();

        #[allow(clippy::cast_precision_loss)]
        let inv_len = 1.0 / positions.len() as f64;
        let center = Point::new(
            positions.iter().map(|p| p.x).sum::<f64>() * inv_len,
            positions.iter().map(|p| p.y).sum::<f64>() * inv_len,
        );

        let mut nodes: Vec<Node> = positions
            .into_iter()
            .map(|position| Node {
                position,
                dist_from_center: position.distance(center),
                is_terminal: false,
                offered: Vec::with_capacity(2),
                accepted: Vec::with_capacity(2),
                send_to: None,
                receive_from: None,
            })
            .collect();

        let terminal = choose_terminal(&nodes, config.terminal_policy);
        nodes[terminal.index()].is_terminal = true;

        Ok(Self { nodes, center })
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the arena holds no nodes. Construction
    /// guarantees at least two, so this is only meaningful for
    /// hand-built test arenas.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The shared centroid of all node positions.
    #[must_use]
    pub const fn center(&self) -> Point {
        self.center
    }

    /// Borrow a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// All node ids in arena order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.nodes.len()).map(NodeId::new)
    }

    /// Every node's position, indexed by [`NodeId::index`].
    #[must_use]
    pub fn positions(&self) -> Vec<Point> {
        self.nodes.iter().map(|n| n.position).collect()
    }

    /// The terminal node's id.
    #[must_use]
    pub fn terminal(&self) -> NodeId {
        self.nodes
            .iter()
            .position(Node::is_terminal)
            .map_or(NodeId::new(0), NodeId::new)
    }

    /// Record a tentative edge offered by `from` to `to`.
    ///
    /// Callers (the tour builder) are responsible for checking degree
    /// capacity first; this only records the bookkeeping on both ends.
    pub(crate) fn offer_edge(&mut self, from: NodeId, to: NodeId) {
        self.nodes[from.index()].offered.push(to);
        self.nodes[to.index()].accepted.push(from);
    }

    pub(crate) fn set_send_to(&mut self, id: NodeId, next: Option<NodeId>) {
        self.nodes[id.index()].send_to = next;
    }

    pub(crate) fn set_receive_from(&mut self, id: NodeId, prev: Option<NodeId>) {
        self.nodes[id.index()].receive_from = prev;
    }
}

/// Pick the terminal node per policy. Ties break toward the lowest
/// arena index, keeping the choice deterministic.
fn choose_terminal(nodes: &[Node], policy: TerminalPolicy) -> NodeId {
    let selected = match policy {
        TerminalPolicy::NearestCenter => nodes.iter().enumerate().min_by(|(ai, a), (bi, b)| {
            a.dist_from_center
                .partial_cmp(&b.dist_from_center)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(ai.cmp(bi))
        }),
        TerminalPolicy::FarthestFromCenter => nodes.iter().enumerate().max_by(|(ai, a), (bi, b)| {
            a.dist_from_center
                .partial_cmp(&b.dist_from_center)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(bi.cmp(ai))
        }),
    };
    selected.map_or(NodeId::new(0), |(i, _)| NodeId::new(i))
}
