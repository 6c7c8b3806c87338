//! Pure distance and ordering helpers over the node arena.
//!
//! All functions here are side-effect free and deterministic: distance
//! ties break toward the lower arena index via a stable sort key.

use crate::node::NodeArena;
use crate::types::NodeId;

/// Euclidean distance between two nodes' positions.
#[must_use]
pub fn distance(arena: &NodeArena, a: NodeId, b: NodeId) -> f64 {
    arena.node(a).position().distance(arena.node(b).position())
}

/// All node ids ordered by distance from the shared centroid,
/// descending (farthest first).
///
/// This ordering anchors the greedy tour builder at the periphery of
/// the point cloud.
#[must_use]
pub fn sort_by_distance_to_center(arena: &NodeArena) -> Vec<NodeId> {
    let mut ids: Vec<NodeId> = arena.ids().collect();
    ids.sort_by(|&a, &b| {
        arena
            .node(b)
            .dist_from_center()
            .partial_cmp(&arena.node(a).dist_from_center())
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.index().cmp(&b.index()))
    });
    ids
}

/// All nodes except `reference`, ordered by distance to `reference`,
/// ascending (nearest first). Used for the builder's proximity scans.
#[must_use]
pub fn sort_by_distance_to(arena: &NodeArena, reference: NodeId) -> Vec<NodeId> {
    let origin = arena.node(reference).position();
    let mut ids: Vec<NodeId> = arena.ids().filter(|&id| id != reference).collect();
    ids.sort_by(|&a, &b| {
        origin
            .distance_squared(arena.node(a).position())
            .partial_cmp(&origin.distance_squared(arena.node(b).position()))
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.index().cmp(&b.index()))
    });
    ids
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::{Point, SolverConfig};

    fn arena_from(points: &[Point]) -> NodeArena {
        NodeArena::from_points(points, &SolverConfig::default()).unwrap()
    }

    #[test]
    fn distance_between_nodes() {
        let arena = arena_from(&[Point::new(0.0, 0.0), Point::new(3.0, 4.0)]);
        let d = distance(&arena, NodeId::new(0), NodeId::new(1));
        assert!((d - 5.0).abs() < 1e-12);
    }

    #[test]
    fn center_sort_is_farthest_first() {
        // Collinear points: centroid near the middle, so the outermost
        // points sort first.
        let arena = arena_from(&[
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(10.0, 0.0),
        ]);
        let order = sort_by_distance_to_center(&arena);
        let dists: Vec<f64> = order
            .iter()
            .map(|&id| arena.node(id).dist_from_center())
            .collect();
        assert!(dists[0] >= dists[1] && dists[1] >= dists[2]);
    }

    #[test]
    fn center_sort_breaks_ties_by_index() {
        // Four corners of a square are equidistant from the centroid.
        let arena = arena_from(&[
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(0.0, 2.0),
        ]);
        let order = sort_by_distance_to_center(&arena);
        assert_eq!(
            order,
            vec![NodeId::new(0), NodeId::new(1), NodeId::new(2), NodeId::new(3)],
        );
    }

    #[test]
    fn proximity_sort_is_nearest_first_and_excludes_reference() {
        let arena = arena_from(&[
            Point::new(0.0, 0.0),
            Point::new(5.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(3.0, 0.0),
        ]);
        let order = sort_by_distance_to(&arena, NodeId::new(0));
        assert_eq!(
            order,
            vec![NodeId::new(2), NodeId::new(3), NodeId::new(1)],
        );
        assert!(!order.contains(&NodeId::new(0)));
    }

    #[test]
    fn proximity_sort_is_deterministic_under_ties() {
        // Two candidates at identical distance from the reference.
        let arena = arena_from(&[
            Point::new(0.0, 0.0),
            Point::new(0.0, 2.0),
            Point::new(0.0, -2.0),
        ]);
        let order = sort_by_distance_to(&arena, NodeId::new(0));
        assert_eq!(order, vec![NodeId::new(1), NodeId::new(2)]);
    }
}
