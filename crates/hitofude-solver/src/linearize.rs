//! Path linearizer: walk the degree-<=2 structure into one ordered
//! sequence.
//!
//! The tour builder leaves a single open chain; starting from the
//! non-terminal endpoint, the walk repeatedly steps to the neighbor it
//! did not just arrive from, resolving each node's successor and
//! predecessor as it goes. The terminal node, having reserved capacity
//! throughout construction, falls out as the final element.

use crate::node::NodeArena;
use crate::types::{NodeId, SolverError, StrokePath};

/// Linearize the connected structure into the first full [`StrokePath`],
/// resolving `send_to`/`receive_from` on every visited node.
///
/// # Errors
///
/// Returns [`SolverError::InvariantViolation`] if no endpoint exists to
/// start from, or if the walk exhausts its neighbors before visiting
/// every node — either means the builder produced a broken structure,
/// and continuing would yield a path that skips points.
pub fn linearize(arena: &mut NodeArena) -> Result<StrokePath, SolverError> {
    let start = pick_start(arena)?;

    let mut ids = Vec::with_capacity(arena.len());
    ids.push(start);
    arena.set_receive_from(start, None);

    let mut prev: Option<NodeId> = None;
    let mut current = start;

    // One step per remaining node; a well-formed chain ends exactly at
    // the far endpoint.
    for _ in 1..arena.len() {
        let next = arena
            .node(current)
            .neighbors()
            .find(|&n| Some(n) != prev)
            .ok_or_else(|| {
                SolverError::InvariantViolation(format!(
                    "walk stalled at node {current} after {} of {} nodes",
                    ids.len(),
                    arena.len(),
                ))
            })?;

        arena.set_send_to(current, Some(next));
        arena.set_receive_from(next, Some(current));
        ids.push(next);
        prev = Some(current);
        current = next;
    }
    arena.set_send_to(current, None);

    // Each id must appear exactly once; a repeat means the structure
    // contained a cycle and some other node was skipped.
    let mut seen = vec![false; arena.len()];
    for &id in &ids {
        if seen[id.index()] {
            return Err(SolverError::InvariantViolation(format!(
                "node {id} visited twice during linearization",
            )));
        }
        seen[id.index()] = true;
    }

    Ok(StrokePath::new(ids))
}

/// Choose the walk's starting endpoint: a degree-1 node, preferring a
/// non-terminal one so the terminal ends up last. Ties break toward the
/// lowest arena index.
fn pick_start(arena: &NodeArena) -> Result<NodeId, SolverError> {
    let endpoints: Vec<NodeId> = arena
        .ids()
        .filter(|&id| arena.node(id).degree() == 1)
        .collect();
    endpoints
        .iter()
        .copied()
        .find(|&id| !arena.node(id).is_terminal())
        .or_else(|| endpoints.first().copied())
        .ok_or_else(|| {
            SolverError::InvariantViolation(
                "no degree-1 endpoint to start the walk from".to_string(),
            )
        })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::chain::ChainSet;
    use crate::tour;
    use crate::types::{Point, SolverConfig};

    fn built_arena(points: &[Point]) -> NodeArena {
        let mut arena = NodeArena::from_points(points, &SolverConfig::default()).unwrap();
        let mut chains = ChainSet::new(arena.len());
        tour::build_tour(&mut arena, &mut chains).unwrap();
        arena
    }

    fn assert_permutation(path: &StrokePath, n: usize) {
        assert_eq!(path.len(), n);
        let mut seen = vec![false; n];
        for id in path.ids() {
            assert!(!seen[id.index()], "duplicate id {id}");
            seen[id.index()] = true;
        }
    }

    #[test]
    fn two_points_linearize() {
        let mut arena = built_arena(&[Point::new(0.0, 0.0), Point::new(4.0, 0.0)]);
        let path = linearize(&mut arena).unwrap();
        assert_permutation(&path, 2);
    }

    #[test]
    fn path_is_a_permutation() {
        let points: Vec<Point> = (0..15)
            .map(|i| Point::new(f64::from(i % 4) * 5.0, f64::from(i / 4) * 3.0))
            .collect();
        let mut arena = built_arena(&points);
        let path = linearize(&mut arena).unwrap();
        assert_permutation(&path, points.len());
    }

    #[test]
    fn terminal_ends_the_path() {
        let mut arena = built_arena(&[
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(10.0, 10.0),
            Point::new(0.0, 10.0),
            Point::new(5.0, 5.0),
        ]);
        let terminal = arena.terminal();
        let path = linearize(&mut arena).unwrap();
        assert_eq!(*path.ids().last().unwrap(), terminal);
    }

    #[test]
    fn successors_match_the_path_order() {
        let points: Vec<Point> = (0..8).map(|i| Point::new(f64::from(i) * 2.0, 1.0)).collect();
        let mut arena = built_arena(&points);
        let path = linearize(&mut arena).unwrap();

        let ids = path.ids();
        assert_eq!(arena.node(ids[0]).receive_from(), None);
        assert_eq!(arena.node(ids[ids.len() - 1]).send_to(), None);
        for pair in ids.windows(2) {
            assert_eq!(arena.node(pair[0]).send_to(), Some(pair[1]));
            assert_eq!(arena.node(pair[1]).receive_from(), Some(pair[0]));
        }
    }

    #[test]
    fn consecutive_path_nodes_are_neighbors() {
        let points: Vec<Point> = (0..10)
            .map(|i| Point::new(f64::from(i).mul_add(1.5, 0.0), f64::from(i % 3)))
            .collect();
        let mut arena = built_arena(&points);
        let path = linearize(&mut arena).unwrap();
        for pair in path.ids().windows(2) {
            assert!(
                arena.node(pair[0]).has_edge_to(pair[1]),
                "{} and {} are consecutive in the path but not connected",
                pair[0],
                pair[1],
            );
        }
    }

    #[test]
    fn stalled_walk_is_reported() {
        // A structure with no edges at all has no endpoints to walk.
        let mut arena = NodeArena::from_points(
            &[Point::new(0.0, 0.0), Point::new(1.0, 0.0), Point::new(2.0, 0.0)],
            &SolverConfig::default(),
        )
        .unwrap();
        let result = linearize(&mut arena);
        assert!(matches!(result, Err(SolverError::InvariantViolation(_))));
    }
}
