//! Chain bookkeeping: which nodes are already transitively connected.
//!
//! The tour builder needs a cheap "are these two nodes in the same
//! partial chain?" query to avoid closing a cycle before every node has
//! been incorporated. Chains only ever grow or merge, never split, so a
//! disjoint-set union with path compression fits exactly; membership is
//! tracked separately because a node that has never been recorded into
//! any chain is distinct from a node that is the sole root of one.

use petgraph::unionfind::UnionFind;

use crate::types::NodeId;

/// What [`ChainSet::record_edge`] did with an edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Neither endpoint belonged to a chain: a new chain was created.
    Created,
    /// Exactly one endpoint belonged to a chain: the other was appended.
    Appended,
    /// The endpoints belonged to two different chains, now unioned.
    Unioned,
    /// Both endpoints were already in the same chain; nothing changed.
    /// Expected only for a final closing edge.
    AlreadyJoined,
}

/// Partition of nodes into growing chains.
#[derive(Debug, Clone)]
pub struct ChainSet {
    uf: UnionFind<usize>,
    in_chain: Vec<bool>,
    chains: usize,
}

impl ChainSet {
    /// A chain set over `node_count` initially chainless nodes.
    #[must_use]
    pub fn new(node_count: usize) -> Self {
        Self {
            uf: UnionFind::new(node_count),
            in_chain: vec![false; node_count],
            chains: 0,
        }
    }

    /// Record that an edge now connects `sender` and `receiver`,
    /// creating, extending, or merging chains as needed.
    pub fn record_edge(&mut self, sender: NodeId, receiver: NodeId) -> MergeOutcome {
        let (a, b) = (sender.index(), receiver.index());
        let outcome = match (self.in_chain[a], self.in_chain[b]) {
            (false, false) => {
                self.chains += 1;
                MergeOutcome::Created
            }
            (false, true) | (true, false) => MergeOutcome::Appended,
            (true, true) => {
                if self.uf.find_mut(a) == self.uf.find_mut(b) {
                    return MergeOutcome::AlreadyJoined;
                }
                self.chains -= 1;
                MergeOutcome::Unioned
            }
        };
        self.uf.union(a, b);
        self.in_chain[a] = true;
        self.in_chain[b] = true;
        outcome
    }

    /// Whether both nodes are already members of the same chain.
    ///
    /// Nodes that have never been recorded into a chain are in no chain
    /// at all, so they never compare equal — not even to themselves.
    pub fn same_chain(&mut self, a: NodeId, b: NodeId) -> bool {
        self.in_chain[a.index()]
            && self.in_chain[b.index()]
            && self.uf.find_mut(a.index()) == self.uf.find_mut(b.index())
    }

    /// Whether the node has been recorded into any chain.
    #[must_use]
    pub fn is_chained(&self, id: NodeId) -> bool {
        self.in_chain[id.index()]
    }

    /// Number of distinct chains currently recorded.
    #[must_use]
    pub const fn chain_count(&self) -> usize {
        self.chains
    }

    /// Whether every node has been folded into one single chain.
    #[must_use]
    pub fn fully_merged(&self) -> bool {
        self.chains == 1 && self.in_chain.iter().all(|&c| c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const fn id(i: usize) -> NodeId {
        NodeId::new(i)
    }

    #[test]
    fn first_edge_creates_chain() {
        let mut chains = ChainSet::new(4);
        assert_eq!(chains.record_edge(id(0), id(1)), MergeOutcome::Created);
        assert_eq!(chains.chain_count(), 1);
        assert!(chains.same_chain(id(0), id(1)));
    }

    #[test]
    fn unchained_nodes_share_no_chain() {
        let mut chains = ChainSet::new(3);
        assert!(!chains.same_chain(id(0), id(1)));
        // A node with no recorded edge is in no chain, even vs itself.
        assert!(!chains.same_chain(id(2), id(2)));
        assert!(!chains.is_chained(id(2)));
    }

    #[test]
    fn appending_extends_existing_chain() {
        let mut chains = ChainSet::new(4);
        chains.record_edge(id(0), id(1));
        assert_eq!(chains.record_edge(id(1), id(2)), MergeOutcome::Appended);
        assert_eq!(chains.chain_count(), 1);
        assert!(chains.same_chain(id(0), id(2)));
    }

    #[test]
    fn appending_is_symmetric_in_which_side_has_a_chain() {
        let mut chains = ChainSet::new(4);
        chains.record_edge(id(1), id(2));
        // Sender chainless, receiver chained.
        assert_eq!(chains.record_edge(id(0), id(1)), MergeOutcome::Appended);
        assert!(chains.same_chain(id(0), id(2)));
    }

    #[test]
    fn union_merges_two_chains() {
        let mut chains = ChainSet::new(6);
        chains.record_edge(id(0), id(1));
        chains.record_edge(id(3), id(4));
        assert_eq!(chains.chain_count(), 2);
        assert!(!chains.same_chain(id(0), id(3)));

        assert_eq!(chains.record_edge(id(1), id(3)), MergeOutcome::Unioned);
        assert_eq!(chains.chain_count(), 1);
        assert!(chains.same_chain(id(0), id(4)));
    }

    #[test]
    fn closing_edge_is_a_no_op_merge() {
        let mut chains = ChainSet::new(3);
        chains.record_edge(id(0), id(1));
        chains.record_edge(id(1), id(2));
        assert_eq!(
            chains.record_edge(id(2), id(0)),
            MergeOutcome::AlreadyJoined,
        );
        assert_eq!(chains.chain_count(), 1);
    }

    #[test]
    fn fully_merged_requires_every_node() {
        let mut chains = ChainSet::new(3);
        chains.record_edge(id(0), id(1));
        assert!(!chains.fully_merged());
        chains.record_edge(id(1), id(2));
        assert!(chains.fully_merged());
    }
}
