//! Lineage forest assembly and aggregate metrics.
//!
//! [`ProvenanceGraph::assemble`] turns a flat, unordered batch of
//! derivation relations and attestations into a forest. Nodes live in an
//! arena and child links are arena indices, so a parent exclusively owns
//! its child list and no back-references exist.
//!
//! The assembler is total over every log history the chain can produce:
//! - a child named by two relations keeps the last one processed;
//! - a node whose parent never appears is promoted to a root rather than
//!   dropped;
//! - a relation naming a node as its own parent is promoted to a root
//!   with no self-edge;
//! - attestations whose subject was never derived or published are
//!   dropped.
//!
//! Longer cycles (two or more nodes whose parent slots point at each
//! other) stay in the arena but outside the forest: each node has at most
//! one parent, so no root can reach into a cycle and the depth traversal
//! never visits one.

use std::collections::HashMap;

use alloy::primitives::{Address, B256, U256};
use serde::Serialize;

use crate::extract::{AttestationRecord, DerivationRelation};

/// Index of a node within the graph's arena.
pub type NodeIndex = usize;

/// One artifact in the reconstructed forest.
#[derive(Debug, Clone, Serialize)]
pub struct LineageNode {
    /// The artifact's id, unique across the forest.
    pub id: U256,
    /// Declared parent, or `None` for a root creation. May name an id
    /// that is absent from the forest (the node is then a root).
    pub parent_id: Option<U256>,
    /// Account that derived or published the artifact; zero for nodes
    /// only ever seen as parents.
    pub actor: Address,
    /// Opaque reference from the deriving event; zero for parent-only
    /// nodes.
    pub reference: B256,
    /// Transaction that recorded the derivation; zero for parent-only
    /// nodes.
    pub tx_hash: B256,
    /// Block of the deriving event; zero for parent-only nodes.
    pub block_number: u64,
    /// Arena indices of this node's children, in relation-processing
    /// order (not sorted by block).
    pub children: Vec<NodeIndex>,
    /// Claims attached to this node, in input order.
    pub attestations: Vec<AttestationRecord>,
}

impl LineageNode {
    fn placeholder(id: U256) -> Self {
        Self {
            id,
            parent_id: None,
            actor: Address::ZERO,
            reference: B256::ZERO,
            tx_hash: B256::ZERO,
            block_number: 0,
            children: Vec::new(),
            attestations: Vec::new(),
        }
    }
}

/// The reconstructed lineage forest with its aggregate metrics.
///
/// Immutable once assembled; a later reconstruction produces an entirely
/// new, independent graph.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProvenanceGraph {
    nodes: Vec<LineageNode>,
    roots: Vec<NodeIndex>,
    /// Number of distinct artifacts in the forest.
    pub total_assets: usize,
    /// Number of derivation relations consumed.
    pub total_derivatives: usize,
    /// Number of attestations consumed (dropped ones included).
    pub total_attestations: usize,
    /// Longest root-to-leaf path, in nodes. Zero for an empty graph; a
    /// lone root has depth 1.
    pub max_depth: usize,
}

impl ProvenanceGraph {
    /// Build the forest from a batch of relations and attestations.
    #[must_use]
    pub fn assemble(relations: &[DerivationRelation], attestations: &[AttestationRecord]) -> Self {
        // Every id mentioned as parent or child becomes exactly one node,
        // in first-mention order. A child named twice keeps the last
        // relation (a data anomaly we accept rather than correct).
        let mut index: HashMap<U256, NodeIndex> = HashMap::new();
        let mut order: Vec<U256> = Vec::new();
        let mut derived_from: HashMap<U256, usize> = HashMap::new();

        for (i, relation) in relations.iter().enumerate() {
            for id in relation.parent_id.iter().chain([&relation.child_id]) {
                if !index.contains_key(id) {
                    index.insert(*id, order.len());
                    order.push(*id);
                }
            }
            derived_from.insert(relation.child_id, i);
        }

        let mut nodes: Vec<LineageNode> = order
            .iter()
            .map(|&id| match derived_from.get(&id) {
                Some(&i) => {
                    let relation = &relations[i];
                    LineageNode {
                        id,
                        parent_id: relation.parent_id,
                        actor: relation.actor,
                        reference: relation.reference,
                        tx_hash: relation.tx_hash,
                        block_number: relation.block_number,
                        children: Vec::new(),
                        attestations: Vec::new(),
                    }
                }
                None => LineageNode::placeholder(id),
            })
            .collect();

        for attestation in attestations {
            if let Some(&i) = index.get(&attestation.subject_id) {
                nodes[i].attestations.push(*attestation);
            }
            // Unknown subject: the artifact was never derived or
            // published; drop the claim.
        }

        let mut roots = Vec::new();
        for i in 0..nodes.len() {
            let id = nodes[i].id;
            match nodes[i].parent_id {
                None => roots.push(i),
                // A self-referential relation would hang the node beneath
                // itself; promote it instead and skip the self-edge.
                Some(parent) if parent == id => roots.push(i),
                Some(parent) => match index.get(&parent) {
                    Some(&p) => nodes[p].children.push(i),
                    None => roots.push(i),
                },
            }
        }

        // Each node is appended to at most one child list, so everything
        // reachable from the roots is a tree and the walk terminates.
        let mut max_depth = 0;
        let mut stack: Vec<(NodeIndex, usize)> = roots.iter().map(|&r| (r, 1)).collect();
        while let Some((i, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for &child in &nodes[i].children {
                stack.push((child, depth + 1));
            }
        }

        Self {
            total_assets: nodes.len(),
            total_derivatives: relations.len(),
            total_attestations: attestations.len(),
            max_depth,
            nodes,
            roots,
        }
    }

    /// `true` when the forest has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in the arena, in first-mention order.
    #[must_use]
    pub fn nodes(&self) -> &[LineageNode] {
        &self.nodes
    }

    /// Arena indices of the forest's roots.
    #[must_use]
    pub fn root_indices(&self) -> &[NodeIndex] {
        &self.roots
    }

    /// The forest's roots, in assembly order.
    pub fn roots(&self) -> impl Iterator<Item = &LineageNode> {
        self.roots.iter().map(|&i| &self.nodes[i])
    }

    /// The node at an arena index.
    ///
    /// # Panics
    ///
    /// Panics if `index` did not come from this graph.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> &LineageNode {
        &self.nodes[index]
    }

    /// Look up a node by artifact id.
    #[must_use]
    pub fn get(&self, id: U256) -> Option<&LineageNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// A node's children, in relation-processing order.
    pub fn children<'a>(&'a self, node: &'a LineageNode) -> impl Iterator<Item = &'a LineageNode> {
        node.children.iter().map(|&i| &self.nodes[i])
    }

    /// Pre-order walk of the forest, yielding `(depth, node)` with roots
    /// at depth 1.
    #[must_use]
    pub fn walk(&self) -> Walk<'_> {
        Walk {
            graph: self,
            stack: self.roots.iter().rev().map(|&i| (1, i)).collect(),
        }
    }
}

/// Depth-first pre-order iterator over a [`ProvenanceGraph`].
#[derive(Debug)]
pub struct Walk<'a> {
    graph: &'a ProvenanceGraph,
    stack: Vec<(usize, NodeIndex)>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = (usize, &'a LineageNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, i) = self.stack.pop()?;
        let node = &self.graph.nodes[i];
        for &child in node.children.iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, b256};

    const ACTOR: Address = address!("00000000000000000000000000000000000000aa");
    const ATTESTER: Address = address!("00000000000000000000000000000000000000bb");
    const REF: B256 = b256!("1111111111111111111111111111111111111111111111111111111111111111");

    fn relation(parent: Option<u64>, child: u64, block: u64) -> DerivationRelation {
        DerivationRelation {
            parent_id: parent.map(U256::from),
            child_id: U256::from(child),
            actor: ACTOR,
            reference: REF,
            tx_hash: b256!("2222222222222222222222222222222222222222222222222222222222222222"),
            block_number: block,
        }
    }

    fn attestation(subject: u64, kind: u8) -> AttestationRecord {
        AttestationRecord {
            subject_id: U256::from(subject),
            attester: ATTESTER,
            kind,
            reference: REF,
            payload_hash: REF,
            tx_hash: b256!("3333333333333333333333333333333333333333333333333333333333333333"),
            block_number: 7,
        }
    }

    #[test]
    fn empty_input_yields_empty_graph() {
        let graph = ProvenanceGraph::assemble(&[], &[]);
        assert!(graph.is_empty(), "no relations means no nodes");
        assert_eq!(graph.root_indices().len(), 0, "no roots");
        assert_eq!(graph.total_assets, 0, "no assets");
        assert_eq!(graph.total_derivatives, 0, "no derivatives");
        assert_eq!(graph.total_attestations, 0, "no attestations");
        assert_eq!(graph.max_depth, 0, "empty graph has depth zero");
    }

    #[test]
    fn root_publication_chain() {
        // Publication of 1 (no parent), then 2 derived from 1. Id zero is
        // never constructed because the sentinel decodes to no parent.
        let relations = [relation(None, 1, 10), relation(Some(1), 2, 11)];
        let graph = ProvenanceGraph::assemble(&relations, &[]);

        assert_eq!(graph.total_assets, 2, "two distinct ids");
        assert_eq!(graph.total_derivatives, 2, "both relations counted");
        assert_eq!(graph.max_depth, 2, "root plus one child");

        let roots: Vec<_> = graph.roots().collect();
        assert_eq!(roots.len(), 1, "one root");
        assert_eq!(roots[0].id, U256::from(1), "artifact 1 is the root");
        assert_eq!(roots[0].parent_id, None, "the root has no parent");

        let children: Vec<_> = graph.children(roots[0]).collect();
        assert_eq!(children.len(), 1, "one child under the root");
        assert_eq!(children[0].id, U256::from(2), "artifact 2 hangs off the root");
        assert_eq!(children[0].block_number, 11, "child keeps its relation's block");
    }

    #[test]
    fn parent_only_ids_become_zeroed_roots() {
        let graph = ProvenanceGraph::assemble(&[relation(Some(5), 6, 20)], &[]);
        let root = graph.get(U256::from(5)).unwrap();
        assert_eq!(root.parent_id, None, "parent-only node is a root");
        assert_eq!(root.actor, Address::ZERO, "sentinel actor");
        assert_eq!(root.reference, B256::ZERO, "sentinel reference");
        assert_eq!(root.tx_hash, B256::ZERO, "sentinel tx hash");
        assert_eq!(root.block_number, 0, "sentinel block");
        assert_eq!(
            graph.children(root).map(|n| n.id).collect::<Vec<_>>(),
            vec![U256::from(6)],
            "the derived child hangs off the placeholder root"
        );
    }

    #[test]
    fn roots_are_exactly_the_unresolvable_parents() {
        let relations = [relation(None, 1, 1), relation(Some(1), 2, 2)];
        let graph = ProvenanceGraph::assemble(&relations, &[]);
        for node in graph.nodes() {
            let resolvable = node
                .parent_id
                .is_some_and(|p| graph.get(p).is_some() && p != node.id);
            let is_root = graph.root_indices().iter().any(|&i| graph.node(i).id == node.id);
            assert_eq!(!resolvable, is_root, "node is a root iff its parent is unresolvable");
        }
    }

    #[test]
    fn duplicate_child_keeps_last_relation() {
        let relations = [
            relation(Some(1), 3, 10),
            relation(Some(2), 3, 12),
        ];
        let graph = ProvenanceGraph::assemble(&relations, &[]);
        let node = graph.get(U256::from(3)).unwrap();
        assert_eq!(node.parent_id, Some(U256::from(2)), "last relation wins");
        assert_eq!(node.block_number, 12, "fields come from the winning relation");
        assert_eq!(graph.total_assets, 3, "ids 1, 2 and 3");
        assert_eq!(graph.total_derivatives, 2, "both relations still counted");
        assert_eq!(graph.max_depth, 2, "3 sits one level under its winning parent");
        let loser = graph.get(U256::from(1)).unwrap();
        assert_eq!(
            graph.children(loser).count(),
            0,
            "the superseded relation leaves no edge behind"
        );
    }

    #[test]
    fn self_loop_is_promoted_to_root() {
        let relations = [relation(Some(4), 4, 10), relation(Some(4), 5, 11)];
        let graph = ProvenanceGraph::assemble(&relations, &[]);
        let node = graph.get(U256::from(4)).unwrap();
        assert!(
            graph.roots().any(|r| r.id == U256::from(4)),
            "self-parented node becomes a root"
        );
        assert_eq!(
            graph.children(node).map(|n| n.id).collect::<Vec<_>>(),
            vec![U256::from(5)],
            "no self-edge, real children kept"
        );
        assert_eq!(graph.max_depth, 2, "descendants of the broken loop stay reachable");
    }

    #[test]
    fn two_cycle_stays_out_of_the_forest() {
        let relations = [
            relation(Some(8), 9, 1),
            relation(Some(9), 8, 2),
            relation(None, 1, 3),
        ];
        let graph = ProvenanceGraph::assemble(&relations, &[]);
        assert_eq!(graph.total_assets, 3, "cycle members are still constructed");
        let root_ids: Vec<_> = graph.roots().map(|n| n.id).collect();
        assert_eq!(root_ids, vec![U256::from(1)], "neither cycle member is a root");
        assert_eq!(graph.max_depth, 1, "the walk never enters the cycle");
        let walked: Vec<_> = graph.walk().map(|(_, n)| n.id).collect();
        assert_eq!(walked, vec![U256::from(1)], "cycle members are unreachable");
    }

    #[test]
    fn depth_law_for_a_chain() {
        let n = 12u64;
        let relations: Vec<_> = (1..=n)
            .map(|i| relation((i > 1).then(|| i - 1), i, i))
            .collect();
        let graph = ProvenanceGraph::assemble(&relations, &[]);
        assert_eq!(graph.max_depth, n as usize, "a chain of N relations has depth N");
        assert_eq!(graph.total_assets, n as usize, "one node per link");
    }

    #[test]
    fn attestations_attach_or_drop() {
        let relations = [relation(None, 1, 1), relation(Some(1), 2, 2)];
        let attestations = [attestation(2, 1), attestation(2, 3), attestation(77, 2)];
        let graph = ProvenanceGraph::assemble(&relations, &attestations);

        let subject = graph.get(U256::from(2)).unwrap();
        assert_eq!(subject.attestations.len(), 2, "both claims about node 2 attach");
        assert_eq!(
            subject.attestations.iter().map(|a| a.kind).collect::<Vec<_>>(),
            vec![1, 3],
            "attestations keep input order"
        );
        assert_eq!(
            graph.total_attestations, 3,
            "the dropped claim still counts toward the total"
        );
        assert_eq!(graph.total_assets, 2, "dropping a claim never creates a node");
        assert!(graph.get(U256::from(77)).is_none(), "no node for the unknown subject");
    }

    #[test]
    fn assembly_is_idempotent() {
        let relations = [
            relation(None, 1, 1),
            relation(Some(1), 2, 2),
            relation(Some(1), 3, 3),
            relation(Some(3), 4, 4),
        ];
        let attestations = [attestation(2, 1), attestation(4, 4)];

        let a = ProvenanceGraph::assemble(&relations, &attestations);
        let b = ProvenanceGraph::assemble(&relations, &attestations);

        assert_eq!(a.total_assets, b.total_assets, "asset count is stable");
        assert_eq!(a.total_derivatives, b.total_derivatives, "derivative count is stable");
        assert_eq!(a.total_attestations, b.total_attestations, "attestation count is stable");
        assert_eq!(a.max_depth, b.max_depth, "depth is stable");

        let ids = |g: &ProvenanceGraph| {
            let mut v: Vec<_> = g.nodes().iter().map(|n| n.id).collect();
            v.sort_unstable();
            v
        };
        assert_eq!(ids(&a), ids(&b), "node membership is stable");
    }

    #[test]
    fn walk_visits_children_in_insertion_order() {
        let relations = [
            relation(None, 1, 1),
            relation(Some(1), 3, 2),
            relation(Some(1), 2, 3),
            relation(Some(3), 4, 4),
        ];
        let graph = ProvenanceGraph::assemble(&relations, &[]);
        let visited: Vec<_> = graph.walk().map(|(d, n)| (d, n.id)).collect();
        assert_eq!(
            visited,
            vec![
                (1, U256::from(1)),
                (2, U256::from(3)),
                (3, U256::from(4)),
                (2, U256::from(2)),
            ],
            "pre-order with children in relation order"
        );
    }
}
