//! Insertion-ordered directed graph store.
//!
//! Nodes are opaque payloads assigned a stable index at insertion. Edges are
//! kept per source as an ordered list of target indices; that order drives
//! the tie-breaks of [`Graph::topological_sort`].
//!
//! ## Construction paths
//!
//! | Path | Duplicate payloads |
//! |------|--------------------|
//! | [`Graph::from_list`] | kept, each with its own index |
//! | [`Graph::from_nodes`], `FromIterator`, [`Graph::set_nodes`], [`Graph::add_node`] | rejected |
//!
//! Both paths are intentional; callers may rely on either behavior.

use std::cell::Cell;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::trace;

use crate::error::GraphError;
use crate::types::Edge;

/// Transient traversal marker, meaningful only during a sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Color {
    #[default]
    Unvisited,
    InProgress,
    Done,
}

/// Per-node adjacency and traversal state.
#[derive(Debug, Clone, Default)]
pub(crate) struct NodeEntry {
    /// Outgoing target indices, in edge insertion order.
    pub(crate) targets: Vec<usize>,
    pub(crate) color: Cell<Color>,
}

/// A directed graph that can have its nodes topologically sorted.
///
/// Payload lookups use `PartialEq` and are linear in the node count. Index
/// based operations skip the lookup.
///
/// The store keeps sort state in interior-mutable cells and is therefore not
/// `Sync`.
///
/// # Example
///
/// ```rust
/// use depgraph_kernel::Graph;
///
/// let mut graph = Graph::new();
/// graph.add_node("a");
/// graph.add_node("b");
/// graph.add_node("c");
/// graph.add_edge(&"a", &"b");
/// graph.add_edge(&"b", &"c");
///
/// let sorted = graph.topological_sort();
/// assert!(sorted.is_valid());
/// assert_eq!(sorted.result, vec!["a", "b", "c"]);
/// ```
#[derive(Debug, Clone)]
pub struct Graph<N> {
    pub(crate) nodes: Vec<N>,
    pub(crate) entries: Vec<NodeEntry>,
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            entries: Vec::new(),
        }
    }
}

impl<N> Graph<N> {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Construct from a list of nodes without checking for duplicates.
    ///
    /// Payloads that compare equal each get their own slot. Lookups by payload
    /// will only ever resolve to the first of them.
    pub fn from_list(list: Vec<N>) -> Self {
        let mut entries = Vec::with_capacity(list.len());
        entries.resize_with(list.len(), NodeEntry::default);
        Self { nodes: list, entries }
    }

    /// Number of allocated node slots.
    pub fn node_count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Node payloads in insertion order.
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// Payload stored at `index`.
    pub fn node(&self, index: usize) -> Option<&N> {
        self.nodes.get(index)
    }

    /// Outgoing targets of `index`, in edge insertion order.
    pub fn targets(&self, index: usize) -> Option<&[usize]> {
        self.entries.get(index).map(|e| e.targets.as_slice())
    }

    /// Returns true if the graph contains the edge `from -> to`.
    ///
    /// An out-of-range source yields `false`.
    pub fn contains_edge_by_indexes(&self, from: usize, to: usize) -> bool {
        self.entries
            .get(from)
            .is_some_and(|e| e.targets.contains(&to))
    }

    /// Returns true if any node has an outgoing edge.
    pub fn has_edges(&self) -> bool {
        self.entries.iter().any(|e| !e.targets.is_empty())
    }

    /// Total number of edges.
    pub fn edge_count(&self) -> usize {
        self.entries.iter().map(|e| e.targets.len()).sum()
    }

    /// All edges, per source in insertion order, per target in edge insertion order.
    pub fn edges(&self) -> impl Iterator<Item = Edge> + '_ {
        self.entries.iter().enumerate().flat_map(|(from, entry)| {
            entry.targets.iter().map(move |&to| Edge::new(from, to))
        })
    }

    /// Add the edge `from -> to`, naming the failure if rejected.
    pub fn try_add_edge_by_indexes(&mut self, from: usize, to: usize) -> Result<(), GraphError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let targets = &mut self.entries[from].targets;
        if targets.contains(&to) {
            return Err(GraphError::DuplicateEdge { from, to });
        }
        targets.push(to);
        Ok(())
    }

    /// Add the edge `from -> to`.
    ///
    /// Fails if either index is out of range or the edge already exists.
    pub fn add_edge_by_indexes(&mut self, from: usize, to: usize) -> bool {
        accepted("add_edge", self.try_add_edge_by_indexes(from, to))
    }

    /// Remove the edge `from -> to`, naming the failure if rejected.
    pub fn try_remove_edge_by_indexes(&mut self, from: usize, to: usize) -> Result<(), GraphError> {
        self.check_index(from)?;
        self.check_index(to)?;
        let targets = &mut self.entries[from].targets;
        let pos = targets
            .iter()
            .position(|&t| t == to)
            .ok_or(GraphError::MissingEdge { from, to })?;
        // Preserve the order of the remaining targets.
        targets.remove(pos);
        Ok(())
    }

    /// Remove the edge `from -> to`.
    ///
    /// Fails if either index is out of range or the edge is not present.
    pub fn remove_edge_by_indexes(&mut self, from: usize, to: usize) -> bool {
        accepted("remove_edge", self.try_remove_edge_by_indexes(from, to))
    }

    /// Discard all nodes and edges. Index assignment restarts at 0.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.entries.clear();
    }

    fn check_index(&self, index: usize) -> Result<(), GraphError> {
        if index < self.entries.len() {
            Ok(())
        } else {
            Err(GraphError::IndexOutOfRange {
                index,
                node_count: self.entries.len(),
            })
        }
    }
}

impl<N: PartialEq> Graph<N> {
    /// Construct from a sequence of nodes, skipping payloads already present.
    pub fn from_nodes<I: IntoIterator<Item = N>>(nodes: I) -> Self {
        let iter = nodes.into_iter();
        let (lower, _) = iter.size_hint();
        let mut graph = Self {
            nodes: Vec::with_capacity(lower),
            entries: Vec::with_capacity(lower),
        };
        graph.set_nodes(iter);
        graph
    }

    /// Add each node through [`Graph::add_node`]. Returns how many were added.
    pub fn set_nodes<I: IntoIterator<Item = N>>(&mut self, nodes: I) -> usize {
        let mut added = 0;
        for node in nodes {
            if self.add_node(node) {
                added += 1;
            }
        }
        added
    }

    /// Add a node, returning its index.
    pub fn try_add_node(&mut self, node: N) -> Result<usize, GraphError> {
        if self.has_node(&node) {
            return Err(GraphError::DuplicateNode);
        }
        self.nodes.push(node);
        self.entries.push(NodeEntry::default());
        Ok(self.entries.len() - 1)
    }

    /// Add a node. Fails without mutation if an equal node is registered.
    pub fn add_node(&mut self, node: N) -> bool {
        accepted("add_node", self.try_add_node(node).map(|_| ()))
    }

    /// Returns whether the node was registered.
    pub fn has_node(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// Index of the first node comparing equal to `node`.
    pub fn index_of(&self, node: &N) -> Option<usize> {
        self.nodes.iter().position(|n| n == node)
    }

    /// Returns true if the graph contains the edge `from -> to`.
    pub fn contains_edge(&self, from: &N, to: &N) -> bool {
        match (self.index_of(from), self.index_of(to)) {
            (Some(from), Some(to)) => self.contains_edge_by_indexes(from, to),
            _ => false,
        }
    }

    /// Add the edge `from -> to` by payload, naming the failure if rejected.
    pub fn try_add_edge(&mut self, from: &N, to: &N) -> Result<(), GraphError> {
        let (from, to) = self.resolve(from, to)?;
        self.try_add_edge_by_indexes(from, to)
    }

    /// Add the edge `from -> to` by payload.
    ///
    /// Fails if either payload is unknown or the edge already exists.
    pub fn add_edge(&mut self, from: &N, to: &N) -> bool {
        accepted("add_edge", self.try_add_edge(from, to))
    }

    /// Remove the edge `from -> to` by payload, naming the failure if rejected.
    pub fn try_remove_edge(&mut self, from: &N, to: &N) -> Result<(), GraphError> {
        let (from, to) = self.resolve(from, to)?;
        self.try_remove_edge_by_indexes(from, to)
    }

    /// Remove the edge `from -> to` by payload.
    pub fn remove_edge(&mut self, from: &N, to: &N) -> bool {
        accepted("remove_edge", self.try_remove_edge(from, to))
    }

    fn resolve(&self, from: &N, to: &N) -> Result<(usize, usize), GraphError> {
        let from = self.index_of(from).ok_or(GraphError::UnknownNode)?;
        let to = self.index_of(to).ok_or(GraphError::UnknownNode)?;
        Ok((from, to))
    }
}

impl<N: Serialize> Graph<N> {
    /// Canonical hash of the node payloads and adjacency, as hex.
    ///
    /// Equal for graphs with the same nodes and the same edge insertion order.
    pub fn fingerprint(&self) -> Result<String, GraphError> {
        crate::canonical::canonical_hash_hex(self)
    }
}

impl<N: PartialEq> FromIterator<N> for Graph<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self::from_nodes(iter)
    }
}

fn accepted(op: &'static str, outcome: Result<(), GraphError>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            trace!(op, error = %e, "graph mutation rejected");
            false
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Serialization
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct GraphReprRef<'a, N> {
    nodes: &'a [N],
    targets: Vec<&'a [usize]>,
}

#[derive(Deserialize)]
struct GraphRepr<N> {
    nodes: Vec<N>,
    #[serde(default)]
    targets: Vec<Vec<usize>>,
}

impl<N> TryFrom<GraphRepr<N>> for Graph<N> {
    type Error = GraphError;

    fn try_from(repr: GraphRepr<N>) -> Result<Self, Self::Error> {
        let count = repr.nodes.len();
        let mut targets = repr.targets;
        if targets.is_empty() {
            targets.resize_with(count, Vec::new);
        }
        if targets.len() != count {
            return Err(GraphError::InvalidSnapshot(format!(
                "{} target lists for {} nodes",
                targets.len(),
                count
            )));
        }

        for (from, list) in targets.iter().enumerate() {
            for (pos, &to) in list.iter().enumerate() {
                if to >= count {
                    return Err(GraphError::InvalidSnapshot(format!(
                        "edge {from} -> {to} targets a missing node"
                    )));
                }
                if list[..pos].contains(&to) {
                    return Err(GraphError::InvalidSnapshot(format!(
                        "duplicate edge {from} -> {to}"
                    )));
                }
            }
        }

        let entries = targets
            .into_iter()
            .map(|targets| NodeEntry { targets, color: Cell::default() })
            .collect();
        Ok(Self { nodes: repr.nodes, entries })
    }
}

impl<N: Serialize> Serialize for Graph<N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        GraphReprRef {
            nodes: &self.nodes,
            targets: self.entries.iter().map(|e| e.targets.as_slice()).collect(),
        }
        .serialize(serializer)
    }
}

impl<'de, N: Deserialize<'de>> Deserialize<'de> for Graph<N> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = GraphRepr::<N>::deserialize(deserializer)?;
        Graph::try_from(repr).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Graph<&'static str> {
        Graph::from_nodes(["a", "b", "c"])
    }

    #[test]
    fn test_add_node_rejects_duplicates() {
        let mut graph = Graph::new();
        assert!(graph.add_node("a"));
        assert!(graph.add_node("b"));
        assert!(!graph.add_node("a"));
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.index_of(&"b"), Some(1));
        assert!(matches!(graph.try_add_node("b"), Err(GraphError::DuplicateNode)));
    }

    #[test]
    fn test_checked_and_unchecked_construction_diverge() {
        let checked = Graph::from_nodes(["a", "b", "a"]);
        assert_eq!(checked.node_count(), 2);

        let collected: Graph<_> = ["a", "a"].into_iter().collect();
        assert_eq!(collected.node_count(), 1);

        let unchecked = Graph::from_list(vec!["a", "b", "a"]);
        assert_eq!(unchecked.node_count(), 3);
        // Lookup resolves to the first slot.
        assert_eq!(unchecked.index_of(&"a"), Some(0));
        assert_eq!(unchecked.node(2), Some(&"a"));
    }

    #[test]
    fn test_set_nodes_counts_added() {
        let mut graph = abc();
        assert_eq!(graph.set_nodes(["c", "d", "e"]), 2);
        assert_eq!(graph.nodes(), &["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn test_add_edge_is_idempotent_failing() {
        let mut graph = abc();
        assert!(!graph.has_edges());
        assert!(graph.add_edge(&"a", &"b"));
        assert!(!graph.add_edge(&"a", &"b"));
        assert!(graph.has_edges());
        assert!(graph.contains_edge(&"a", &"b"));
        assert!(!graph.contains_edge(&"b", &"a"));
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_edge_with_unknown_payload() {
        let mut graph = abc();
        assert!(!graph.add_edge(&"a", &"z"));
        assert!(matches!(graph.try_add_edge(&"z", &"a"), Err(GraphError::UnknownNode)));
        assert!(!graph.contains_edge(&"z", &"a"));
        assert!(!graph.remove_edge(&"a", &"z"));
    }

    #[test]
    fn test_out_of_range_indexes() {
        let mut graph = abc();
        assert!(!graph.add_edge_by_indexes(0, 3));
        assert!(!graph.add_edge_by_indexes(3, 0));
        assert!(!graph.remove_edge_by_indexes(7, 0));
        assert!(!graph.contains_edge_by_indexes(3, 0));
        assert!(!graph.contains_edge_by_indexes(0, 99));
        assert!(matches!(
            graph.try_add_edge_by_indexes(0, 3),
            Err(GraphError::IndexOutOfRange { index: 3, node_count: 3 })
        ));
        assert!(!graph.has_edges());
    }

    #[test]
    fn test_remove_then_add_restores_adjacency() {
        let mut graph = abc();
        graph.add_edge_by_indexes(0, 1);
        graph.add_edge_by_indexes(0, 2);
        graph.add_edge_by_indexes(1, 2);

        assert!(graph.remove_edge(&"a", &"b"));
        assert!(!graph.remove_edge(&"a", &"b"));
        assert!(matches!(
            graph.try_remove_edge_by_indexes(0, 1),
            Err(GraphError::MissingEdge { from: 0, to: 1 })
        ));
        assert_eq!(graph.targets(0), Some(&[2][..]));

        assert!(graph.add_edge(&"a", &"b"));
        assert!(graph.contains_edge(&"a", &"b"));
        assert!(graph.contains_edge(&"a", &"c"));
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn test_self_loop_allowed() {
        let mut graph = abc();
        assert!(graph.add_edge(&"b", &"b"));
        assert!(graph.contains_edge_by_indexes(1, 1));
        assert!(graph.edges().any(|e| e.is_self_loop()));
    }

    #[test]
    fn test_edges_in_insertion_order() {
        let mut graph = abc();
        graph.add_edge_by_indexes(1, 0);
        graph.add_edge_by_indexes(0, 2);
        graph.add_edge_by_indexes(0, 1);

        let edges: Vec<_> = graph.edges().map(|e| (e.from, e.to)).collect();
        assert_eq!(edges, vec![(0, 2), (0, 1), (1, 0)]);
    }

    #[test]
    fn test_clear_resets_indexes() {
        let mut graph = abc();
        graph.add_edge(&"a", &"c");
        graph.clear();
        assert!(graph.is_empty());
        assert!(!graph.has_edges());
        assert!(graph.add_node("c"));
        assert_eq!(graph.index_of(&"c"), Some(0));
    }

    #[test]
    fn test_serde_snapshot() {
        let mut graph = abc();
        graph.add_edge(&"a", &"b");
        graph.add_edge(&"c", &"a");

        let json = serde_json::to_string(&graph).unwrap();
        assert_eq!(json, r#"{"nodes":["a","b","c"],"targets":[[1],[],[0]]}"#);

        let back: Graph<String> = serde_json::from_str(&json).unwrap();
        assert_eq!(back.node_count(), 3);
        assert!(back.contains_edge_by_indexes(2, 0));
        assert_eq!(back.edge_count(), 2);
    }

    #[test]
    fn test_serde_without_targets() {
        let graph: Graph<String> = serde_json::from_str(r#"{"nodes":["x","y"]}"#).unwrap();
        assert_eq!(graph.node_count(), 2);
        assert!(!graph.has_edges());
    }

    #[test]
    fn test_serde_rejects_inconsistent_snapshots() {
        let bad = [
            r#"{"nodes":["x"],"targets":[[1]]}"#,
            r#"{"nodes":["x","y"],"targets":[[1]]}"#,
            r#"{"nodes":["x","y"],"targets":[[1,1],[]]}"#,
        ];
        for json in bad {
            let err = serde_json::from_str::<Graph<String>>(json).unwrap_err();
            assert!(err.to_string().contains("Invalid graph snapshot"), "{json}: {err}");
        }
    }

    #[test]
    fn test_fingerprint_tracks_edges() {
        let mut g1 = abc();
        let g2 = abc();
        assert_eq!(g1.fingerprint().unwrap(), g2.fingerprint().unwrap());

        g1.add_edge(&"a", &"b");
        assert_ne!(g1.fingerprint().unwrap(), g2.fingerprint().unwrap());
    }
}
