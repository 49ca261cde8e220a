//! Result of topologically sorting a graph.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of topologically sorting a graph: the nodes in order, or the nodes
/// implicated in a cyclic dependency.
///
/// On any graph with at least one node exactly one of the two lists is
/// non-empty. Sorting never fails outright; check [`SortResult::is_valid`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortResult<N> {
    /// Accepted ordering. For every edge `u -> v`, `u` precedes `v`.
    pub result: Vec<N>,
    /// Nodes implicated in a cycle, in insertion order.
    pub cyclic: Vec<N>,
}

impl<N> SortResult<N> {
    /// Create an accepted ordering.
    pub fn ordered(result: Vec<N>) -> Self {
        Self { result, cyclic: Vec::new() }
    }

    /// Create a cycle report.
    pub fn cyclic(cyclic: Vec<N>) -> Self {
        Self { result: Vec::new(), cyclic }
    }

    /// Whether the sort produced an ordering and found no cycle.
    ///
    /// An empty graph yields an invalid result.
    pub fn is_valid(&self) -> bool {
        !self.result.is_empty() && self.cyclic.is_empty()
    }

    /// Convert into the ordering, or a [`CycleError`] when invalid.
    pub fn into_result(self) -> Result<Vec<N>, CycleError<N>> {
        if self.is_valid() {
            Ok(self.result)
        } else {
            Err(CycleError { cyclic: self.cyclic })
        }
    }
}

impl<N> Default for SortResult<N> {
    fn default() -> Self {
        Self { result: Vec::new(), cyclic: Vec::new() }
    }
}

/// A sort that found no valid ordering.
///
/// `cyclic` is empty when the graph itself was empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleError<N> {
    /// Nodes implicated in a cycle, in insertion order.
    pub cyclic: Vec<N>,
}

impl<N> fmt::Display for CycleError<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cyclic.is_empty() {
            write!(f, "Graph has no nodes to order")
        } else {
            write!(f, "Cyclic dependencies among {} nodes", self.cyclic.len())
        }
    }
}

impl<N: fmt::Debug> std::error::Error for CycleError<N> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validity() {
        assert!(SortResult::ordered(vec!["a"]).is_valid());
        assert!(!SortResult::cyclic(vec!["a"]).is_valid());
        assert!(!SortResult::<&str>::default().is_valid());
    }

    #[test]
    fn test_into_result() {
        let ok = SortResult::ordered(vec![1, 2]).into_result();
        assert_eq!(ok.unwrap(), vec![1, 2]);

        let err = SortResult::cyclic(vec![3, 4]).into_result().unwrap_err();
        assert_eq!(err.cyclic, vec![3, 4]);
        assert_eq!(err.to_string(), "Cyclic dependencies among 2 nodes");

        let empty = SortResult::<u8>::default().into_result().unwrap_err();
        assert_eq!(empty.to_string(), "Graph has no nodes to order");
    }

    #[test]
    fn test_serde_shape() {
        let json = serde_json::to_string(&SortResult::ordered(vec!["a", "b"])).unwrap();
        assert_eq!(json, r#"{"result":["a","b"],"cyclic":[]}"#);
    }
}
