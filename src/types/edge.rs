//! Edge type for the graph kernel.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Directed edge between two node slots, identified by index.
///
/// Edges are stored as adjacency membership inside [`Graph`](crate::Graph);
/// this type is the value view handed out by [`Graph::edges`](crate::Graph::edges).
/// Implements `Ord` for canonical ordering: (from, to).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Edge {
    /// Source node index.
    pub from: usize,
    /// Target node index.
    pub to: usize,
}

impl Edge {
    /// Create a new edge.
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }

    /// Whether the edge starts and ends at the same node.
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }
}

impl From<(usize, usize)> for Edge {
    fn from((from, to): (usize, usize)) -> Self {
        Self { from, to }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}
