//! Error types for the graph kernel.
//!
//! Mutation on [`Graph`](crate::Graph) reports failure as `bool`; the `try_`
//! variants surface the same conditions as [`GraphError`] so callers can tell
//! them apart.

/// Error type for graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A node comparing equal to the payload is already registered.
    #[error("Node already present in graph")]
    DuplicateNode,
    /// An index does not reference an allocated node slot.
    #[error("Node index {index} out of range (node count {node_count})")]
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of allocated node slots.
        node_count: usize,
    },
    /// The edge is already present.
    #[error("Edge {from} -> {to} already exists")]
    DuplicateEdge {
        /// Source index.
        from: usize,
        /// Target index.
        to: usize,
    },
    /// The edge to remove is not present.
    #[error("Edge {from} -> {to} not found")]
    MissingEdge {
        /// Source index.
        from: usize,
        /// Target index.
        to: usize,
    },
    /// A payload could not be resolved to a node index.
    #[error("Node not found in graph")]
    UnknownNode,
    /// A deserialized snapshot is structurally inconsistent.
    #[error("Invalid graph snapshot: {0}")]
    InvalidSnapshot(String),
    /// I/O failure while writing a dump.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Canonical serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
