//! # depgraph-kernel
//!
//! Insertion-ordered directed graph with deterministic topological sorting.
//!
//! The kernel answers one question:
//!
//! > Given a set of opaque nodes and their dependency edges, in which order
//! > can they be processed, or which of them are caught in a cycle?
//!
//! ## Core Contract
//!
//! 1. Nodes are opaque `PartialEq` payloads with stable insertion indices
//! 2. Edges are unique per `(from, to)` pair and kept in insertion order
//! 3. Sorting yields an order where every edge points forward, or a cycle report
//! 4. Mutation reports failure as `bool` (with `try_` twins returning [`GraphError`])
//!
//! ## Architecture
//!
//! ```text
//! producer → Graph (nodes + adjacency) → topological_sort → SortResult → consumer
//!                       ↓
//!             format_dot / Display (diagnostics)
//! ```
//!
//! ## Determinism Guarantees
//!
//! - Same insertion history → identical sort result
//! - Start nodes are taken in insertion order, targets in edge insertion order
//! - A graph without edges sorts to the reverse of insertion order
//!
//! The store keeps per-node traversal state in `Cell`s and is not `Sync`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod types;
pub mod error;
pub mod graph;
pub mod sorter;
pub mod dot;
pub mod format;
pub mod canonical;

// Re-exports
pub use types::{Edge, SortResult, CycleError};
pub use error::GraphError;
pub use graph::Graph;
pub use sorter::{SortConfig, CycleReporting};
pub use dot::{DotConfig, escape_dot};
pub use format::{GraphDisplay, SortResultDisplay};
pub use canonical::{to_canonical_bytes, canonical_hash, canonical_hash_hex};

/// Schema version of the serialized graph snapshot.
/// Increment on breaking changes to the snapshot layout.
pub const GRAPH_SNAPSHOT_SCHEMA_VERSION: &str = "1.0.0";
