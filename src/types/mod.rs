//! Value types for the graph kernel.

pub mod edge;
pub mod sort_result;

pub use edge::Edge;
pub use sort_result::{SortResult, CycleError};
