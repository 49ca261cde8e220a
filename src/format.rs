//! Human-readable debug dumps of graphs and sort results.
//!
//! ```text
//! Graph(nodes[3] = (a -> [b, c], b -> [c], c))
//! SortResult(Valid, [a, b, c])
//! SortResult(Invalid, cyclic dependencies: [a, b])
//! ```
//!
//! Payloads implementing `Display` get `Display` impls directly; any other
//! payload can be rendered through `display_with` and a naming function.

use std::fmt;

use crate::graph::Graph;
use crate::types::SortResult;

fn write_list<T, I, W>(f: &mut fmt::Formatter<'_>, items: I, mut write_item: W) -> fmt::Result
where
    I: IntoIterator<Item = T>,
    W: FnMut(T, &mut fmt::Formatter<'_>) -> fmt::Result,
{
    f.write_str("[")?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write_item(item, f)?;
    }
    f.write_str("]")
}

impl<N> Graph<N> {
    /// Debug dump of this graph, naming nodes with `name`.
    pub fn display_with<F, S>(&self, name: F) -> GraphDisplay<'_, N, F>
    where
        F: Fn(&N) -> S,
        S: fmt::Display,
    {
        GraphDisplay { graph: self, name }
    }

    fn fmt_nodes<W>(&self, f: &mut fmt::Formatter<'_>, write_node: W) -> fmt::Result
    where
        W: Fn(&N, &mut fmt::Formatter<'_>) -> fmt::Result,
    {
        write!(f, "nodes[{}] = (", self.node_count())?;
        for (i, (node, entry)) in self.nodes.iter().zip(&self.entries).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write_node(node, f)?;
            if !entry.targets.is_empty() {
                f.write_str(" -> ")?;
                write_list(f, &entry.targets, |&t, f| write_node(&self.nodes[t], f))?;
            }
        }
        f.write_str(")")
    }
}

/// Debug dump of a [`Graph`] with caller-supplied node names.
pub struct GraphDisplay<'a, N, F> {
    graph: &'a Graph<N>,
    name: F,
}

impl<N, F, S> fmt::Display for GraphDisplay<'_, N, F>
where
    F: Fn(&N) -> S,
    S: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Graph(")?;
        self.graph.fmt_nodes(f, |n, f| write!(f, "{}", (self.name)(n)))?;
        f.write_str(")")
    }
}

impl<N: fmt::Display> fmt::Display for Graph<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Graph(")?;
        self.fmt_nodes(f, |n, f| fmt::Display::fmt(n, f))?;
        f.write_str(")")
    }
}

impl<N> SortResult<N> {
    /// Debug form of this result, naming nodes with `name`.
    pub fn display_with<F, S>(&self, name: F) -> SortResultDisplay<'_, N, F>
    where
        F: Fn(&N) -> S,
        S: fmt::Display,
    {
        SortResultDisplay { result: self, name }
    }

    fn fmt_outcome<W>(&self, f: &mut fmt::Formatter<'_>, write_node: W) -> fmt::Result
    where
        W: Fn(&N, &mut fmt::Formatter<'_>) -> fmt::Result,
    {
        f.write_str("SortResult(")?;
        if self.is_valid() {
            f.write_str("Valid, ")?;
            write_list(f, &self.result, &write_node)?;
        } else {
            f.write_str("Invalid, cyclic dependencies: ")?;
            write_list(f, &self.cyclic, &write_node)?;
        }
        f.write_str(")")
    }
}

/// Debug form of a [`SortResult`] with caller-supplied node names.
pub struct SortResultDisplay<'a, N, F> {
    result: &'a SortResult<N>,
    name: F,
}

impl<N, F, S> fmt::Display for SortResultDisplay<'_, N, F>
where
    F: Fn(&N) -> S,
    S: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.result.fmt_outcome(f, |n, f| write!(f, "{}", (self.name)(n)))
    }
}

impl<N: fmt::Display> fmt::Display for SortResult<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_outcome(f, |n, f| fmt::Display::fmt(n, f))
    }
}
