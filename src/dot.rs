//! DOT export for graph visualization.
//!
//! Renders one `"from" -> "to"` line per edge, per source in insertion order
//! and per target in edge insertion order, framed by `digraph D {` and `}`.
//! Node names come from a caller-supplied function, since payloads carry no
//! display form of their own.

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::GraphError;
use crate::graph::Graph;

/// Configuration for DOT output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DotConfig {
    /// Graph identifier after `digraph`.
    pub graph_name: String,
    /// Escape quotes, backslashes and newlines in node names.
    pub escape_names: bool,
}

impl Default for DotConfig {
    fn default() -> Self {
        Self {
            graph_name: "D".to_string(),
            escape_names: false,
        }
    }
}

/// Escapes a string for use inside a quoted DOT identifier.
pub fn escape_dot(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "")
}

impl<N> Graph<N> {
    /// Write the DOT form of this graph with the default [`DotConfig`].
    pub fn write_dot<W, F, S>(&self, out: &mut W, name: F) -> fmt::Result
    where
        W: fmt::Write,
        F: Fn(&N) -> S,
        S: fmt::Display,
    {
        self.write_dot_with(&DotConfig::default(), out, name)
    }

    /// Write the DOT form of this graph.
    pub fn write_dot_with<W, F, S>(&self, config: &DotConfig, out: &mut W, name: F) -> fmt::Result
    where
        W: fmt::Write,
        F: Fn(&N) -> S,
        S: fmt::Display,
    {
        let label = |node: &N| {
            let text = name(node).to_string();
            if config.escape_names {
                escape_dot(&text)
            } else {
                text
            }
        };

        writeln!(out, "digraph {} {{", config.graph_name)?;
        for (node, entry) in self.nodes.iter().zip(&self.entries) {
            if entry.targets.is_empty() {
                continue;
            }
            let from = label(node);
            for &to in &entry.targets {
                writeln!(out, "\"{}\" -> \"{}\"", from, label(&self.nodes[to]))?;
            }
        }
        writeln!(out, "}}")
    }

    /// DOT form of this graph with the default [`DotConfig`].
    pub fn format_dot<F, S>(&self, name: F) -> String
    where
        F: Fn(&N) -> S,
        S: fmt::Display,
    {
        self.format_dot_with(&DotConfig::default(), name)
    }

    /// DOT form of this graph.
    pub fn format_dot_with<F, S>(&self, config: &DotConfig, name: F) -> String
    where
        F: Fn(&N) -> S,
        S: fmt::Display,
    {
        let mut dot = String::new();
        // Writing to a String cannot fail.
        let _ = self.write_dot_with(config, &mut dot, name);
        dot
    }

    /// Dump the DOT form of this graph to a file.
    pub fn dump_dot<P, F, S>(&self, path: P, name: F) -> Result<(), GraphError>
    where
        P: AsRef<Path>,
        F: Fn(&N) -> S,
        S: fmt::Display,
    {
        let path = path.as_ref();
        let dot = self.format_dot(name);
        std::fs::write(path, dot.as_bytes())?;
        info!(path = %path.display(), edges = self.edge_count(), "wrote DOT graph");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Graph<&'static str> {
        let mut graph = Graph::from_nodes(["a", "b", "c"]);
        graph.add_edge(&"b", &"c");
        graph.add_edge(&"a", &"c");
        graph.add_edge(&"a", &"b");
        graph
    }

    #[test]
    fn test_format_dot() {
        let dot = abc().format_dot(|n| *n);
        assert_eq!(
            dot,
            "digraph D {\n\"a\" -> \"c\"\n\"a\" -> \"b\"\n\"b\" -> \"c\"\n}\n"
        );
    }

    #[test]
    fn test_format_dot_without_edges() {
        let graph = Graph::from_nodes(["a", "b"]);
        assert_eq!(graph.format_dot(|n| *n), "digraph D {\n}\n");
    }

    #[test]
    fn test_name_function_is_applied() {
        let mut graph = Graph::from_nodes([1u32, 2]);
        graph.add_edge(&2, &1);
        assert_eq!(
            graph.format_dot(|n| format!("node{n}")),
            "digraph D {\n\"node2\" -> \"node1\"\n}\n"
        );
    }

    #[test]
    fn test_escaping_is_opt_in() {
        let mut graph = Graph::from_nodes(["say \"hi\"", "x"]);
        graph.add_edge_by_indexes(0, 1);

        let raw = graph.format_dot(|n| *n);
        assert!(raw.contains("\"say \"hi\"\" -> \"x\""));

        let config = DotConfig {
            graph_name: "deps".to_string(),
            escape_names: true,
        };
        let escaped = graph.format_dot_with(&config, |n| *n);
        assert!(escaped.starts_with("digraph deps {\n"));
        assert!(escaped.contains("\"say \\\"hi\\\"\" -> \"x\""));
    }

    #[test]
    fn test_escape_dot() {
        assert_eq!(escape_dot("hello"), "hello");
        assert_eq!(escape_dot("path\\to"), "path\\\\to");
        assert_eq!(escape_dot("line1\r\nline2"), "line1\\nline2");
    }

    #[test]
    fn test_dump_dot() {
        let path = std::env::temp_dir().join(format!("depgraph_dump_{}.dot", std::process::id()));
        abc().dump_dot(&path, |n| *n).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(written, abc().format_dot(|n| *n));
    }

    #[test]
    fn test_dump_dot_reports_io_errors() {
        let path = std::env::temp_dir().join("depgraph_missing_dir").join("out.dot");
        let err = abc().dump_dot(&path, |n| *n).unwrap_err();
        assert!(matches!(err, GraphError::Io(_)));
    }
}
