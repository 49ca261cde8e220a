//! Deterministic topological sorting.
//!
//! The sorter runs a depth-first traversal over the [`Graph`] with an
//! explicit stack. Start nodes are taken in insertion order and targets in
//! edge insertion order, so the output depends only on insertion history.
//!
//! ## Algorithm
//!
//! 1. If the graph has no edges, return the nodes in reverse insertion order
//! 2. Reset every node to unvisited
//! 3. For each unvisited node, in index order, visit depth-first:
//!    - mark in-progress, then walk its targets
//!    - a done target is skipped
//!    - an in-progress target signals a cycle (see [`CycleReporting`])
//!    - once all targets are walked, mark done and append to the post-order
//! 4. If every node is done, emit the reverse post-order; otherwise report
//!    the nodes that never finished
//!
//! For every edge `u -> v` of an acyclic graph, `u` precedes `v` in the result.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::graph::{Color, Graph};
use crate::types::SortResult;

/// How a sort reports the nodes of a cyclic graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CycleReporting {
    /// Abandon the whole depth-first path on the first cycle and report every
    /// node that never finished.
    ///
    /// Every node on a cycle is reported, along with nodes upstream of a cycle
    /// and nodes that only reach one.
    #[default]
    Compatible,
    /// Run the full traversal and report only nodes on cycles closed by a back
    /// edge, sliced from the depth-first stack.
    ///
    /// Never reports a node that is not on a cycle, but a node sharing a cycle
    /// only through an already finished branch may be left out.
    Precise,
}

/// Configuration for [`Graph::topological_sort_with`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    /// Cycle reporting strategy.
    #[serde(default)]
    pub cycle_reporting: CycleReporting,
}

impl SortConfig {
    /// Configuration reporting only nodes found on cycles.
    pub fn precise() -> Self {
        Self {
            cycle_reporting: CycleReporting::Precise,
        }
    }
}

/// A node on the depth-first stack and the position of its next target.
#[derive(Debug, Clone, Copy)]
struct Frame {
    node: usize,
    next: usize,
}

impl Frame {
    fn new(node: usize) -> Self {
        Self { node, next: 0 }
    }
}

impl<N: Clone> Graph<N> {
    /// Topologically sort this graph with the default [`SortConfig`].
    ///
    /// Returns all nodes ordered so that every edge points forward, or the
    /// nodes implicated in a cycle.
    ///
    /// A graph without edges is returned in reverse insertion order and marked
    /// valid, with no ordering checks performed.
    pub fn topological_sort(&self) -> SortResult<N> {
        self.topological_sort_with(&SortConfig::default())
    }

    /// Topologically sort this graph.
    pub fn topological_sort_with(&self, config: &SortConfig) -> SortResult<N> {
        let size = self.node_count();

        if !self.has_edges() {
            trace!(nodes = size, "no edges, using reverse insertion order");
            return SortResult::ordered(self.nodes.iter().rev().cloned().collect());
        }

        for entry in &self.entries {
            entry.color.set(Color::Unvisited);
        }

        let mut post_order = Vec::with_capacity(size);
        let on_cycle = match config.cycle_reporting {
            CycleReporting::Compatible => {
                self.visit_all_aborting(&mut post_order);
                None
            }
            CycleReporting::Precise => Some(self.visit_all_precise(&mut post_order)),
        };

        let sorted = match on_cycle {
            None if post_order.len() == size => {
                SortResult::ordered(post_order.iter().rev().map(|&i| self.nodes[i].clone()).collect())
            }
            None => SortResult::cyclic(
                (0..size)
                    .filter(|&i| self.color_at(i) != Color::Done)
                    .map(|i| self.nodes[i].clone())
                    .collect(),
            ),
            Some(flags) if flags.iter().any(|&f| f) => SortResult::cyclic(
                flags
                    .iter()
                    .enumerate()
                    .filter(|&(_, &f)| f)
                    .map(|(i, _)| self.nodes[i].clone())
                    .collect(),
            ),
            Some(_) => {
                SortResult::ordered(post_order.iter().rev().map(|&i| self.nodes[i].clone()).collect())
            }
        };

        debug!(
            nodes = size,
            edges = self.edge_count(),
            valid = sorted.is_valid(),
            cyclic = sorted.cyclic.len(),
            mode = ?config.cycle_reporting,
            "topological sort finished"
        );
        sorted
    }
}

impl<N> Graph<N> {
    fn color_at(&self, index: usize) -> Color {
        self.entries[index].color.get()
    }

    fn set_color(&self, index: usize, color: Color) {
        self.entries[index].color.set(color);
    }

    fn visit_all_aborting(&self, post_order: &mut Vec<usize>) {
        let mut stack = Vec::new();
        for start in 0..self.node_count() {
            // Earlier visits may have finished or abandoned it.
            if self.color_at(start) == Color::Unvisited {
                self.visit_aborting(start, post_order, &mut stack);
            }
        }
    }

    /// Depth-first visit that abandons the whole path when it meets an
    /// in-progress node. Abandoned nodes stay in-progress for the rest of the
    /// sort, so later visits reaching them are abandoned too.
    fn visit_aborting(&self, start: usize, post_order: &mut Vec<usize>, stack: &mut Vec<Frame>) {
        self.set_color(start, Color::InProgress);
        stack.push(Frame::new(start));

        while let Some(frame) = stack.last_mut() {
            match self.entries[frame.node].targets.get(frame.next).copied() {
                Some(to) => {
                    frame.next += 1;
                    match self.color_at(to) {
                        Color::Unvisited => {
                            self.set_color(to, Color::InProgress);
                            stack.push(Frame::new(to));
                        }
                        Color::InProgress => {
                            trace!(from = frame.node, to, "cycle detected, abandoning path");
                            stack.clear();
                            return;
                        }
                        Color::Done => {}
                    }
                }
                None => {
                    let node = frame.node;
                    self.set_color(node, Color::Done);
                    post_order.push(node);
                    stack.pop();
                }
            }
        }
    }

    /// Full depth-first traversal. Returns per-node flags marking nodes on a
    /// cycle closed by a back edge.
    fn visit_all_precise(&self, post_order: &mut Vec<usize>) -> Vec<bool> {
        let mut on_cycle = vec![false; self.node_count()];
        let mut stack: Vec<Frame> = Vec::new();

        for start in 0..self.node_count() {
            if self.color_at(start) != Color::Unvisited {
                continue;
            }
            self.set_color(start, Color::InProgress);
            stack.push(Frame::new(start));

            while let Some(frame) = stack.last_mut() {
                match self.entries[frame.node].targets.get(frame.next).copied() {
                    Some(to) => {
                        frame.next += 1;
                        match self.color_at(to) {
                            Color::Unvisited => {
                                self.set_color(to, Color::InProgress);
                                stack.push(Frame::new(to));
                            }
                            Color::InProgress => {
                                // In-progress nodes are exactly the ones on the stack.
                                if let Some(pos) = stack.iter().rposition(|f| f.node == to) {
                                    for f in &stack[pos..] {
                                        on_cycle[f.node] = true;
                                    }
                                }
                            }
                            Color::Done => {}
                        }
                    }
                    None => {
                        let node = frame.node;
                        self.set_color(node, Color::Done);
                        post_order.push(node);
                        stack.pop();
                    }
                }
            }
        }

        on_cycle
    }
}
