//! Traversal algorithms for task graphs.
//!
//! Ordering uses Kahn's algorithm with a min-heap keyed on insertion index,
//! so among tasks that are ready at the same time the one added first comes
//! first. The same graph always yields the same order.

use crate::{Error, GraphNode, NodeIndex, Result, TaskGraph, TaskNodeData};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A topologically sorted sequence of node indices.
///
/// Every dependency appears before the tasks that depend on it.
pub type TopologicalOrder = Vec<NodeIndex>;

impl<T: TaskNodeData> TaskGraph<T> {
    /// Run Kahn's algorithm, returning the ordered prefix and whether every
    /// node was reached.
    fn kahn(&self) -> (TopologicalOrder, bool) {
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();
        let mut ready: BinaryHeap<Reverse<NodeIndex>> = in_degree
            .iter()
            .enumerate()
            .filter(|&(_, &degree)| degree == 0)
            .map(|(i, _)| Reverse(NodeIndex(i)))
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(Reverse(node)) = ready.pop() {
            order.push(node);
            for &next in &self.successors[node.0] {
                in_degree[next.0] -= 1;
                if in_degree[next.0] == 0 {
                    ready.push(Reverse(next));
                }
            }
        }

        let complete = order.len() == self.nodes.len();
        (order, complete)
    }

    /// Check if the graph has cycles.
    #[must_use]
    pub fn has_cycles(&self) -> bool {
        !self.kahn().1
    }

    /// Names of tasks that sit on a cycle or downstream of one.
    ///
    /// Empty for an acyclic graph.
    #[must_use]
    pub fn unordered_tasks(&self) -> Vec<&str> {
        let (order, complete) = self.kahn();
        if complete {
            return Vec::new();
        }
        let mut seen = vec![false; self.nodes.len()];
        for node in order {
            seen[node.0] = true;
        }
        self.nodes
            .iter()
            .zip(seen)
            .filter(|(_, seen)| !seen)
            .map(|(node, _)| node.name.as_str())
            .collect()
    }

    /// Get node indices in topological order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] if the graph contains cycles.
    pub fn topological_order(&self) -> Result<TopologicalOrder> {
        let (order, complete) = self.kahn();
        if complete {
            Ok(order)
        } else {
            Err(Error::cycle_among(self.unordered_tasks()))
        }
    }

    /// Get node indices in reverse topological order (dependents first).
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] if the graph contains cycles.
    pub fn reverse_topological_order(&self) -> Result<TopologicalOrder> {
        let mut order = self.topological_order()?;
        order.reverse();
        Ok(order)
    }

    /// Get topologically sorted list of tasks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CycleDetected`] if the graph contains cycles.
    pub fn topological_sort(&self) -> Result<Vec<&GraphNode<T>>> {
        Ok(self
            .topological_order()?
            .into_iter()
            .map(|idx| &self.nodes[idx.0])
            .collect())
    }
}
