//! Task graph builder over an index-based adjacency list.
//!
//! This module builds directed acyclic graphs (DAGs) from task definitions
//! to handle dependencies and determine processing order. Edges point from a
//! dependency to its dependent.

use crate::{Error, Result, TaskNodeData};
use std::collections::HashMap;
use std::fmt;
use std::ops::Index;
use tracing::debug;

/// Index of a node in a [`TaskGraph`].
///
/// Indices are assigned in insertion order and stay valid for the lifetime
/// of the graph (nodes are never removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// Position of the node in insertion order.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node in the task graph.
#[derive(Debug, Clone)]
pub struct GraphNode<T> {
    /// Name of the task.
    pub name: String,
    /// The task data.
    pub task: T,
}

/// How [`TaskGraph::add_dependency_edges`] treats dependency names that do
/// not match any task in the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DependencyPolicy {
    /// Drop the edge and keep going.
    #[default]
    Ignore,
    /// Fail with [`Error::MissingDependencies`].
    Reject,
}

/// A dependency name that did not resolve to a task while wiring edges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDependency {
    /// The task declaring the dependency.
    pub task: String,
    /// The unresolved dependency name.
    pub dependency: String,
}

/// Task graph for dependency resolution and ordering.
///
/// This is a generic graph that can hold any task type implementing [`TaskNodeData`].
/// Nodes are stored in an arena; successor and predecessor lists hold
/// [`NodeIndex`] values into that arena.
pub struct TaskGraph<T: TaskNodeData> {
    /// Node arena in insertion order.
    pub(crate) nodes: Vec<GraphNode<T>>,
    /// Outgoing edges (dependency -> dependents), indexed by node.
    pub(crate) successors: Vec<Vec<NodeIndex>>,
    /// Incoming edges (dependent <- dependencies), indexed by node.
    pub(crate) predecessors: Vec<Vec<NodeIndex>>,
    /// Map from task names to node indices.
    name_to_node: HashMap<String, NodeIndex>,
}

impl<T: TaskNodeData> TaskGraph<T> {
    /// Create a new empty task graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            successors: Vec::new(),
            predecessors: Vec::new(),
            name_to_node: HashMap::new(),
        }
    }

    /// Build a graph from named tasks and wire its dependency edges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDependencies`] when `policy` is
    /// [`DependencyPolicy::Reject`] and a dependency does not resolve.
    pub fn from_tasks<N>(
        tasks: impl IntoIterator<Item = (N, T)>,
        policy: DependencyPolicy,
    ) -> Result<Self>
    where
        N: AsRef<str>,
    {
        let mut graph = Self::new();
        for (name, task) in tasks {
            graph.add_task(name.as_ref(), task);
        }
        graph.add_dependency_edges(policy)?;
        Ok(graph)
    }

    /// Add a single task to the graph.
    ///
    /// If a task with the same name already exists, the new task is dropped
    /// and the existing node index is returned.
    pub fn add_task(&mut self, name: &str, task: T) -> NodeIndex {
        if let Some(&node) = self.name_to_node.get(name) {
            debug!("Task '{}' already present, keeping first definition", name);
            return node;
        }

        let node_index = NodeIndex(self.nodes.len());
        self.nodes.push(GraphNode {
            name: name.to_string(),
            task,
        });
        self.successors.push(Vec::new());
        self.predecessors.push(Vec::new());
        self.name_to_node.insert(name.to_string(), node_index);
        debug!("Added task node '{}'", name);

        node_index
    }

    /// Add dependency edges after all tasks have been added.
    ///
    /// Returns the dependency names that did not resolve. Under
    /// [`DependencyPolicy::Ignore`] those are simply not wired.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDependencies`] under [`DependencyPolicy::Reject`]
    /// if any task depends on a non-existent task. No edges are added in that case.
    pub fn add_dependency_edges(
        &mut self,
        policy: DependencyPolicy,
    ) -> Result<Vec<UnknownDependency>> {
        let mut unknown = Vec::new();
        let mut edges_to_add = Vec::new();

        for (index, node) in self.nodes.iter().enumerate() {
            for dep_name in node.task.dependency_names() {
                if let Some(&dep_index) = self.name_to_node.get(dep_name) {
                    edges_to_add.push((dep_index, NodeIndex(index)));
                } else {
                    debug!(
                        "Task '{}' depends on unknown task '{}'",
                        node.name, dep_name
                    );
                    unknown.push(UnknownDependency {
                        task: node.name.clone(),
                        dependency: dep_name.to_string(),
                    });
                }
            }
        }

        if policy == DependencyPolicy::Reject && !unknown.is_empty() {
            return Err(Error::MissingDependencies {
                missing: unknown
                    .into_iter()
                    .map(|u| (u.task, u.dependency))
                    .collect(),
            });
        }

        for (from, to) in edges_to_add {
            self.add_edge(from, to);
        }

        Ok(unknown)
    }

    /// Add a direct edge between two tasks.
    ///
    /// Repeated edges between the same pair are stored once.
    ///
    /// # Panics
    ///
    /// Panics if either index does not belong to this graph.
    pub fn add_edge(&mut self, from: NodeIndex, to: NodeIndex) {
        if self.successors[from.0].contains(&to) {
            return;
        }
        self.successors[from.0].push(to);
        self.predecessors[to.0].push(from);
    }

    /// Get a task node by index.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&GraphNode<T>> {
        self.nodes.get(index.0)
    }

    /// Get a reference to a task node by name.
    #[must_use]
    pub fn get_node_by_name(&self, name: &str) -> Option<&GraphNode<T>> {
        self.name_to_node
            .get(name)
            .and_then(|&idx| self.nodes.get(idx.0))
    }

    /// Nodes this task depends on.
    #[must_use]
    pub fn predecessors(&self, index: NodeIndex) -> &[NodeIndex] {
        self.predecessors.get(index.0).map_or(&[], Vec::as_slice)
    }

    /// Nodes that depend on this task.
    #[must_use]
    pub fn successors(&self, index: NodeIndex) -> &[NodeIndex] {
        self.successors.get(index.0).map_or(&[], Vec::as_slice)
    }

    /// Get the number of tasks in the graph.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of dependency edges in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(Vec::len).sum()
    }

    /// Whether the graph holds no tasks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Check if a task exists in the graph.
    #[must_use]
    pub fn contains_task(&self, name: &str) -> bool {
        self.name_to_node.contains_key(name)
    }

    /// Get the node index for a task by name.
    #[must_use]
    pub fn get_node_index(&self, name: &str) -> Option<NodeIndex> {
        self.name_to_node.get(name).copied()
    }

    /// Iterate over all nodes in insertion order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = (NodeIndex, &GraphNode<T>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeIndex(i), node))
    }
}

impl<T: TaskNodeData> Default for TaskGraph<T> {
    fn default() -> Self {
        Self::new()
    }
}

// Shows structure only, so payloads need not implement `Debug`.
impl<T: TaskNodeData> fmt::Debug for TaskGraph<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskGraph")
            .field(
                "nodes",
                &self.nodes.iter().map(|node| &node.name).collect::<Vec<_>>(),
            )
            .field("edges", &self.edge_count())
            .finish()
    }
}

impl<T: TaskNodeData> Index<NodeIndex> for TaskGraph<T> {
    type Output = GraphNode<T>;

    fn index(&self, index: NodeIndex) -> &Self::Output {
        &self.nodes[index.0]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Simple test task implementation
    #[derive(Clone, Debug, Default)]
    struct TestTask {
        depends_on: Vec<String>,
    }

    impl TestTask {
        fn new(deps: &[&str]) -> Self {
            Self {
                depends_on: deps.iter().map(|s| (*s).to_string()).collect(),
            }
        }
    }

    impl TaskNodeData for TestTask {
        fn dependency_names(&self) -> impl Iterator<Item = &str> {
            self.depends_on.iter().map(String::as_str)
        }
    }

    #[test]
    fn test_task_graph_new() {
        let graph: TaskGraph<TestTask> = TaskGraph::new();
        assert_eq!(graph.task_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn test_add_single_task() {
        let mut graph = TaskGraph::new();

        let node = graph.add_task("test", TestTask::new(&[]));
        assert!(graph.contains_task("test"));
        assert_eq!(graph.task_count(), 1);

        // Adding same task again should return same node
        let node2 = graph.add_task("test", TestTask::new(&["other"]));
        assert_eq!(node, node2);
        assert_eq!(graph.task_count(), 1);
        assert!(graph.get_node_by_name("test").unwrap().task.depends_on.is_empty());
    }

    #[test]
    fn test_edges_point_from_dependency_to_dependent() {
        let mut graph = TaskGraph::new();
        let a = graph.add_task("a", TestTask::new(&[]));
        let b = graph.add_task("b", TestTask::new(&["a"]));
        graph.add_dependency_edges(DependencyPolicy::Ignore).unwrap();

        assert_eq!(graph.successors(a), &[b]);
        assert_eq!(graph.predecessors(b), &[a]);
        assert!(graph.predecessors(a).is_empty());
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_unknown_dependency_ignored() {
        let mut graph = TaskGraph::new();
        graph.add_task("a", TestTask::new(&["ghost"]));
        graph.add_task("b", TestTask::new(&["a"]));

        let unknown = graph.add_dependency_edges(DependencyPolicy::Ignore).unwrap();
        assert_eq!(
            unknown,
            vec![UnknownDependency {
                task: "a".to_string(),
                dependency: "ghost".to_string(),
            }]
        );
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_unknown_dependency_rejected() {
        let mut graph = TaskGraph::new();
        graph.add_task("a", TestTask::new(&["ghost"]));
        graph.add_task("b", TestTask::new(&["a"]));

        let err = graph
            .add_dependency_edges(DependencyPolicy::Reject)
            .unwrap_err();
        assert_eq!(
            err,
            Error::MissingDependencies {
                missing: vec![("a".to_string(), "ghost".to_string())],
            }
        );
        assert_eq!(graph.edge_count(), 0);
    }

    #[test]
    fn test_duplicate_dependency_single_edge() {
        let mut graph = TaskGraph::new();
        graph.add_task("a", TestTask::new(&[]));
        graph.add_task("b", TestTask::new(&["a", "a"]));
        graph.add_dependency_edges(DependencyPolicy::Ignore).unwrap();

        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn test_from_tasks() {
        let graph = TaskGraph::from_tasks(
            [
                ("site", TestTask::new(&[])),
                ("dig", TestTask::new(&["site"])),
            ],
            DependencyPolicy::Reject,
        )
        .unwrap();

        assert_eq!(graph.task_count(), 2);
        let dig = graph.get_node_index("dig").unwrap();
        assert_eq!(dig.index(), 1);
        assert_eq!(graph.predecessors(dig).len(), 1);
    }

    #[test]
    fn test_debug_lists_names_and_edge_count() {
        let mut graph = TaskGraph::new();
        graph.add_task("a", TestTask::new(&[]));
        graph.add_task("b", TestTask::new(&["a"]));
        graph
            .add_dependency_edges(DependencyPolicy::Ignore)
            .unwrap();

        assert_eq!(
            format!("{graph:?}"),
            r#"TaskGraph { nodes: ["a", "b"], edges: 1 }"#
        );
    }

    #[test]
    fn test_out_of_range_index_has_no_neighbours() {
        let graph: TaskGraph<TestTask> = TaskGraph::new();
        assert!(graph.successors(NodeIndex(3)).is_empty());
        assert!(graph.node(NodeIndex(3)).is_none());
    }
}
