//! Task graph DAG algorithms and dependency resolution for buildwise.
//!
//! This crate provides a small directed acyclic graph (DAG) implementation
//! for task dependency resolution and ordering. Nodes live in an arena and
//! edges are stored as index lists, so traversal order is fully owned and
//! deterministic.
//!
//! # Key Types
//!
//! - [`TaskGraph`]: The main graph structure for building and querying task dependencies
//! - [`TaskNodeData`]: Trait that task types must implement to be stored in the graph
//! - [`GraphNode`]: A node in the graph containing the task name and data
//! - [`DependencyPolicy`]: How unknown dependency names are treated while wiring edges
//!
//! # Example
//!
//! ```ignore
//! use buildwise_task_graph::{DependencyPolicy, TaskGraph, TaskNodeData};
//!
//! struct MyTask {
//!     depends_on: Vec<String>,
//! }
//!
//! impl TaskNodeData for MyTask {
//!     fn dependency_names(&self) -> impl Iterator<Item = &str> {
//!         self.depends_on.iter().map(String::as_str)
//!     }
//! }
//!
//! let mut graph = TaskGraph::new();
//! graph.add_task("excavation", MyTask { depends_on: vec![] });
//! graph.add_task("foundation", MyTask { depends_on: vec!["excavation".to_string()] });
//! graph.add_dependency_edges(DependencyPolicy::Ignore)?;
//!
//! let sorted = graph.topological_sort()?;
//! ```

mod error;
mod graph;
mod traversal;

pub use error::{Error, Result};
pub use graph::{DependencyPolicy, GraphNode, NodeIndex, TaskGraph, UnknownDependency};
pub use traversal::TopologicalOrder;

/// Trait for task data that can be stored in the task graph.
///
/// Implement this trait for your task type to enable it to be stored
/// in a [`TaskGraph`] and participate in dependency resolution.
pub trait TaskNodeData {
    /// Returns the names of tasks this task depends on.
    fn dependency_names(&self) -> impl Iterator<Item = &str>;
}
