//! Task definitions and the dependency network built from them.

use crate::Result;
use buildwise_task_graph::{DependencyPolicy, TaskGraph, TaskNodeData, UnknownDependency};
use serde::{Deserialize, Serialize};

/// A unit of work in a project.
///
/// Durations scale with the project: a task lasts
/// `duration_coefficient * scale` days, rounded up to whole days.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique key, referenced by other tasks' `dependencies`.
    pub id: String,

    /// Human-readable label.
    #[serde(default)]
    pub name: String,

    /// Days of work per unit of project scale.
    pub duration_coefficient: f64,

    /// Workers on site every day the task runs.
    #[serde(default)]
    pub required_workers: u32,

    /// Labor cost per working day.
    #[serde(default)]
    pub cost_per_day: f64,

    /// Ids of tasks that must finish before this one starts.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
}

impl Task {
    /// Create a task with no workers, no cost and no dependencies.
    pub fn new(id: impl Into<String>, name: impl Into<String>, duration_coefficient: f64) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            duration_coefficient,
            required_workers: 0,
            cost_per_day: 0.0,
            dependencies: Vec::new(),
        }
    }

    /// Set the crew size.
    #[must_use]
    pub fn with_workers(mut self, required_workers: u32) -> Self {
        self.required_workers = required_workers;
        self
    }

    /// Set the daily labor cost.
    #[must_use]
    pub fn with_cost_per_day(mut self, cost_per_day: f64) -> Self {
        self.cost_per_day = cost_per_day;
        self
    }

    /// Set the dependency ids.
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Label for reports: the name, or the id when no name is set.
    #[must_use]
    pub fn label(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}

impl TaskNodeData for &Task {
    fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(String::as_str)
    }
}

/// Dependency graph over borrowed tasks, one node per task id.
pub type TaskNetwork<'a> = TaskGraph<&'a Task>;

/// Build the dependency network for a task list.
///
/// Node order follows `tasks`; a repeated id keeps its first definition.
/// Returns the network with any dependency ids that did not resolve (only
/// possible under [`DependencyPolicy::Ignore`]).
///
/// # Errors
///
/// Returns [`crate::Error::MissingDependencies`] under
/// [`DependencyPolicy::Reject`] when a dependency id is unknown.
pub fn build_network(
    tasks: &[Task],
    policy: DependencyPolicy,
) -> Result<(TaskNetwork<'_>, Vec<UnknownDependency>)> {
    let mut graph = TaskGraph::new();
    for task in tasks {
        graph.add_task(&task.id, task);
    }
    let unknown = graph.add_dependency_edges(policy)?;
    Ok((graph, unknown))
}
