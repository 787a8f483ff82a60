//! Error types for task graph operations.

use std::fmt;

/// Result type for task graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during task graph operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A dependency cycle was detected in the graph.
    CycleDetected {
        /// Human-readable description of the cycle.
        message: String,
    },

    /// A task depends on another task that doesn't exist.
    MissingDependency {
        /// The task that has the missing dependency.
        task: String,
        /// The name of the missing dependency.
        dependency: String,
    },

    /// Multiple missing dependencies were found.
    MissingDependencies {
        /// List of (task, missing_dependency) pairs.
        missing: Vec<(String, String)>,
    },
}

impl Error {
    /// Build a cycle error naming the tasks that could not be ordered.
    pub(crate) fn cycle_among<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let names: Vec<&str> = names.into_iter().collect();
        Self::CycleDetected {
            message: format!(
                "{} task(s) could not be ordered: {}",
                names.len(),
                names.join(", ")
            ),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CycleDetected { message } => {
                write!(f, "Cycle detected in task graph: {message}")
            }
            Self::MissingDependency { task, dependency } => {
                write!(f, "Task '{task}' depends on missing task '{dependency}'")
            }
            Self::MissingDependencies { missing } => {
                let list = missing
                    .iter()
                    .map(|(task, dep)| format!("Task '{task}' depends on missing task '{dep}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(f, "Missing dependencies: {list}")
            }
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_message_lists_tasks() {
        let err = Error::cycle_among(["a", "b"]);
        assert_eq!(
            err.to_string(),
            "Cycle detected in task graph: 2 task(s) could not be ordered: a, b"
        );
    }

    #[test]
    fn test_missing_dependencies_display() {
        let err = Error::MissingDependencies {
            missing: vec![
                ("t2".to_string(), "t9".to_string()),
                ("t3".to_string(), "t8".to_string()),
            ],
        };
        let msg = err.to_string();
        assert!(msg.contains("Task 't2' depends on missing task 't9'"));
        assert!(msg.contains("Task 't3' depends on missing task 't8'"));
    }
}
