//! Error types for the buildwise engine

use miette::Diagnostic;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for buildwise-core operations
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// The task dependencies form a cycle, so no schedule exists.
    #[error("Dependency cycle detected: {message}")]
    #[diagnostic(
        code(buildwise::core::cycle_detected),
        help("Remove one of the dependencies that closes the loop")
    )]
    CycleDetected {
        /// Description of the tasks that could not be ordered
        message: String,
    },

    /// Tasks reference dependencies that are not in the catalog.
    #[error("Unknown task dependencies: {}", format_missing(.missing))]
    #[diagnostic(
        code(buildwise::core::missing_dependencies),
        help("Fix the dependency ids or set `dependency_policy = \"ignore\"`")
    )]
    MissingDependencies {
        /// (task, dependency) pairs that did not resolve
        missing: Vec<(String, String)>,
    },

    /// A caller-supplied parameter is out of range.
    #[error("Invalid value for '{field}': {message}")]
    #[diagnostic(code(buildwise::core::invalid_input))]
    InvalidInput {
        /// Name of the offending parameter
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    #[diagnostic(code(buildwise::core::config::invalid))]
    Configuration {
        /// The error message describing the configuration issue
        message: String,
    },

    /// I/O error with path context
    #[error("I/O error during {operation}: {source}")]
    #[diagnostic(code(buildwise::core::io))]
    Io {
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
        /// The path where the I/O error occurred, if applicable
        path: Option<Box<Path>>,
        /// Description of the operation that failed
        operation: String,
    },

    /// A text summarizer could not produce a summary.
    #[error("Summary provider '{provider}' failed: {message}")]
    #[diagnostic(code(buildwise::core::summary))]
    Summary {
        /// Provider id the caller asked for
        provider: String,
        /// Reason reported by the provider
        message: String,
    },
}

impl Error {
    /// Create an invalid-input error for a named parameter
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error with a message
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an I/O error with context
    pub fn io(source: std::io::Error, path: Option<PathBuf>, operation: impl Into<String>) -> Self {
        Self::Io {
            source,
            path: path.map(PathBuf::into_boxed_path),
            operation: operation.into(),
        }
    }

    /// Create a summary error for a provider
    pub fn summary(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Summary {
            provider: provider.into(),
            message: message.into(),
        }
    }
}

impl From<buildwise_task_graph::Error> for Error {
    fn from(err: buildwise_task_graph::Error) -> Self {
        match err {
            buildwise_task_graph::Error::CycleDetected { message } => Self::CycleDetected { message },
            buildwise_task_graph::Error::MissingDependency { task, dependency } => {
                Self::MissingDependencies {
                    missing: vec![(task, dependency)],
                }
            }
            buildwise_task_graph::Error::MissingDependencies { missing } => {
                Self::MissingDependencies { missing }
            }
        }
    }
}

fn format_missing(missing: &[(String, String)]) -> String {
    missing
        .iter()
        .map(|(task, dep)| format!("{task} -> {dep}"))
        .collect::<Vec<_>>()
        .join(", ")
}
