//! Data-quality warnings surfaced alongside analysis results.
//!
//! Warnings never stop an analysis. They flag results the caller should
//! treat with care.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A non-fatal problem found while analysing a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Warning {
    /// Backward pass produced negative slack; forward and backward passes disagree.
    InconsistentSchedule {
        /// Affected task id
        task: String,
        /// The negative slack that was computed
        slack: i64,
    },

    /// A dependency id did not match any task and was dropped.
    UnknownDependency {
        /// Task declaring the dependency
        task: String,
        /// Unresolved dependency id
        dependency: String,
    },

    /// The risk forecast could not be produced; the result is the infeasible sentinel.
    SimulationUnavailable {
        /// Why the simulation did not run
        reason: String,
    },

    /// The executive summary fell back to a placeholder.
    SummaryUnavailable {
        /// Provider id that was requested
        provider: String,
        /// Why the provider did not produce text
        reason: String,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InconsistentSchedule { task, slack } => {
                write!(f, "Task '{task}' has negative slack ({slack} days)")
            }
            Self::UnknownDependency { task, dependency } => {
                write!(f, "Task '{task}' depends on unknown task '{dependency}' (ignored)")
            }
            Self::SimulationUnavailable { reason } => {
                write!(f, "Risk simulation unavailable: {reason}")
            }
            Self::SummaryUnavailable { provider, reason } => {
                write!(f, "Summary from '{provider}' unavailable: {reason}")
            }
        }
    }
}
