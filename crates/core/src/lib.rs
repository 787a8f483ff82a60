//! Scheduling and risk analysis engine for buildwise.
//!
//! The engine turns a catalog of interdependent tasks and a project scale
//! into:
//!
//! - a deterministic earliest-start schedule ([`scheduler`]),
//! - critical-path analytics with late dates and slack ([`critical_path`]),
//! - a Monte Carlo duration forecast with deadline risk ([`simulation`]).
//!
//! Around that core sit the collaborators that consume its output: cost
//! aggregation ([`cost`]), constraint checks ([`constraints`]) and text
//! summaries ([`summary`]). [`analysis::analyze_project`] wires everything
//! into a single report.
//!
//! Every analysis is request-scoped: inputs are borrowed, outputs are owned,
//! and nothing is shared between calls.

pub mod analysis;
pub mod config;
pub mod constraints;
pub mod cost;
pub mod critical_path;
mod error;
pub mod project;
pub mod scheduler;
pub mod simulation;
pub mod summary;
pub mod task;
pub mod warning;

pub use analysis::{FeasibilityStatus, ProjectReport, analyze_project};
pub use config::{Catalog, EngineConfig};
pub use critical_path::{CriticalPathReport, TaskAnalytics, analyze_critical_path};
pub use error::{Error, Result};
pub use project::ProjectInput;
pub use scheduler::{LAST_DAY, Schedule, ScheduleEntry, schedule};
pub use simulation::{SimulationOptions, SimulationResult, simulate_risk};
pub use summary::{SummarizerRegistry, TextSummarizer};
pub use task::Task;
pub use warning::Warning;
