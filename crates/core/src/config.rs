//! Engine configuration: task catalog, cost model and simulation settings.
//!
//! Everything has a default, so an empty TOML document is a valid
//! configuration that analyses against [`Catalog::standard`].

use crate::cost::CostSettings;
use crate::simulation::SimulationOptions;
use crate::{Error, Result, Task};
use buildwise_task_graph::DependencyPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// An ordered list of task definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    tasks: Vec<Task>,
}

impl Catalog {
    /// Wrap a task list.
    #[must_use]
    pub const fn new(tasks: Vec<Task>) -> Self {
        Self { tasks }
    }

    /// The built-in residential construction catalog.
    #[must_use]
    pub fn standard() -> Self {
        let task = |id: &str, name: &str, coef: f64, workers: u32, cost: f64, deps: &[&str]| {
            Task::new(id, name, coef)
                .with_workers(workers)
                .with_cost_per_day(cost)
                .with_dependencies(deps.iter().copied())
        };

        Self::new(vec![
            task("T1", "Site Clearing & Preparation", 0.005, 4, 400.0, &[]),
            task("T2", "Excavation", 0.01, 6, 700.0, &["T1"]),
            task("T3", "Foundation Laying", 0.02, 10, 1200.0, &["T2"]),
            task("T4", "Plinth Beam & Slab", 0.015, 12, 1400.0, &["T3"]),
            task("T5", "Superstructure (Brickwork)", 0.03, 15, 1800.0, &["T4"]),
            task("T6", "Roof Slab Casting", 0.01, 20, 2500.0, &["T5"]),
            task("T7", "Door & Window Frames", 0.008, 4, 500.0, &["T5"]),
            task("T8", "Electrical Conduit Fitting", 0.005, 3, 450.0, &["T5"]),
            task("T9", "Plumbing Rough-ins", 0.005, 3, 450.0, &["T5"]),
            task(
                "T10",
                "Internal Plastering",
                0.015,
                10,
                1100.0,
                &["T6", "T7", "T8", "T9"],
            ),
            task("T11", "External Plastering", 0.015, 10, 1200.0, &["T6"]),
            task("T12", "Flooring & Tiling", 0.02, 8, 1000.0, &["T10"]),
            task("T13", "Painting & Finishing", 0.012, 6, 800.0, &["T11", "T12"]),
            task(
                "T14",
                "Electrical & Plumbing Fixtures",
                0.005,
                4,
                600.0,
                &["T13"],
            ),
            task("T15", "Site Cleanup & Handover", 0.003, 3, 300.0, &["T14"]),
        ])
    }

    /// Task definitions in catalog order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Number of tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Check ids are unique and numbers are usable.
    ///
    /// Dependency ids are not checked here; see
    /// [`EngineConfig::dependency_policy`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] describing the first bad task.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for task in &self.tasks {
            if task.id.is_empty() {
                return Err(Error::configuration("task id must not be empty"));
            }
            if !seen.insert(task.id.as_str()) {
                return Err(Error::configuration(format!(
                    "duplicate task id '{}'",
                    task.id
                )));
            }
            if !task.duration_coefficient.is_finite() || task.duration_coefficient < 0.0 {
                return Err(Error::configuration(format!(
                    "task '{}': duration_coefficient must be a non-negative number",
                    task.id
                )));
            }
            if !task.cost_per_day.is_finite() || task.cost_per_day < 0.0 {
                return Err(Error::configuration(format!(
                    "task '{}': cost_per_day must be a non-negative number",
                    task.id
                )));
            }
        }
        Ok(())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// What to do with dependency ids that match no task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownDependencies {
    /// Drop the edge and report a warning.
    #[default]
    Ignore,
    /// Fail the analysis.
    Reject,
}

impl UnknownDependencies {
    /// Graph policy for this setting.
    #[must_use]
    pub const fn policy(self) -> DependencyPolicy {
        match self {
            Self::Ignore => DependencyPolicy::Ignore,
            Self::Reject => DependencyPolicy::Reject,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Handling of unresolved dependency ids.
    pub dependency_policy: UnknownDependencies,

    /// Cost model parameters.
    pub cost: CostSettings,

    /// Monte Carlo settings.
    pub simulation: SimulationOptions,

    /// Task catalog, the standard one unless `[[tasks]]` is given.
    #[serde(rename = "tasks")]
    pub catalog: Catalog,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] when the document does not parse or
    /// does not validate.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)
            .map_err(|e| Error::configuration(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] when the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)
            .map_err(|e| Error::io(e, Some(path.to_path_buf()), "read configuration"))?;
        let config = Self::from_toml_str(&source)?;
        debug!(
            path = %path.display(),
            tasks = config.catalog.len(),
            "Loaded engine configuration"
        );
        Ok(config)
    }

    /// Serialize to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| Error::configuration(format!("cannot serialize configuration: {e}")))
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] describing the first problem.
    pub fn validate(&self) -> Result<()> {
        self.catalog.validate()?;

        let cost = &self.cost;
        if !cost.material_coefficient.is_finite() || cost.material_coefficient < 0.0 {
            return Err(Error::configuration(
                "cost.material_coefficient must be a non-negative number",
            ));
        }
        if !cost.overhead_rate.is_finite() || cost.overhead_rate < 0.0 {
            return Err(Error::configuration(
                "cost.overhead_rate must be a non-negative number",
            ));
        }
        if self.simulation.trials == 0 {
            return Err(Error::configuration("simulation.trials must be at least 1"));
        }
        Ok(())
    }
}
