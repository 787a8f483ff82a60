//! End-to-end project analysis.

use crate::constraints::check_feasibility;
use crate::cost::{CostEstimate, estimate_cost};
use crate::critical_path::{TaskAnalytics, analyze_critical_path};
use crate::scheduler::schedule_network;
use crate::simulation::{SimulationResult, simulate_network};
use crate::summary::{ReportData, SummarizerRegistry, summarize_or_fallback};
use crate::task::build_network;
use crate::{EngineConfig, ProjectInput, Result, Schedule, Warning};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

/// Overall feasibility of the plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FeasibilityStatus {
    /// Every constraint holds.
    Feasible,
    /// At least one constraint is violated.
    Infeasible,
}

/// Everything an analysis produces, ready to serialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectReport {
    /// Earliest-start schedule.
    pub deterministic_schedule: Schedule,
    /// Project length in days.
    pub total_duration: u64,
    /// Zero-slack task ids ordered by start.
    pub critical_path_tasks: Vec<String>,
    /// Per-task early/late dates and slack.
    pub task_analytics: IndexMap<String, TaskAnalytics>,
    /// Total cost including overhead.
    pub total_cost: f64,
    /// Full cost breakdown.
    pub cost_breakdown: CostEstimate,
    /// Feasible when no constraint is violated.
    pub feasibility_status: FeasibilityStatus,
    /// Constraint violation texts.
    pub constraint_issues: Vec<String>,
    /// Suggested remedies.
    pub optimization_suggestions: Vec<String>,
    /// Highest daily workforce demand.
    pub peak_workforce: u64,
    /// Monte Carlo forecast, or the infeasible sentinel.
    pub simulation_results: SimulationResult,
    /// Non-fatal data-quality findings.
    pub warnings: Vec<Warning>,
    /// Executive summary text.
    pub executive_summary: String,
}

/// Run every analysis stage for a project.
///
/// Scheduling failures are terminal. A failed simulation degrades to
/// [`SimulationResult::infeasible`] and an unavailable summary provider to a
/// placeholder text; both add a [`Warning`].
///
/// # Errors
///
/// Returns [`crate::Error::InvalidInput`] for bad project parameters,
/// [`crate::Error::MissingDependencies`] when the configuration rejects
/// unknown dependencies and one is found, and
/// [`crate::Error::CycleDetected`] when no schedule exists.
#[instrument(skip_all, fields(area = input.area, deadline = input.deadline))]
pub fn analyze_project(
    config: &EngineConfig,
    input: &ProjectInput,
    registry: &SummarizerRegistry,
) -> Result<ProjectReport> {
    input.validate()?;
    let tasks = config.catalog.tasks();

    let (network, unknown) = build_network(tasks, config.dependency_policy.policy())?;
    let mut warnings: Vec<Warning> = unknown
        .into_iter()
        .map(|u| {
            warn!(task = %u.task, dependency = %u.dependency, "Ignoring unknown dependency");
            Warning::UnknownDependency {
                task: u.task,
                dependency: u.dependency,
            }
        })
        .collect();

    let schedule = schedule_network(&network, input.area)?;
    let critical = analyze_critical_path(&schedule, tasks);
    warnings.extend(critical.warnings.iter().cloned());

    let cost = estimate_cost(&schedule, tasks, input, &config.cost);
    let feasibility = check_feasibility(&schedule, cost.total_cost, input, tasks);

    let simulation = match simulate_network(
        &network,
        input.area,
        f64::from(input.deadline),
        &config.simulation,
    ) {
        Ok(result) => result,
        Err(err) => {
            warn!(%err, "Risk simulation failed");
            warnings.push(Warning::SimulationUnavailable {
                reason: err.to_string(),
            });
            SimulationResult::infeasible(config.simulation.trials)
        }
    };

    let data = ReportData {
        tasks,
        schedule: &schedule,
        critical_path: &critical.critical_path,
        cost: &cost,
        feasibility: &feasibility,
        simulation: &simulation,
        deadline: input.deadline,
        workforce_cap: input.workforce_cap,
    };
    let (executive_summary, summary_warning) =
        summarize_or_fallback(registry, &input.provider, &data);
    warnings.extend(summary_warning);

    let total_duration = schedule.total_duration();
    info!(
        total_duration,
        total_cost = cost.total_cost,
        feasible = feasibility.feasible,
        warnings = warnings.len(),
        "Analysis complete"
    );

    Ok(ProjectReport {
        total_duration,
        critical_path_tasks: critical.critical_path,
        task_analytics: critical.analytics,
        total_cost: cost.total_cost,
        cost_breakdown: cost,
        feasibility_status: if feasibility.feasible {
            FeasibilityStatus::Feasible
        } else {
            FeasibilityStatus::Infeasible
        },
        constraint_issues: feasibility.issues,
        optimization_suggestions: feasibility.suggestions,
        peak_workforce: feasibility.peak_workforce,
        simulation_results: simulation,
        warnings,
        executive_summary,
        deterministic_schedule: schedule,
    })
}
