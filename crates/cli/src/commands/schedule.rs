use super::render_json;
use crate::cli::OutputArgs;
use crate::errors::CliError;
use buildwise_core::critical_path::analyze_critical_path;
use buildwise_core::scheduler::schedule_network;
use buildwise_core::task::build_network;
use buildwise_core::{EngineConfig, Schedule, TaskAnalytics, Warning};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Serialize)]
struct ScheduleOutput {
    schedule: Schedule,
    total_duration: u64,
    critical_path: Vec<String>,
    task_analytics: IndexMap<String, TaskAnalytics>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    warnings: Vec<Warning>,
}

pub fn execute(config: &EngineConfig, area: f64, output: OutputArgs) -> Result<String, CliError> {
    let tasks = config.catalog.tasks();
    let (network, unknown) = build_network(tasks, config.dependency_policy.policy())?;
    let schedule = schedule_network(&network, area)?;
    let report = analyze_critical_path(&schedule, tasks);

    let mut warnings: Vec<Warning> = unknown
        .into_iter()
        .map(|u| Warning::UnknownDependency {
            task: u.task,
            dependency: u.dependency,
        })
        .collect();
    warnings.extend(report.warnings);

    info!(
        total_duration = schedule.total_duration(),
        critical = report.critical_path.len(),
        "Schedule computed"
    );

    render_json(
        &ScheduleOutput {
            total_duration: schedule.total_duration(),
            schedule,
            critical_path: report.critical_path,
            task_analytics: report.analytics,
            warnings,
        },
        output,
    )
}
