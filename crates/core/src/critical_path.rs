//! Backward-pass critical-path analysis.
//!
//! Works from a finished [`Schedule`]: the schedule fixes earliest dates and
//! durations, the task list supplies the edges. Late dates are propagated
//! from the project end back through dependents; tasks with zero slack form
//! the critical path.

use crate::{Schedule, Task, Warning};
use buildwise_task_graph::{DependencyPolicy, TaskGraph, TaskNodeData};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, instrument, warn};

/// Early/late dates and slack for one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskAnalytics {
    /// Earliest start.
    pub es: i64,
    /// Earliest finish.
    pub ef: i64,
    /// Latest start that does not delay the project.
    pub ls: i64,
    /// Latest finish that does not delay the project.
    pub lf: i64,
    /// `ls - es`.
    pub slack: i64,
    /// Whether slack is exactly zero.
    pub is_critical: bool,
}

/// Output of [`analyze_critical_path`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CriticalPathReport {
    /// Zero-slack task ids ordered by start day. Parallel critical branches
    /// all appear.
    pub critical_path: Vec<String>,
    /// Per-task analytics in schedule order.
    pub analytics: IndexMap<String, TaskAnalytics>,
    /// Negative-slack findings.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
}

impl CriticalPathReport {
    /// Whether a task is on the critical path.
    #[must_use]
    pub fn is_critical(&self, task_id: &str) -> bool {
        self.analytics.get(task_id).is_some_and(|a| a.is_critical)
    }
}

/// Dependency view of a scheduled task.
struct ScheduledTask<'a> {
    dependencies: &'a [String],
}

impl TaskNodeData for ScheduledTask<'_> {
    fn dependency_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().map(String::as_str)
    }
}

/// Compute late dates, slack and the critical path for a schedule.
///
/// Only tasks present in `schedule` take part; dependencies on tasks outside
/// it are dropped. An empty schedule gives an empty report. A cycle among the
/// scheduled tasks cannot come out of a successful forward pass; if one shows
/// up anyway the report is empty as well.
#[must_use]
#[instrument(skip_all, fields(tasks = schedule.len()))]
pub fn analyze_critical_path(schedule: &Schedule, tasks: &[Task]) -> CriticalPathReport {
    if schedule.is_empty() {
        return CriticalPathReport::default();
    }

    let mut dependencies: HashMap<&str, &[String]> = HashMap::new();
    for task in tasks {
        dependencies
            .entry(task.id.as_str())
            .or_insert(task.dependencies.as_slice());
    }

    // Node i of the subgraph is entry i of the schedule.
    let entries: Vec<_> = schedule.iter().collect();
    let subgraph = match TaskGraph::from_tasks(
        entries.iter().map(|(id, _)| {
            let deps = dependencies.get(id).copied().unwrap_or_default();
            (*id, ScheduledTask { dependencies: deps })
        }),
        DependencyPolicy::Ignore,
    ) {
        Ok(graph) => graph,
        Err(err) => {
            warn!(%err, "Could not rebuild scheduled subgraph");
            return CriticalPathReport::default();
        }
    };

    let order = match subgraph.reverse_topological_order() {
        Ok(order) => order,
        Err(err) => {
            warn!(%err, "Scheduled subgraph is cyclic, no critical path");
            return CriticalPathReport::default();
        }
    };

    let project_duration = signed_day(schedule.total_duration());
    let mut late_start = vec![0_i64; entries.len()];
    let mut late_finish = vec![project_duration; entries.len()];

    for idx in order {
        let lf = subgraph
            .successors(idx)
            .iter()
            .map(|s| late_start[s.index()])
            .min()
            .unwrap_or(project_duration);
        let (_, entry) = entries[idx.index()];
        late_finish[idx.index()] = lf;
        late_start[idx.index()] = lf.saturating_sub(signed_day(entry.duration()));
    }

    let mut report = CriticalPathReport::default();
    for (i, (id, entry)) in entries.iter().enumerate() {
        let es = signed_day(entry.start);
        let slack = late_start[i].saturating_sub(es);
        if slack < 0 {
            warn!(task = %id, slack, "Negative slack, forward and backward passes disagree");
            report.warnings.push(Warning::InconsistentSchedule {
                task: (*id).to_string(),
                slack,
            });
        }

        let is_critical = slack == 0;
        if is_critical {
            report.critical_path.push((*id).to_string());
        }
        report.analytics.insert(
            (*id).to_string(),
            TaskAnalytics {
                es,
                ef: signed_day(entry.end),
                ls: late_start[i],
                lf: late_finish[i],
                slack,
                is_critical,
            },
        );
    }

    report
        .critical_path
        .sort_by_key(|id| schedule.get(id).map_or(0, |e| e.start));

    debug!(
        critical = report.critical_path.len(),
        project_duration, "Backward pass complete"
    );
    report
}

/// Schedules built by [`crate::schedule`] never pass [`crate::LAST_DAY`];
/// hand-built ones are clamped there.
fn signed_day(day: u64) -> i64 {
    i64::try_from(day).unwrap_or(i64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ScheduleEntry, schedule};

    fn diamond() -> Vec<Task> {
        vec![
            Task::new("T1", "Task 1", 10.0),
            Task::new("T2", "Task 2", 20.0).with_dependencies(["T1"]),
            Task::new("T3", "Task 3", 10.0).with_dependencies(["T1"]),
            Task::new("T4", "Task 4", 20.0).with_dependencies(["T2", "T3"]),
        ]
    }

    #[test]
    fn test_diamond_critical_path() {
        let tasks = diamond();
        let schedule = schedule(&tasks, 1.0).unwrap();
        let report = analyze_critical_path(&schedule, &tasks);

        assert_eq!(report.critical_path, vec!["T1", "T2", "T4"]);
        assert_eq!(report.analytics["T3"].slack, 10);
        assert_eq!(report.analytics["T3"].ls, 20);
        assert_eq!(report.analytics["T3"].lf, 30);
        for id in ["T1", "T2", "T4"] {
            assert_eq!(report.analytics[id].slack, 0, "{id}");
            assert!(report.is_critical(id));
        }
        assert!(!report.is_critical("T3"));
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_parallel_critical_branches() {
        let tasks = vec![
            Task::new("A", "a", 5.0),
            Task::new("B", "b", 5.0),
            Task::new("C", "c", 2.0).with_dependencies(["A", "B"]),
        ];
        let schedule = schedule(&tasks, 1.0).unwrap();
        let report = analyze_critical_path(&schedule, &tasks);

        assert_eq!(report.critical_path, vec!["A", "B", "C"]);
    }

    #[test]
    fn test_critical_path_sorted_by_start() {
        // Declared end-first; the path still reads start to finish.
        let tasks = vec![
            Task::new("finish", "finish", 1.0).with_dependencies(["middle"]),
            Task::new("middle", "middle", 2.0).with_dependencies(["begin"]),
            Task::new("begin", "begin", 3.0),
        ];
        let schedule = schedule(&tasks, 1.0).unwrap();
        let report = analyze_critical_path(&schedule, &tasks);

        assert_eq!(report.critical_path, vec!["begin", "middle", "finish"]);
    }

    #[test]
    fn test_empty_schedule() {
        let report = analyze_critical_path(&Schedule::new(), &diamond());
        assert!(report.critical_path.is_empty());
        assert!(report.analytics.is_empty());
    }

    #[test]
    fn test_dependencies_outside_schedule_are_dropped() {
        let tasks = diamond();
        let schedule: Schedule = [
            ("T2".to_string(), ScheduleEntry { start: 10, end: 30 }),
            ("T4".to_string(), ScheduleEntry { start: 30, end: 50 }),
        ]
        .into_iter()
        .collect();

        let report = analyze_critical_path(&schedule, &tasks);
        assert_eq!(report.critical_path, vec!["T2", "T4"]);
    }

    #[test]
    fn test_negative_slack_is_flagged_not_fatal() {
        // A hand-edited schedule where B overlaps its dependency A.
        let tasks = vec![
            Task::new("A", "a", 1.0),
            Task::new("B", "b", 1.0).with_dependencies(["A"]),
        ];
        let schedule: Schedule = [
            ("A".to_string(), ScheduleEntry { start: 0, end: 10 }),
            ("B".to_string(), ScheduleEntry { start: 2, end: 10 }),
        ]
        .into_iter()
        .collect();

        let report = analyze_critical_path(&schedule, &tasks);
        assert_eq!(report.analytics["A"].slack, -8);
        assert_eq!(
            report.warnings,
            vec![Warning::InconsistentSchedule {
                task: "A".to_string(),
                slack: -8,
            }]
        );
        assert!(report.analytics.contains_key("B"));
    }

    #[test]
    fn test_entry_ending_before_start_is_flagged() {
        let tasks = vec![Task::new("A", "a", 1.0)];
        let schedule: Schedule = [("A".to_string(), ScheduleEntry { start: 5, end: 2 })]
            .into_iter()
            .collect();

        let report = analyze_critical_path(&schedule, &tasks);
        let analytics = report.analytics["A"];
        assert_eq!(analytics.lf, 2);
        assert_eq!(analytics.ls, 2);
        assert_eq!(analytics.slack, -3);
        assert!(!analytics.is_critical);
        assert_eq!(
            report.warnings,
            vec![Warning::InconsistentSchedule {
                task: "A".to_string(),
                slack: -3,
            }]
        );
    }

    #[test]
    fn test_days_past_signed_range_do_not_wrap() {
        let tasks = vec![Task::new("A", "a", 1.0)];
        let schedule: Schedule = [(
            "A".to_string(),
            ScheduleEntry {
                start: 0,
                end: u64::MAX,
            },
        )]
        .into_iter()
        .collect();

        let report = analyze_critical_path(&schedule, &tasks);
        let analytics = report.analytics["A"];
        assert_eq!(analytics.ef, i64::MAX);
        assert_eq!(analytics.lf, i64::MAX);
        assert_eq!(analytics.slack, 0);
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_cyclic_dependencies_give_empty_report() {
        let tasks = vec![
            Task::new("A", "a", 1.0).with_dependencies(["B"]),
            Task::new("B", "b", 1.0).with_dependencies(["A"]),
        ];
        let schedule: Schedule = [
            ("A".to_string(), ScheduleEntry { start: 0, end: 1 }),
            ("B".to_string(), ScheduleEntry { start: 1, end: 2 }),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            analyze_critical_path(&schedule, &tasks),
            CriticalPathReport::default()
        );
    }
}
