//! Deterministic forward-pass scheduling (Critical Path Method).
//!
//! Each task gets a whole-day duration and the earliest start its
//! dependencies allow. The result is the baseline that critical-path
//! analysis, costing and constraint checks all work from.

use crate::task::{TaskNetwork, build_network};
use crate::{Error, Result, Task};
use buildwise_task_graph::DependencyPolicy;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Latest finish day a schedule can hold. Analytics use signed days, so
/// this is the largest `i64`.
pub const LAST_DAY: u64 = i64::MAX.unsigned_abs();

/// Resolve a task's whole-day duration for a project scale.
///
/// Always rounds up and never returns less than one day, so a zero-length
/// task cannot collapse a dependency chain.
#[must_use]
pub fn resolve_duration(duration_coefficient: f64, scale: f64) -> u64 {
    let days = (duration_coefficient * scale).ceil();
    if days.is_finite() && days > 1.0 {
        days as u64
    } else {
        1
    }
}

/// Start and end day of one task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Day work starts (earliest start).
    pub start: u64,
    /// Day work finishes (earliest finish).
    pub end: u64,
}

impl ScheduleEntry {
    /// Number of working days, zero when `end` precedes `start`.
    #[must_use]
    pub const fn duration(&self) -> u64 {
        self.end.saturating_sub(self.start)
    }
}

/// Schedule for a project: one entry per task, in topological order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    entries: IndexMap<String, ScheduleEntry>,
}

impl Schedule {
    /// Create an empty schedule.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the entry for a task, replacing any earlier one.
    pub fn insert(&mut self, task_id: impl Into<String>, entry: ScheduleEntry) {
        self.entries.insert(task_id.into(), entry);
    }

    /// Entry for a task.
    #[must_use]
    pub fn get(&self, task_id: &str) -> Option<&ScheduleEntry> {
        self.entries.get(task_id)
    }

    /// Whether the schedule holds an entry for a task.
    #[must_use]
    pub fn contains(&self, task_id: &str) -> bool {
        self.entries.contains_key(task_id)
    }

    /// Iterate entries in schedule order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ScheduleEntry)> {
        self.entries.iter().map(|(id, entry)| (id.as_str(), entry))
    }

    /// Number of scheduled tasks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no tasks are scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total project duration: the latest finish day, or 0 when empty.
    #[must_use]
    pub fn total_duration(&self) -> u64 {
        self.entries.values().map(|e| e.end).max().unwrap_or(0)
    }
}

impl FromIterator<(String, ScheduleEntry)> for Schedule {
    fn from_iter<I: IntoIterator<Item = (String, ScheduleEntry)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

pub(crate) fn validate_scale(scale: f64) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid_input(
            "scale",
            format!("must be a positive number, got {scale}"),
        ))
    }
}

/// Schedule a task list at the given scale.
///
/// Dependencies on unknown ids are ignored.
///
/// # Errors
///
/// Returns [`Error::CycleDetected`] when the dependencies form a cycle and
/// [`Error::InvalidInput`] when `scale` is not a positive finite number.
pub fn schedule(tasks: &[Task], scale: f64) -> Result<Schedule> {
    let (network, _) = build_network(tasks, DependencyPolicy::Ignore)?;
    schedule_network(&network, scale)
}

/// Run the forward pass over an already built network.
///
/// # Errors
///
/// Returns [`Error::CycleDetected`] when the network is cyclic and
/// [`Error::InvalidInput`] when `scale` is not a positive finite number or a
/// finish day would exceed [`LAST_DAY`].
#[instrument(skip(network), fields(tasks = network.task_count()))]
pub fn schedule_network(network: &TaskNetwork<'_>, scale: f64) -> Result<Schedule> {
    validate_scale(scale)?;
    let order = network.topological_order()?;

    let mut finish = vec![0_u64; network.task_count()];
    let mut schedule = Schedule::new();

    for idx in order {
        let node = &network[idx];
        let start = network
            .predecessors(idx)
            .iter()
            .map(|p| finish[p.index()])
            .max()
            .unwrap_or(0);
        let end = start
            .checked_add(resolve_duration(node.task.duration_coefficient, scale))
            .filter(|&end| end <= LAST_DAY)
            .ok_or_else(|| {
                Error::invalid_input(
                    "duration_coefficient",
                    format!(
                        "task '{}' would finish after day {LAST_DAY} at scale {scale}",
                        node.name
                    ),
                )
            })?;
        finish[idx.index()] = end;
        schedule.insert(node.name.clone(), ScheduleEntry { start, end });
    }

    debug!(
        total_duration = schedule.total_duration(),
        "Forward pass complete"
    );
    Ok(schedule)
}
