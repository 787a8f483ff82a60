//! Feasibility checks against budget, deadline and workforce cap.

use crate::{ProjectInput, Schedule, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single constraint the plan breaks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "constraint", rename_all = "snake_case")]
pub enum ConstraintViolation {
    /// Total cost is above budget.
    Budget {
        /// Amount above budget
        overage: f64,
    },
    /// Project finishes after the deadline.
    Deadline {
        /// Days past the deadline
        delay_days: u64,
    },
    /// More workers are needed than the cap allows on some days.
    Workforce {
        /// Configured cap
        cap: u32,
        /// Days on which demand exceeds the cap
        violation_days: u64,
        /// Highest daily demand
        peak_demand: u64,
    },
}

impl ConstraintViolation {
    /// Issue text for reports.
    #[must_use]
    pub fn issue(&self) -> String {
        match self {
            Self::Budget { overage } => format!("Budget exceeded by {}", format_amount(*overage)),
            Self::Deadline { delay_days } => format!("Deadline exceeded by {delay_days} days."),
            Self::Workforce {
                cap,
                violation_days,
                peak_demand,
            } => format!(
                "Workforce cap ({cap}) exceeded on {violation_days} days. Peak demand: {peak_demand} workers."
            ),
        }
    }

    /// Remedy suggested for this violation.
    #[must_use]
    pub fn suggestion(&self) -> String {
        match self {
            Self::Budget { overage } => format!(
                "Increase budget by {} or reduce project scope.",
                format_amount(*overage)
            ),
            Self::Deadline { delay_days } => format!(
                "Reduce critical path duration by {delay_days} days or extend deadline."
            ),
            Self::Workforce { peak_demand, .. } => format!(
                "Increase workforce cap to at least {peak_demand} or reschedule non-critical tasks."
            ),
        }
    }
}

impl fmt::Display for ConstraintViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.issue())
    }
}

/// Result of [`check_feasibility`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FeasibilityReport {
    /// True when nothing is violated.
    pub feasible: bool,
    /// Structured violations, budget first, then deadline, then workforce.
    pub violations: Vec<ConstraintViolation>,
    /// Issue texts, one per violation.
    pub issues: Vec<String>,
    /// Suggested remedies, de-duplicated.
    pub suggestions: Vec<String>,
    /// Highest number of workers needed on a single day.
    pub peak_workforce: u64,
}

impl FeasibilityReport {
    fn from_violations(violations: Vec<ConstraintViolation>, peak_workforce: u64) -> Self {
        let issues = violations.iter().map(ConstraintViolation::issue).collect();
        let mut suggestions: Vec<String> = Vec::new();
        for suggestion in violations.iter().map(ConstraintViolation::suggestion) {
            if !suggestions.contains(&suggestion) {
                suggestions.push(suggestion);
            }
        }
        Self {
            feasible: violations.is_empty(),
            violations,
            issues,
            suggestions,
            peak_workforce,
        }
    }
}

/// Daily workforce demand summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorkforceProfile {
    /// Highest daily demand.
    pub peak: u64,
    /// Days on which demand exceeds the cap.
    pub days_over_cap: u64,
}

/// Sweep the schedule day by day: each task needs its crew on every day in
/// `[start, end)`.
#[must_use]
pub fn workforce_profile(schedule: &Schedule, tasks: &[Task], cap: u32) -> WorkforceProfile {
    let mut crew: HashMap<&str, u64> = HashMap::new();
    for task in tasks {
        crew.entry(task.id.as_str())
            .or_insert_with(|| u64::from(task.required_workers));
    }

    // (day, delta) pairs; releases sort before arrivals on the same day.
    let mut events: Vec<(u64, i64)> = Vec::new();
    for (id, entry) in schedule.iter() {
        let Some(&workers) = crew.get(id) else {
            continue;
        };
        if workers == 0 || entry.end <= entry.start {
            continue;
        }
        events.push((entry.start, workers as i64));
        events.push((entry.end, -(workers as i64)));
    }
    events.sort_unstable();

    let mut profile = WorkforceProfile::default();
    let mut demand: i64 = 0;
    let mut i = 0;
    while i < events.len() {
        let day = events[i].0;
        while i < events.len() && events[i].0 == day {
            demand += events[i].1;
            i += 1;
        }
        let demand_now = demand.max(0) as u64;
        profile.peak = profile.peak.max(demand_now);
        if demand_now > u64::from(cap)
            && let Some(&(next_day, _)) = events.get(i)
        {
            profile.days_over_cap += next_day - day;
        }
    }
    profile
}

/// Check a schedule and its cost against the project's limits.
#[must_use]
pub fn check_feasibility(
    schedule: &Schedule,
    total_cost: f64,
    project: &ProjectInput,
    tasks: &[Task],
) -> FeasibilityReport {
    let mut violations = Vec::new();

    if total_cost > project.budget {
        violations.push(ConstraintViolation::Budget {
            overage: total_cost - project.budget,
        });
    }

    let duration = schedule.total_duration();
    let deadline = u64::from(project.deadline);
    if duration > deadline {
        violations.push(ConstraintViolation::Deadline {
            delay_days: duration - deadline,
        });
    }

    let profile = workforce_profile(schedule, tasks, project.workforce_cap);
    if profile.days_over_cap > 0 {
        violations.push(ConstraintViolation::Workforce {
            cap: project.workforce_cap,
            violation_days: profile.days_over_cap,
            peak_demand: profile.peak,
        });
    }

    FeasibilityReport::from_violations(violations, profile.peak)
}

/// Format a currency amount with thousands separators and two decimals.
#[must_use]
pub fn format_amount(amount: f64) -> String {
    let formatted = format!("{:.2}", amount.abs());
    let (whole, fraction) = formatted.split_once('.').unwrap_or((formatted.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{sign}{grouped}.{fraction}")
}
