//! Cost aggregation over a finished schedule.
//!
//! Labor comes from scheduled durations times daily crew cost, materials
//! from area and floor count, and overhead is a flat share of both.

use crate::{ProjectInput, Schedule, Task};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Cost model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostSettings {
    /// Material cost per unit of area per floor.
    pub material_coefficient: f64,
    /// Overhead as a fraction of labor plus material.
    pub overhead_rate: f64,
}

impl Default for CostSettings {
    fn default() -> Self {
        Self {
            material_coefficient: 500.0,
            overhead_rate: 0.10,
        }
    }
}

/// Cost breakdown, every figure rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CostEstimate {
    /// Sum of duration times daily cost over scheduled tasks.
    pub labor_cost: f64,
    /// Area times floors times the material coefficient.
    pub material_cost: f64,
    /// Overhead share of labor plus material.
    pub overhead_cost: f64,
    /// Labor plus material plus overhead.
    pub total_cost: f64,
    /// Total divided by area, or 0 when area is 0.
    pub cost_per_unit_area: f64,
}

/// Price a schedule.
///
/// Scheduled ids missing from `tasks` contribute no labor.
#[must_use]
pub fn estimate_cost(
    schedule: &Schedule,
    tasks: &[Task],
    project: &ProjectInput,
    settings: &CostSettings,
) -> CostEstimate {
    let mut daily_cost: HashMap<&str, f64> = HashMap::new();
    for task in tasks {
        daily_cost
            .entry(task.id.as_str())
            .or_insert(task.cost_per_day);
    }

    let labor: f64 = schedule
        .iter()
        .filter_map(|(id, entry)| {
            daily_cost
                .get(id)
                .map(|cost| entry.duration() as f64 * cost)
        })
        .sum();
    let material = project.area * f64::from(project.floors) * settings.material_coefficient;
    let overhead = (labor + material) * settings.overhead_rate;
    let total = labor + material + overhead;
    let per_area = if project.area > 0.0 {
        total / project.area
    } else {
        0.0
    };

    CostEstimate {
        labor_cost: round_cents(labor),
        material_cost: round_cents(material),
        overhead_cost: round_cents(overhead),
        total_cost: round_cents(total),
        cost_per_unit_area: round_cents(per_area),
    }
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ScheduleEntry;

    fn project(area: f64, floors: u32) -> ProjectInput {
        ProjectInput {
            area,
            floors,
            deadline: 100,
            budget: 0.0,
            workforce_cap: 10,
            provider: "template".to_string(),
        }
    }

    #[test]
    fn test_labor_material_overhead() {
        let tasks = vec![
            Task::new("T1", "Clearing", 0.01).with_cost_per_day(400.0),
            Task::new("T2", "Excavation", 0.01).with_cost_per_day(700.0),
        ];
        let schedule: Schedule = [
            ("T1".to_string(), ScheduleEntry { start: 0, end: 5 }),
            ("T2".to_string(), ScheduleEntry { start: 5, end: 15 }),
        ]
        .into_iter()
        .collect();

        let cost = estimate_cost(&schedule, &tasks, &project(100.0, 2), &CostSettings::default());

        // 5 * 400 + 10 * 700
        assert!((cost.labor_cost - 9_000.0).abs() < 1e-9);
        // 100 * 2 * 500
        assert!((cost.material_cost - 100_000.0).abs() < 1e-9);
        assert!((cost.overhead_cost - 10_900.0).abs() < 1e-9);
        assert!((cost.total_cost - 119_900.0).abs() < 1e-9);
        assert!((cost.cost_per_unit_area - 1_199.0).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_scheduled_task_costs_nothing() {
        let schedule: Schedule = [("X".to_string(), ScheduleEntry { start: 0, end: 5 })]
            .into_iter()
            .collect();
        let cost = estimate_cost(&schedule, &[], &project(10.0, 1), &CostSettings::default());
        assert!(cost.labor_cost.abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_area_has_no_unit_cost() {
        let cost = estimate_cost(
            &Schedule::new(),
            &[],
            &project(0.0, 1),
            &CostSettings::default(),
        );
        assert!(cost.cost_per_unit_area.abs() < f64::EPSILON);
    }

    #[test]
    fn test_rounds_to_cents() {
        let tasks = vec![Task::new("T1", "t", 1.0).with_cost_per_day(33.333)];
        let schedule: Schedule = [("T1".to_string(), ScheduleEntry { start: 0, end: 1 })]
            .into_iter()
            .collect();
        let settings = CostSettings {
            material_coefficient: 0.0,
            overhead_rate: 0.0,
        };
        let cost = estimate_cost(&schedule, &tasks, &project(3.0, 1), &settings);
        assert!((cost.labor_cost - 33.33).abs() < 1e-9);
        assert!((cost.cost_per_unit_area - 11.11).abs() < 1e-9);
    }
}
