//! Monte Carlo risk simulation.
//!
//! Every trial scales each task's base duration by its own factor drawn
//! uniformly from [`PERTURBATION_RANGE`], then reruns the forward pass with
//! real-valued days. The spread of trial totals gives percentile forecasts
//! and the chance of missing the deadline.
//!
//! Trials run on the rayon pool. Each trial seeds its own generator from a
//! seed drawn up front, so a fixed master seed gives the same result no
//! matter how trials are spread over threads.

use crate::scheduler::{resolve_duration, validate_scale};
use crate::task::{TaskNetwork, build_network};
use crate::{Error, Result, Task};
use buildwise_task_graph::{DependencyPolicy, NodeIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::{debug, instrument, warn};

/// Default number of trials per simulation.
pub const DEFAULT_TRIALS: usize = 500;

/// Multiplicative range applied to each task's base duration.
pub const PERTURBATION_RANGE: RangeInclusive<f64> = 0.85..=1.15;

/// How many trials to run and where randomness comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationOptions {
    /// Number of trials, at least 1.
    #[serde(default = "default_trials")]
    pub trials: usize,
    /// Master seed. `None` draws one from the operating system.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

const fn default_trials() -> usize {
    DEFAULT_TRIALS
}

impl Default for SimulationOptions {
    fn default() -> Self {
        Self {
            trials: DEFAULT_TRIALS,
            seed: None,
        }
    }
}

impl SimulationOptions {
    /// Options with a fixed seed, for reproducible runs.
    #[must_use]
    pub const fn seeded(trials: usize, seed: u64) -> Self {
        Self {
            trials,
            seed: Some(seed),
        }
    }
}

/// Whether the trials actually ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimulationStatus {
    /// All trials ran.
    Completed,
    /// The network could not be simulated (cyclic dependencies).
    Infeasible,
}

/// Forecast produced by [`simulate_risk`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Median simulated project duration, in days.
    pub p50_duration: f64,
    /// 80th percentile simulated project duration, in days.
    pub p80_duration: f64,
    /// Percentage of trials that finished after the deadline.
    pub deadline_risk_probability: f64,
    /// Number of trials requested.
    pub trials: usize,
    /// Completed, or the infeasible sentinel.
    pub status: SimulationStatus,
}

impl SimulationResult {
    /// Sentinel for a network that cannot be simulated: zero durations and
    /// certain deadline miss.
    #[must_use]
    pub const fn infeasible(trials: usize) -> Self {
        Self {
            p50_duration: 0.0,
            p80_duration: 0.0,
            deadline_risk_probability: 100.0,
            trials,
            status: SimulationStatus::Infeasible,
        }
    }

    /// Whether this is the infeasible sentinel rather than a real forecast.
    #[must_use]
    pub fn is_infeasible(&self) -> bool {
        self.status == SimulationStatus::Infeasible
    }
}

/// Simulate project duration risk for a task list.
///
/// Dependencies on unknown ids are ignored. A cyclic network yields
/// [`SimulationResult::infeasible`] instead of an error.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] when `scale` is not positive, `deadline`
/// is negative or not finite, or `options.trials` is zero.
pub fn simulate_risk(
    tasks: &[Task],
    scale: f64,
    deadline: f64,
    options: &SimulationOptions,
) -> Result<SimulationResult> {
    let (network, _) = build_network(tasks, DependencyPolicy::Ignore)?;
    simulate_network(&network, scale, deadline, options)
}

/// Simulate project duration risk over an already built network.
///
/// # Errors
///
/// Same as [`simulate_risk`].
#[instrument(skip(network), fields(tasks = network.task_count()))]
pub fn simulate_network(
    network: &TaskNetwork<'_>,
    scale: f64,
    deadline: f64,
    options: &SimulationOptions,
) -> Result<SimulationResult> {
    validate_scale(scale)?;
    if !deadline.is_finite() || deadline < 0.0 {
        return Err(Error::invalid_input(
            "deadline",
            format!("must be a non-negative number of days, got {deadline}"),
        ));
    }
    if options.trials == 0 {
        return Err(Error::invalid_input("trials", "at least one trial is required"));
    }

    let order = match network.topological_order() {
        Ok(order) => order,
        Err(err) => {
            warn!(%err, "Cannot simulate a cyclic task network");
            return Ok(SimulationResult::infeasible(options.trials));
        }
    };

    let base: Vec<f64> = network
        .iter_nodes()
        .map(|(_, node)| resolve_duration(node.task.duration_coefficient, scale) as f64)
        .collect();

    let mut master = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let trial_seeds: Vec<u64> = (0..options.trials).map(|_| master.random()).collect();

    let mut totals: Vec<f64> = trial_seeds
        .par_iter()
        .map(|&seed| run_trial(network, &order, &base, seed))
        .collect();
    totals.sort_by(f64::total_cmp);

    let late = totals.iter().filter(|&&total| total > deadline).count();
    let result = SimulationResult {
        p50_duration: round_tenth(percentile_of_sorted(&totals, 50.0)),
        p80_duration: round_tenth(percentile_of_sorted(&totals, 80.0)),
        deadline_risk_probability: round_tenth(100.0 * late as f64 / totals.len() as f64),
        trials: options.trials,
        status: SimulationStatus::Completed,
    };

    debug!(
        p50 = result.p50_duration,
        p80 = result.p80_duration,
        risk = result.deadline_risk_probability,
        "Simulation complete"
    );
    Ok(result)
}

/// One trial: perturb every task, forward pass, return the latest finish.
fn run_trial(network: &TaskNetwork<'_>, order: &[NodeIndex], base: &[f64], seed: u64) -> f64 {
    let mut rng = StdRng::seed_from_u64(seed);
    let durations: Vec<f64> = base
        .iter()
        .map(|days| days * rng.random_range(PERTURBATION_RANGE))
        .collect();

    let mut finish = vec![0.0_f64; base.len()];
    let mut total = 0.0_f64;
    for &idx in order {
        let start = network
            .predecessors(idx)
            .iter()
            .map(|p| finish[p.index()])
            .fold(0.0, f64::max);
        let end = start + durations[idx.index()];
        finish[idx.index()] = end;
        total = total.max(end);
    }
    total
}

/// Percentile of a sample using linear interpolation between closest ranks.
///
/// `pct` is in `[0, 100]`. An empty sample gives 0.
#[must_use]
pub fn percentile(samples: &[f64], pct: f64) -> f64 {
    let mut sorted = samples.to_vec();
    sorted.sort_by(f64::total_cmp);
    percentile_of_sorted(&sorted, pct)
}

fn percentile_of_sorted(sorted: &[f64], pct: f64) -> f64 {
    let Some(last) = sorted.len().checked_sub(1) else {
        return 0.0;
    };
    let rank = pct.clamp(0.0, 100.0) / 100.0 * last as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let fraction = rank - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Catalog;

    fn diamond() -> Vec<Task> {
        vec![
            Task::new("T1", "Task 1", 10.0),
            Task::new("T2", "Task 2", 20.0).with_dependencies(["T1"]),
            Task::new("T3", "Task 3", 10.0).with_dependencies(["T1"]),
            Task::new("T4", "Task 4", 20.0).with_dependencies(["T2", "T3"]),
        ]
    }

    #[test]
    fn test_percentile_linear_interpolation() {
        let samples = [4.0, 1.0, 3.0, 2.0];
        assert!((percentile(&samples, 50.0) - 2.5).abs() < 1e-12);
        assert!((percentile(&samples, 80.0) - 3.4).abs() < 1e-12);
        assert!((percentile(&samples, 0.0) - 1.0).abs() < 1e-12);
        assert!((percentile(&samples, 100.0) - 4.0).abs() < 1e-12);
        assert!((percentile(&[7.0], 80.0) - 7.0).abs() < 1e-12);
        assert!(percentile(&[], 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_round_tenth() {
        assert!((round_tenth(49.96) - 50.0).abs() < 1e-12);
        assert!((round_tenth(12.34) - 12.3).abs() < 1e-12);
    }

    #[test]
    fn test_single_task_p50_near_base() {
        let tasks = vec![Task::new("only", "only", 1.0)];
        let result = simulate_risk(&tasks, 40.0, 100.0, &SimulationOptions::seeded(500, 7)).unwrap();

        assert_eq!(result.status, SimulationStatus::Completed);
        assert!(result.p50_duration >= 36.0 && result.p50_duration <= 44.0);
        assert!(result.p80_duration >= result.p50_duration);
        assert!(result.deadline_risk_probability.abs() < f64::EPSILON);
    }

    #[test]
    fn test_durations_stay_within_perturbation_bounds() {
        let result =
            simulate_risk(&diamond(), 1.0, 1000.0, &SimulationOptions::seeded(300, 11)).unwrap();
        // Critical chain is 50 days; every trial lies in [0.85 * 50, 1.15 * 50].
        assert!(result.p50_duration >= 42.5 && result.p50_duration <= 57.5);
        assert!(result.p80_duration <= 57.5);
    }

    #[test]
    fn test_deadline_risk_extremes() {
        let options = SimulationOptions::seeded(200, 3);
        let certain_miss = simulate_risk(&diamond(), 1.0, 10.0, &options).unwrap();
        assert!((certain_miss.deadline_risk_probability - 100.0).abs() < f64::EPSILON);

        let never_miss = simulate_risk(&diamond(), 1.0, 60.0, &options).unwrap();
        assert!(never_miss.deadline_risk_probability.abs() < f64::EPSILON);
    }

    #[test]
    fn test_same_seed_same_result() {
        let options = SimulationOptions::seeded(250, 42);
        let first = simulate_risk(&diamond(), 1.0, 50.0, &options).unwrap();
        let second = simulate_risk(&diamond(), 1.0, 50.0, &options).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_seeded_result_independent_of_thread_count() {
        let tasks = Catalog::standard().tasks().to_vec();
        let options = SimulationOptions::seeded(400, 11);
        let run_on = |threads: usize| {
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()
                .unwrap()
                .install(|| simulate_risk(&tasks, 1000.0, 150.0, &options).unwrap())
        };

        let single = run_on(1);
        assert_eq!(single.status, SimulationStatus::Completed);
        assert_eq!(single, run_on(4));
        assert_eq!(single, run_on(8));
    }

    #[test]
    fn test_cycle_yields_sentinel() {
        let tasks = vec![
            Task::new("A", "a", 1.0).with_dependencies(["B"]),
            Task::new("B", "b", 1.0).with_dependencies(["A"]),
        ];
        let result = simulate_risk(&tasks, 10.0, 30.0, &SimulationOptions::default()).unwrap();

        assert!(result.is_infeasible());
        assert!(result.p50_duration.abs() < f64::EPSILON);
        assert!(result.p80_duration.abs() < f64::EPSILON);
        assert!((result.deadline_risk_probability - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_empty_task_list_is_zero_risk() {
        let result = simulate_risk(&[], 10.0, 30.0, &SimulationOptions::seeded(10, 1)).unwrap();
        assert_eq!(result.status, SimulationStatus::Completed);
        assert!(result.p80_duration.abs() < f64::EPSILON);
        assert!(result.deadline_risk_probability.abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_trials_rejected() {
        let err = simulate_risk(&diamond(), 1.0, 50.0, &SimulationOptions::seeded(0, 1)).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "trials"));
    }

    #[test]
    fn test_negative_deadline_rejected() {
        let err =
            simulate_risk(&diamond(), 1.0, -1.0, &SimulationOptions::default()).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { ref field, .. } if field == "deadline"));
    }

    #[test]
    fn test_options_deserialize_defaults() {
        let options: SimulationOptions = toml::from_str("seed = 9").unwrap();
        assert_eq!(options, SimulationOptions::seeded(DEFAULT_TRIALS, 9));
    }
}
