//! Executive summaries for analysis reports.
//!
//! Summaries come from named [`TextSummarizer`] providers held in a
//! [`SummarizerRegistry`]. The built-in `template` provider renders a fixed
//! markdown report from the analysis figures. A missing or failing provider
//! never fails an analysis; see [`summarize_or_fallback`].

use crate::constraints::{ConstraintViolation, FeasibilityReport, format_amount};
use crate::cost::CostEstimate;
use crate::simulation::SimulationResult;
use crate::{Error, Result, Schedule, Task, Warning};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, warn};

/// Text used when no provider could produce a summary.
pub const FALLBACK_SUMMARY: &str = "Executive summary unavailable.";

/// Figures a summarizer works from.
#[derive(Debug, Clone, Copy)]
pub struct ReportData<'a> {
    /// Task definitions, for labels.
    pub tasks: &'a [Task],
    /// Deterministic schedule.
    pub schedule: &'a Schedule,
    /// Critical task ids ordered by start.
    pub critical_path: &'a [String],
    /// Cost breakdown.
    pub cost: &'a CostEstimate,
    /// Constraint check outcome.
    pub feasibility: &'a FeasibilityReport,
    /// Risk forecast.
    pub simulation: &'a SimulationResult,
    /// Deadline in days.
    pub deadline: u32,
    /// Workforce cap.
    pub workforce_cap: u32,
}

impl ReportData<'_> {
    fn label<'s>(&'s self, id: &'s str) -> &'s str {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .map_or(id, Task::label)
    }
}

/// A provider of executive summary text.
pub trait TextSummarizer: Send + Sync {
    /// Provider id used for lookup.
    fn name(&self) -> &'static str;

    /// Render a summary.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Summary`] when the provider cannot produce text.
    fn summarize(&self, data: &ReportData<'_>) -> Result<String>;
}

/// Overall verdict shown at the top of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No constraint is violated.
    Feasible,
    /// Exactly one constraint is violated.
    ConditionallyFeasible,
    /// Two or more constraints are violated.
    Infeasible,
}

impl Verdict {
    /// Verdict for a feasibility report.
    #[must_use]
    pub fn of(feasibility: &FeasibilityReport) -> Self {
        match feasibility.violations.len() {
            0 => Self::Feasible,
            1 => Self::ConditionallyFeasible,
            _ => Self::Infeasible,
        }
    }

    /// Display text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Feasible => "Feasible",
            Self::ConditionallyFeasible => "Conditionally Feasible (requires minor adjustments)",
            Self::Infeasible => "Infeasible (major constraints violated)",
        }
    }
}

/// Deterministic markdown summary built from the report figures.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateSummarizer;

impl TemplateSummarizer {
    /// Create the summarizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl TextSummarizer for TemplateSummarizer {
    fn name(&self) -> &'static str {
        "template"
    }

    fn summarize(&self, data: &ReportData<'_>) -> Result<String> {
        let duration = data.schedule.total_duration();
        let mut deadline_status = "On track".to_string();
        let mut budget_status = "Within limit".to_string();
        let mut workforce_status = format!(
            "Peak demand of {} workers within cap of {}",
            data.feasibility.peak_workforce, data.workforce_cap
        );
        for violation in &data.feasibility.violations {
            match violation {
                ConstraintViolation::Deadline { .. } => {
                    deadline_status = format!("CRITICAL: {}", violation.issue());
                }
                ConstraintViolation::Budget { .. } => {
                    budget_status = format!("OVERRUN: {}", violation.issue());
                }
                ConstraintViolation::Workforce { .. } => {
                    workforce_status = format!("BOTTLENECK: {}", violation.issue());
                }
            }
        }

        // Longest critical tasks are the best candidates for crashing.
        let mut critical: Vec<(&str, u64)> = data
            .critical_path
            .iter()
            .filter_map(|id| data.schedule.get(id).map(|e| (id.as_str(), e.duration())))
            .collect();
        critical.sort_by(|a, b| b.1.cmp(&a.1));
        let crash_targets: Vec<&str> = critical
            .iter()
            .take(2)
            .map(|(id, _)| data.label(id))
            .collect();

        let mut out = String::new();
        let verdict = Verdict::of(data.feasibility);
        let _ = writeln!(out, "## 1. Feasibility Verdict");
        let _ = writeln!(out, "**Verdict:** {}", verdict.as_str());
        let _ = writeln!(out);
        if data.simulation.is_infeasible() {
            let _ = writeln!(
                out,
                "Deterministic duration is **{duration} days** against a **{} day** deadline. No risk forecast is available.",
                data.deadline
            );
        } else {
            let _ = writeln!(
                out,
                "Deterministic duration is **{duration} days** against a **{} day** deadline, with a P80 risk-adjusted forecast of **{:.1} days**.",
                data.deadline, data.simulation.p80_duration
            );
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "## 2. Constraints");
        let _ = writeln!(out, "* **Deadline:** {deadline_status}");
        let _ = writeln!(out, "* **Budget:** {budget_status}");
        let _ = writeln!(out, "* **Workforce:** {workforce_status}");
        if !data.simulation.is_infeasible() {
            let _ = writeln!(
                out,
                "* **Risk:** P80 variance of {:+.1} days, {:.1}% chance of missing the deadline.",
                data.simulation.p80_duration - duration as f64,
                data.simulation.deadline_risk_probability
            );
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "## 3. Recommendations");
        let mut n = 0;
        if !crash_targets.is_empty() {
            n += 1;
            let _ = writeln!(
                out,
                "{n}. **Critical path crashing:** add crew to **{}**. A 10% cut along the critical path recovers about {} days.",
                crash_targets.join("** and **"),
                duration / 10
            );
        }
        for suggestion in &data.feasibility.suggestions {
            n += 1;
            let _ = writeln!(out, "{n}. {suggestion}");
        }
        if n == 0 {
            let _ = writeln!(out, "1. Keep the current plan and monitor critical tasks.");
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "## 4. Risk Scenarios");
        let _ = writeln!(
            out,
            "* **Material cost +10%:** adds about {} to the total.",
            format_amount(data.cost.material_cost * 0.1)
        );
        let _ = writeln!(
            out,
            "* **Labor efficiency -15%:** completion slips by about {} days.",
            duration * 15 / 100
        );
        if let Some(first) = data.critical_path.first() {
            let _ = writeln!(
                out,
                "* **Critical path delay:** any delay in **{}** moves handover one for one.",
                data.label(first)
            );
        }
        let _ = writeln!(out);

        let _ = writeln!(out, "## 5. Executive Summary");
        let headline = data
            .feasibility
            .issues
            .first()
            .map_or("no constraint violations", String::as_str);
        let _ = write!(
            out,
            "Total cost is {} over {duration} days, with {headline}.",
            format_amount(data.cost.total_cost)
        );

        Ok(out)
    }
}

/// Named summary providers.
pub struct SummarizerRegistry {
    summarizers: Vec<Arc<dyn TextSummarizer>>,
    by_name: HashMap<String, usize>,
}

impl SummarizerRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            summarizers: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registry with the built-in providers.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(TemplateSummarizer::new());
        registry
    }

    /// Register a provider, replacing any provider with the same name.
    pub fn register<S>(&mut self, summarizer: S)
    where
        S: TextSummarizer + 'static,
    {
        let key = summarizer.name().to_ascii_lowercase();
        if let Some(&idx) = self.by_name.get(&key) {
            self.summarizers[idx] = Arc::new(summarizer);
        } else {
            self.by_name.insert(key, self.summarizers.len());
            self.summarizers.push(Arc::new(summarizer));
        }
    }

    /// Look up a provider by name, ignoring case.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Arc<dyn TextSummarizer>> {
        self.by_name
            .get(&name.to_ascii_lowercase())
            .map(|&idx| &self.summarizers[idx])
    }

    /// Provider names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.summarizers.iter().map(|s| s.name())
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.summarizers.len()
    }

    /// Whether no provider is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.summarizers.is_empty()
    }
}

impl Default for SummarizerRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Summarize with the named provider, falling back to
/// [`FALLBACK_SUMMARY`] and a warning when it is unknown or fails.
#[must_use]
pub fn summarize_or_fallback(
    registry: &SummarizerRegistry,
    provider: &str,
    data: &ReportData<'_>,
) -> (String, Option<Warning>) {
    let outcome = registry
        .get(provider)
        .ok_or_else(|| Error::summary(provider, "unknown provider"))
        .and_then(|summarizer| summarizer.summarize(data));

    match outcome {
        Ok(text) => {
            debug!(provider, "Summary generated");
            (text, None)
        }
        Err(err) => {
            warn!(provider, %err, "Falling back to placeholder summary");
            let reason = match err {
                Error::Summary { message, .. } => message,
                other => other.to_string(),
            };
            (
                FALLBACK_SUMMARY.to_string(),
                Some(Warning::SummaryUnavailable {
                    provider: provider.to_string(),
                    reason,
                }),
            )
        }
    }
}
