//! Project parameters supplied with each analysis request.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default summary provider id.
pub const DEFAULT_PROVIDER: &str = "template";

/// Parameters of the project being analysed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectInput {
    /// Floor area; the scale every task duration is multiplied by.
    pub area: f64,
    /// Number of floors, used for material cost.
    pub floors: u32,
    /// Deadline in days.
    pub deadline: u32,
    /// Budget in currency units.
    pub budget: f64,
    /// Maximum workers on site on any day.
    pub workforce_cap: u32,
    /// Summary provider id.
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_provider() -> String {
    DEFAULT_PROVIDER.to_string()
}

impl ProjectInput {
    /// Check the parameters are usable.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if !self.area.is_finite() || self.area <= 0.0 {
            return Err(Error::invalid_input(
                "area",
                format!("must be a positive number, got {}", self.area),
            ));
        }
        if self.floors == 0 {
            return Err(Error::invalid_input("floors", "must be at least 1"));
        }
        if self.deadline == 0 {
            return Err(Error::invalid_input("deadline", "must be at least 1 day"));
        }
        if !self.budget.is_finite() || self.budget < 0.0 {
            return Err(Error::invalid_input(
                "budget",
                format!("must be a non-negative number, got {}", self.budget),
            ));
        }
        Ok(())
    }
}
