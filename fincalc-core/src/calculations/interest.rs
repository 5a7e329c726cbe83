//! Compound interest growth.
//!
//! With nominal annual rate `r` (as a fraction), `n` compounding periods per
//! year and a term of `t` years:
//!
//! - future value: `P · (1 + r/n)^(n·t)`
//! - total interest: future value − `P`
//! - effective annual rate: `((1 + r/n)^n − 1) · 100`
//!
//! The formula is total for finite inputs, so there is no error path.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::CompoundingFrequency;

/// Input values for the compound interest calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterestInputs {
    pub principal: f64,
    pub annual_rate_percent: f64,
    pub term_years: f64,
    pub frequency: CompoundingFrequency,
}

impl Default for InterestInputs {
    fn default() -> Self {
        Self {
            principal: 10_000.0,
            annual_rate_percent: 5.0,
            term_years: 5.0,
            frequency: CompoundingFrequency::Annually,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InterestResult {
    pub future_value: f64,
    pub total_interest: f64,
    /// Effective annual rate, in percent.
    pub effective_rate_percent: f64,
}

impl InterestInputs {
    pub fn calculate(&self) -> InterestResult {
        let r = self.annual_rate_percent / 100.0;
        let n = f64::from(self.frequency.periods_per_year());
        let periodic_growth = 1.0 + r / n;

        let future_value = self.principal * periodic_growth.powf(n * self.term_years);
        let result = InterestResult {
            future_value,
            total_interest: future_value - self.principal,
            effective_rate_percent: (periodic_growth.powf(n) - 1.0) * 100.0,
        };

        debug!(
            principal = self.principal,
            rate = self.annual_rate_percent,
            term = self.term_years,
            frequency = self.frequency.as_str(),
            future_value = result.future_value,
            "interest recalculated"
        );
        result
    }
}
