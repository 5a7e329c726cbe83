//! Fixed-rate amortized loan payment.
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `P`    | Principal |
//! | `r`    | Monthly rate: annual percent / 100 / 12 |
//! | `n`    | Number of monthly payments: term years × 12 |
//! | `x`    | Growth factor `(1 + r)^n` |
//!
//! The monthly payment is `P · x · r / (x − 1)`, or `P / n` when the rate is
//! zero. A payment that is not finite (for example a zero-length term) is
//! reported as [`LoanError::NonFinitePayment`].
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use fincalc_core::calculations::LoanInputs;
//! use fincalc_core::calculations::common::to_cents;
//!
//! let inputs = LoanInputs {
//!     principal: 100000.0,
//!     annual_rate_percent: 5.5,
//!     term_years: 15.0,
//! };
//! let result = inputs.calculate().unwrap();
//!
//! assert_eq!(to_cents(result.monthly_payment), Some(dec!(817.08)));
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::{monthly_rate, payment_count};

/// Notice shown to the user when the loan inputs produce no usable payment.
pub const CHECK_INPUTS_NOTICE: &str = "Please check your inputs";

/// Errors that can occur during loan calculations.
#[derive(Debug, Error, PartialEq)]
pub enum LoanError {
    /// The monthly payment evaluated to an infinite or undefined value.
    #[error("monthly payment is not finite ({payment}) over {payments} payments")]
    NonFinitePayment { payment: f64, payments: f64 },
}

impl LoanError {
    /// The short message to surface to the user.
    pub fn notice(&self) -> &'static str {
        CHECK_INPUTS_NOTICE
    }
}

/// Input values for the loan calculator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanInputs {
    /// Amount borrowed.
    pub principal: f64,

    /// Nominal annual interest rate, in percent.
    pub annual_rate_percent: f64,

    /// Length of the loan in years.
    pub term_years: f64,
}

impl Default for LoanInputs {
    fn default() -> Self {
        Self {
            principal: 100_000.0,
            annual_rate_percent: 5.5,
            term_years: 15.0,
        }
    }
}

/// Monthly and aggregate loan figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanResult {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

impl LoanInputs {
    /// Computes the amortized monthly payment and totals.
    ///
    /// # Errors
    ///
    /// Returns [`LoanError::NonFinitePayment`] when the payment is infinite
    /// or `NaN`, which happens when the term is zero.
    pub fn calculate(&self) -> Result<LoanResult, LoanError> {
        let rate = monthly_rate(self.annual_rate_percent);
        let payments = payment_count(self.term_years);

        let result = if rate == 0.0 {
            LoanResult {
                monthly_payment: self.principal / payments,
                total_payment: self.principal,
                total_interest: 0.0,
            }
        } else {
            let x = (1.0 + rate).powf(payments);
            let monthly_payment = self.principal * x * rate / (x - 1.0);
            let total_payment = monthly_payment * payments;
            LoanResult {
                monthly_payment,
                total_payment,
                total_interest: total_payment - self.principal,
            }
        };

        if !result.monthly_payment.is_finite() {
            return Err(LoanError::NonFinitePayment {
                payment: result.monthly_payment,
                payments,
            });
        }

        debug!(
            principal = self.principal,
            rate = self.annual_rate_percent,
            term = self.term_years,
            payment = result.monthly_payment,
            "loan recalculated"
        );
        Ok(result)
    }

    /// Computes the loan, falling back to all-zero results on error.
    ///
    /// The error is returned alongside so the caller can show
    /// [`LoanError::notice`].
    pub fn calculate_or_zero(&self) -> (LoanResult, Option<LoanError>) {
        match self.calculate() {
            Ok(result) => (result, None),
            Err(e) => {
                warn!(error = %e, "loan inputs rejected, results reset");
                (LoanResult::default(), Some(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::to_cents;

    fn inputs(
        principal: f64,
        annual_rate_percent: f64,
        term_years: f64,
    ) -> LoanInputs {
        LoanInputs {
            principal,
            annual_rate_percent,
            term_years,
        }
    }

    #[test]
    fn default_inputs_match_initial_form() {
        assert_eq!(LoanInputs::default(), inputs(100000.0, 5.5, 15.0));
    }

    #[test]
    fn zero_rate_divides_principal_evenly() {
        let result = inputs(120000.0, 0.0, 10.0).calculate().unwrap();

        assert_eq!(result.monthly_payment, 1000.0);
        assert_eq!(result.total_payment, 120000.0);
        assert_eq!(result.total_interest, 0.0);
    }

    #[test]
    fn amortized_payment_regression() {
        let result = inputs(100000.0, 5.5, 15.0).calculate().unwrap();

        assert_eq!(to_cents(result.monthly_payment), Some(dec!(817.08)));
        assert_eq!(to_cents(result.total_payment), Some(dec!(147075.02)));
        assert_eq!(to_cents(result.total_interest), Some(dec!(47075.02)));
    }

    #[test]
    fn totals_are_consistent_with_payment() {
        let result = inputs(250000.0, 7.25, 30.0).calculate().unwrap();

        assert_eq!(result.total_payment, result.monthly_payment * 360.0);
        assert_eq!(result.total_interest, result.total_payment - 250000.0);
    }

    #[test]
    fn zero_term_is_rejected() {
        let result = inputs(100000.0, 5.5, 0.0).calculate();

        assert!(matches!(result, Err(LoanError::NonFinitePayment { .. })));
    }

    #[test]
    fn zero_term_and_zero_rate_is_rejected() {
        let result = inputs(100000.0, 0.0, 0.0).calculate();

        assert!(matches!(result, Err(LoanError::NonFinitePayment { .. })));
    }

    #[test]
    fn calculate_or_zero_resets_results() {
        let (result, error) = inputs(50000.0, 3.0, 0.0).calculate_or_zero();

        assert_eq!(result, LoanResult::default());
        assert_eq!(error.map(|e| e.notice()), Some(CHECK_INPUTS_NOTICE));
    }

    #[test]
    fn calculate_or_zero_passes_through_valid_results() {
        let loan = inputs(120000.0, 0.0, 10.0);
        let (result, error) = loan.calculate_or_zero();

        assert_eq!(Ok(result), loan.calculate());
        assert_eq!(error, None);
    }
}
