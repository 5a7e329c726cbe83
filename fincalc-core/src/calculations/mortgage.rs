//! Monthly mortgage payment: principal and interest, property tax and
//! insurance.
//!
//! # Down payment synchronization
//!
//! The down payment is held both as an amount and as a percentage of the
//! home price. Each [`MortgageEdit`] recomputes the other representation in
//! one direction only:
//!
//! | Edit                  | Recomputed |
//! |-----------------------|------------|
//! | home price            | amount = price × percent / 100 |
//! | down payment percent  | amount = price × percent / 100 |
//! | down payment amount   | percent = amount / price × 100 (price > 0) |
//!
//! No edit feeds back into another, so applying the same edit twice leaves
//! the inputs unchanged.
//!
//! # Example
//!
//! ```
//! use fincalc_core::calculations::{MortgageEdit, MortgageInputs};
//!
//! let mut inputs = MortgageInputs::default();
//! inputs.apply(MortgageEdit::HomePrice(300000.0));
//! inputs.apply(MortgageEdit::DownPaymentPercent(20.0));
//! assert_eq!(inputs.down_payment, 60000.0);
//!
//! inputs.apply(MortgageEdit::DownPaymentAmount(90000.0));
//! assert_eq!(inputs.down_payment_percent, 30.0);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calculations::common::{MONTHS_PER_YEAR, monthly_rate, payment_count};
use crate::format::format_number;

/// Loan terms offered by the term picker, in years.
pub const MORTGAGE_TERM_OPTIONS: [u32; 4] = [10, 15, 20, 30];

/// Input values for the mortgage calculator.
///
/// Mutate through [`MortgageInputs::apply`] to keep the down payment amount
/// and percentage consistent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MortgageInputs {
    pub home_price: f64,
    pub down_payment: f64,
    /// Down payment as a percentage of the home price.
    pub down_payment_percent: f64,
    pub term_years: f64,
    pub annual_rate_percent: f64,
    /// Annual property tax as a percentage of the home price.
    pub property_tax_percent: f64,
    /// Annual homeowner's insurance premium.
    pub annual_insurance: f64,
}

impl Default for MortgageInputs {
    fn default() -> Self {
        Self {
            home_price: 300_000.0,
            down_payment: 60_000.0,
            down_payment_percent: 20.0,
            term_years: 30.0,
            annual_rate_percent: 4.5,
            property_tax_percent: 1.25,
            annual_insurance: 1_200.0,
        }
    }
}

/// A single user edit to the mortgage inputs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MortgageEdit {
    HomePrice(f64),
    DownPaymentAmount(f64),
    DownPaymentPercent(f64),
    TermYears(f64),
    AnnualRate(f64),
    PropertyTax(f64),
    AnnualInsurance(f64),
}

/// The parts that make up the monthly payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentComponent {
    PrincipalAndInterest,
    Tax,
    Insurance,
}

/// Monthly mortgage payment broken down by component.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MortgagePayment {
    /// Amount financed: home price minus down payment.
    pub loan_amount: f64,
    pub principal_and_interest: f64,
    pub tax: f64,
    pub insurance: f64,
    pub total: f64,
}

impl MortgagePayment {
    pub fn component(
        &self,
        component: PaymentComponent,
    ) -> f64 {
        match component {
            PaymentComponent::PrincipalAndInterest => self.principal_and_interest,
            PaymentComponent::Tax => self.tax,
            PaymentComponent::Insurance => self.insurance,
        }
    }

    /// Share of the monthly total taken by `component`, in percent.
    /// Zero when the total is zero or not finite.
    pub fn share_of_total(
        &self,
        component: PaymentComponent,
    ) -> f64 {
        if self.total == 0.0 || !self.total.is_finite() {
            return 0.0;
        }
        self.component(component) / self.total * 100.0
    }
}

impl MortgageInputs {
    /// Applies one edit and recomputes whichever down payment
    /// representation it affects.
    pub fn apply(
        &mut self,
        edit: MortgageEdit,
    ) {
        match edit {
            MortgageEdit::HomePrice(price) => {
                self.home_price = price;
                self.down_payment = self.amount_from_percent();
            }
            MortgageEdit::DownPaymentPercent(percent) => {
                self.down_payment_percent = percent;
                self.down_payment = self.amount_from_percent();
            }
            MortgageEdit::DownPaymentAmount(amount) => {
                self.down_payment = amount;
                if self.home_price > 0.0 {
                    self.down_payment_percent = amount / self.home_price * 100.0;
                }
            }
            MortgageEdit::TermYears(years) => self.term_years = years,
            MortgageEdit::AnnualRate(rate) => self.annual_rate_percent = rate,
            MortgageEdit::PropertyTax(percent) => self.property_tax_percent = percent,
            MortgageEdit::AnnualInsurance(premium) => self.annual_insurance = premium,
        }
        debug!(
            ?edit,
            down_payment = self.down_payment,
            percent = self.down_payment_percent,
            "mortgage input edited"
        );
    }

    fn amount_from_percent(&self) -> f64 {
        self.home_price * self.down_payment_percent / 100.0
    }

    pub fn loan_amount(&self) -> f64 {
        self.home_price - self.down_payment
    }

    /// Computes the monthly payment.
    ///
    /// Principal and interest use the standard amortization formula, or an
    /// even split of the loan amount when the rate is zero. Tax and
    /// insurance are the annual figures spread over twelve months.
    pub fn calculate(&self) -> MortgagePayment {
        let loan_amount = self.loan_amount();
        let rate = monthly_rate(self.annual_rate_percent);
        let payments = payment_count(self.term_years);

        let principal_and_interest = if rate > 0.0 {
            let growth = (1.0 + rate).powf(payments);
            loan_amount * rate * growth / (growth - 1.0)
        } else {
            loan_amount / payments
        };
        let tax = self.home_price * (self.property_tax_percent / 100.0) / MONTHS_PER_YEAR;
        let insurance = self.annual_insurance / MONTHS_PER_YEAR;

        MortgagePayment {
            loan_amount,
            principal_and_interest,
            tax,
            insurance,
            total: principal_and_interest + tax + insurance,
        }
    }

    /// One-line description such as `30 year fixed at 4.5% APR`.
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for MortgageInputs {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(
            f,
            "{} year fixed at {}% APR",
            format_number(self.term_years),
            format_number(self.annual_rate_percent)
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::common::to_cents;

    // =========================================================================
    // down payment synchronization tests
    // =========================================================================

    #[test]
    fn percent_edit_recomputes_amount() {
        let mut inputs = MortgageInputs::default();
        inputs.apply(MortgageEdit::HomePrice(300000.0));
        inputs.apply(MortgageEdit::DownPaymentPercent(20.0));

        assert_eq!(inputs.down_payment, 60000.0);
    }

    #[test]
    fn amount_edit_recomputes_percent() {
        let mut inputs = MortgageInputs::default();
        inputs.apply(MortgageEdit::DownPaymentAmount(90000.0));

        assert_eq!(inputs.down_payment_percent, 30.0);
    }

    #[test]
    fn sync_cycle_is_idempotent() {
        let mut inputs = MortgageInputs::default();
        inputs.apply(MortgageEdit::HomePrice(300000.0));
        inputs.apply(MortgageEdit::DownPaymentPercent(20.0));
        inputs.apply(MortgageEdit::DownPaymentAmount(90000.0));

        let stable = inputs;
        inputs.apply(MortgageEdit::DownPaymentPercent(inputs.down_payment_percent));

        assert_eq!(inputs.down_payment, 90000.0);
        assert_eq!(inputs, stable);
    }

    #[test]
    fn repeating_an_edit_changes_nothing() {
        let mut inputs = MortgageInputs::default();
        inputs.apply(MortgageEdit::DownPaymentAmount(45000.0));
        let once = inputs;
        inputs.apply(MortgageEdit::DownPaymentAmount(45000.0));

        assert_eq!(inputs, once);
    }

    #[test]
    fn price_edit_keeps_percent_and_scales_amount() {
        let mut inputs = MortgageInputs::default();
        inputs.apply(MortgageEdit::HomePrice(350000.0));

        assert_eq!(inputs.down_payment_percent, 20.0);
        assert_eq!(inputs.down_payment, 70000.0);
    }

    #[test]
    fn amount_edit_with_zero_price_keeps_percent() {
        let mut inputs = MortgageInputs::default();
        inputs.apply(MortgageEdit::HomePrice(0.0));
        inputs.apply(MortgageEdit::DownPaymentAmount(10000.0));

        assert_eq!(inputs.down_payment, 10000.0);
        assert_eq!(inputs.down_payment_percent, 20.0);
    }

    #[test]
    fn non_synced_edits_leave_down_payment_alone() {
        let mut inputs = MortgageInputs::default();
        inputs.apply(MortgageEdit::TermYears(15.0));
        inputs.apply(MortgageEdit::AnnualRate(6.0));
        inputs.apply(MortgageEdit::PropertyTax(2.0));
        inputs.apply(MortgageEdit::AnnualInsurance(2400.0));

        assert_eq!(inputs.down_payment, 60000.0);
        assert_eq!(inputs.down_payment_percent, 20.0);
        assert_eq!(inputs.term_years, 15.0);
        assert_eq!(inputs.annual_rate_percent, 6.0);
        assert_eq!(inputs.property_tax_percent, 2.0);
        assert_eq!(inputs.annual_insurance, 2400.0);
    }

    // =========================================================================
    // payment tests
    // =========================================================================

    #[test]
    fn default_payment_regression() {
        let payment = MortgageInputs::default().calculate();

        assert_eq!(payment.loan_amount, 240000.0);
        assert_eq!(to_cents(payment.principal_and_interest), Some(dec!(1216.04)));
        assert_eq!(payment.tax, 312.5);
        assert_eq!(payment.insurance, 100.0);
        assert_eq!(to_cents(payment.total), Some(dec!(1628.54)));
    }

    #[test]
    fn zero_rate_splits_loan_evenly() {
        let mut inputs = MortgageInputs::default();
        inputs.apply(MortgageEdit::AnnualRate(0.0));
        inputs.apply(MortgageEdit::TermYears(20.0));
        let payment = inputs.calculate();

        assert_eq!(payment.principal_and_interest, 1000.0);
    }

    #[test]
    fn zero_term_propagates_non_finite_payment() {
        let mut inputs = MortgageInputs::default();
        inputs.apply(MortgageEdit::AnnualRate(0.0));
        inputs.apply(MortgageEdit::TermYears(0.0));
        let payment = inputs.calculate();

        assert!(payment.principal_and_interest.is_infinite());
        assert_eq!(payment.share_of_total(PaymentComponent::Tax), 0.0);
    }

    #[test]
    fn shares_add_up_to_one_hundred() {
        let payment = MortgageInputs::default().calculate();
        let sum: f64 = [
            PaymentComponent::PrincipalAndInterest,
            PaymentComponent::Tax,
            PaymentComponent::Insurance,
        ]
        .iter()
        .map(|c| payment.share_of_total(*c))
        .sum();

        assert!((sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn summary_describes_term_and_rate() {
        assert_eq!(
            MortgageInputs::default().summary(),
            "30 year fixed at 4.5% APR"
        );
    }
}
