//! Plain-text rendering of each calculator's inputs and results.

use std::fmt;

use fincalc_core::calculations::PaymentComponent;
use fincalc_core::format::{format_currency, format_number, format_percent};
use fincalc_core::{
    BasicCalculator, InterestInputs, InterestResult, LoanInputs, LoanResult, MortgageInputs,
    MortgagePayment,
};

/// Loan and interest figures are shown to the cent.
const CENTS: u32 = 2;
/// Mortgage figures are shown in whole dollars.
const DOLLARS: u32 = 0;

pub struct BasicReport<'a>(pub &'a BasicCalculator);

impl fmt::Display for BasicReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let calc = self.0;
        writeln!(f, "Display:  {}", calc.display())?;
        if let Some((value, op)) = calc.mode().pending() {
            writeln!(f, "Pending:  {} {}", format_number(value), op)?;
        }

        writeln!(f, "History:")?;
        if calc.history().is_empty() {
            writeln!(f, "  No calculations yet")
        } else {
            for entry in calc.history().entries() {
                writeln!(f, "  {entry}")?;
            }
            Ok(())
        }
    }
}

pub struct LoanReport<'a> {
    pub inputs: &'a LoanInputs,
    pub result: &'a LoanResult,
    pub notice: Option<&'a str>,
}

impl fmt::Display for LoanReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let LoanReport {
            inputs,
            result,
            notice,
        } = self;
        writeln!(f, "Loan amount:      {}", format_currency(inputs.principal, CENTS))?;
        writeln!(f, "Interest rate:    {}%", format_number(inputs.annual_rate_percent))?;
        writeln!(f, "Loan term:        {} years", format_number(inputs.term_years))?;
        writeln!(f)?;
        writeln!(f, "Monthly payment:  {}", format_currency(result.monthly_payment, CENTS))?;
        writeln!(f, "Total payment:    {}", format_currency(result.total_payment, CENTS))?;
        writeln!(f, "Total interest:   {}", format_currency(result.total_interest, CENTS))?;
        if let Some(notice) = notice {
            writeln!(f)?;
            writeln!(f, "! {notice}")?;
        }
        Ok(())
    }
}

pub struct InterestReport<'a> {
    pub inputs: &'a InterestInputs,
    pub result: &'a InterestResult,
}

impl fmt::Display for InterestReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let InterestReport { inputs, result } = self;
        writeln!(f, "Principal:        {}", format_currency(inputs.principal, CENTS))?;
        writeln!(f, "Interest rate:    {}%", format_number(inputs.annual_rate_percent))?;
        writeln!(f, "Time period:      {} years", format_number(inputs.term_years))?;
        writeln!(f, "Compounding:      {}", inputs.frequency)?;
        writeln!(f)?;
        writeln!(f, "Future value:     {}", format_currency(result.future_value, CENTS))?;
        writeln!(f, "Total interest:   {}", format_currency(result.total_interest, CENTS))?;
        writeln!(
            f,
            "Effective rate:   {}",
            format_percent(result.effective_rate_percent, CENTS)
        )
    }
}

pub struct MortgageReport<'a> {
    pub inputs: &'a MortgageInputs,
    pub payment: &'a MortgagePayment,
}

impl fmt::Display for MortgageReport<'_> {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let MortgageReport { inputs, payment } = self;
        writeln!(f, "Home price:       {}", format_currency(inputs.home_price, DOLLARS))?;
        writeln!(
            f,
            "Down payment:     {} ({})",
            format_currency(inputs.down_payment, DOLLARS),
            format_percent(inputs.down_payment_percent, 1)
        )?;
        writeln!(f, "Loan term:        {} years", format_number(inputs.term_years))?;
        writeln!(f, "Interest rate:    {}%", format_number(inputs.annual_rate_percent))?;
        writeln!(f, "Property tax:     {}%", format_number(inputs.property_tax_percent))?;
        writeln!(f, "Insurance:        {} / year", format_currency(inputs.annual_insurance, DOLLARS))?;
        writeln!(f)?;
        writeln!(f, "Monthly payment:  {}", format_currency(payment.total, DOLLARS))?;
        for (label, component) in [
            ("Principal & interest", PaymentComponent::PrincipalAndInterest),
            ("Property tax", PaymentComponent::Tax),
            ("Home insurance", PaymentComponent::Insurance),
        ] {
            writeln!(
                f,
                "  {:<21} {:>10}  {:>6}",
                label,
                format_currency(payment.component(component), DOLLARS),
                format_percent(payment.share_of_total(component), 1)
            )?;
        }
        writeln!(f)?;
        writeln!(f, "Loan amount:      {}", format_currency(payment.loan_amount, DOLLARS))?;
        writeln!(f, "                  {inputs}")
    }
}

#[cfg(test)]
mod tests {
    use fincalc_core::Key;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn basic_report_shows_empty_history_hint() {
        let calc = BasicCalculator::new();

        assert_eq!(
            BasicReport(&calc).to_string(),
            "Display:  0\nHistory:\n  No calculations yet\n"
        );
    }

    #[test]
    fn basic_report_shows_pending_operation_and_history() {
        let mut calc = BasicCalculator::new();
        for key in Key::parse_sequence("5 + 3 = × 4").unwrap() {
            calc.press(key);
        }

        assert_eq!(
            BasicReport(&calc).to_string(),
            "Display:  4\nPending:  8 ×\nHistory:\n  5 + 3 = 8\n"
        );
    }

    #[test]
    fn loan_report_includes_notice() {
        let inputs = LoanInputs::default();
        let result = LoanResult::default();
        let report = LoanReport {
            inputs: &inputs,
            result: &result,
            notice: Some("Please check your inputs"),
        }
        .to_string();

        assert!(report.contains("Monthly payment:  $0.00"));
        assert!(report.ends_with("! Please check your inputs\n"));
    }

    #[test]
    fn interest_report_formats_effective_rate() {
        let inputs = InterestInputs::default();
        let result = inputs.calculate();
        let report = InterestReport {
            inputs: &inputs,
            result: &result,
        }
        .to_string();

        assert!(report.contains("Future value:     $12,762.82"));
        assert!(report.contains("Effective rate:   5.00%"));
        assert!(report.contains("Compounding:      Annually"));
    }

    #[test]
    fn mortgage_report_uses_whole_dollars() {
        let inputs = MortgageInputs::default();
        let payment = inputs.calculate();
        let report = MortgageReport {
            inputs: &inputs,
            payment: &payment,
        }
        .to_string();

        assert!(report.contains("Home price:       $300,000"));
        assert!(report.contains("Down payment:     $60,000 (20.0%)"));
        assert!(report.contains("Monthly payment:  $1,629"));
        assert!(report.contains("30 year fixed at 4.5% APR"));
    }
}
