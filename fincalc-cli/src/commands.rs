//! One-shot calculator commands.
//!
//! Each command starts from the inputs in [`Config`] and overrides them with
//! whatever flags were given, reading flag text the way the calculator's
//! input fields read typed text.

use clap::Args;
use fincalc_core::input::{parse_currency_input, parse_integer_input, parse_number_input};
use fincalc_core::{
    BasicCalculator, CompoundingFrequency, InterestInputs, Key, KeyParseError, LoanInputs,
    MortgageEdit, MortgageInputs,
};

use crate::config::Config;
use crate::report::{BasicReport, InterestReport, LoanReport, MortgageReport};

#[derive(Debug, Clone, Default, Args)]
pub struct BasicArgs {
    /// Keys: 0-9 . + - × ÷ (or * x /) = AC CE +/- % CH.
    #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
    pub keys: Vec<String>,
}

impl BasicArgs {
    pub fn report(&self) -> Result<String, KeyParseError> {
        let mut calc = BasicCalculator::new();
        for key in Key::parse_sequence(&self.keys.join(" "))? {
            calc.press(key);
        }
        Ok(BasicReport(&calc).to_string())
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct LoanArgs {
    /// Loan amount, e.g. `$100,000`.
    #[arg(long)]
    pub amount: Option<String>,
    /// Annual interest rate in percent.
    #[arg(long)]
    pub rate: Option<String>,
    /// Loan term in whole years.
    #[arg(long)]
    pub term: Option<String>,
}

impl LoanArgs {
    pub fn inputs(
        &self,
        config: &Config,
    ) -> LoanInputs {
        let mut inputs = config.loan;
        if let Some(text) = &self.amount {
            inputs.principal = parse_currency_input(text);
        }
        if let Some(text) = &self.rate {
            inputs.annual_rate_percent = parse_number_input(text);
        }
        if let Some(text) = &self.term {
            inputs.term_years = parse_integer_input(text);
        }
        inputs
    }

    pub fn report(
        &self,
        config: &Config,
    ) -> String {
        let inputs = self.inputs(config);
        let (result, error) = inputs.calculate_or_zero();
        LoanReport {
            inputs: &inputs,
            result: &result,
            notice: error.as_ref().map(|e| e.notice()),
        }
        .to_string()
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct InterestArgs {
    #[arg(long)]
    pub principal: Option<String>,
    /// Annual interest rate in percent.
    #[arg(long)]
    pub rate: Option<String>,
    /// Time period in years.
    #[arg(long)]
    pub term: Option<String>,
    /// annually, semi-annually, quarterly, monthly or daily.
    #[arg(long)]
    pub frequency: Option<CompoundingFrequency>,
}

impl InterestArgs {
    pub fn inputs(
        &self,
        config: &Config,
    ) -> InterestInputs {
        let mut inputs = config.interest;
        if let Some(text) = &self.principal {
            inputs.principal = parse_number_input(text);
        }
        if let Some(text) = &self.rate {
            inputs.annual_rate_percent = parse_number_input(text);
        }
        if let Some(text) = &self.term {
            inputs.term_years = parse_number_input(text);
        }
        if let Some(frequency) = self.frequency {
            inputs.frequency = frequency;
        }
        inputs
    }

    pub fn report(
        &self,
        config: &Config,
    ) -> String {
        let inputs = self.inputs(config);
        let result = inputs.calculate();
        InterestReport {
            inputs: &inputs,
            result: &result,
        }
        .to_string()
    }
}

/// Edits apply in field order, so `--down` wins over `--price` and
/// `--down-percent` wins over `--down`.
#[derive(Debug, Clone, Default, Args)]
pub struct MortgageArgs {
    #[arg(long)]
    pub price: Option<String>,
    /// Down payment amount.
    #[arg(long)]
    pub down: Option<String>,
    /// Down payment as a percentage of the home price.
    #[arg(long)]
    pub down_percent: Option<String>,
    /// Loan term in years.
    #[arg(long, value_parser = ["10", "15", "20", "30"])]
    pub term: Option<String>,
    /// Annual interest rate in percent.
    #[arg(long)]
    pub rate: Option<String>,
    /// Annual property tax in percent of the home price.
    #[arg(long)]
    pub tax: Option<String>,
    /// Annual home insurance.
    #[arg(long)]
    pub insurance: Option<String>,
}

impl MortgageArgs {
    fn edits(&self) -> impl Iterator<Item = MortgageEdit> + '_ {
        let currency = |flag: &Option<String>| flag.as_deref().map(parse_currency_input);
        let number = |flag: &Option<String>| flag.as_deref().map(parse_number_input);

        [
            currency(&self.price).map(MortgageEdit::HomePrice),
            currency(&self.down).map(MortgageEdit::DownPaymentAmount),
            number(&self.down_percent).map(MortgageEdit::DownPaymentPercent),
            self.term
                .as_deref()
                .map(parse_integer_input)
                .map(MortgageEdit::TermYears),
            number(&self.rate).map(MortgageEdit::AnnualRate),
            number(&self.tax).map(MortgageEdit::PropertyTax),
            number(&self.insurance).map(MortgageEdit::AnnualInsurance),
        ]
        .into_iter()
        .flatten()
    }

    pub fn inputs(
        &self,
        config: &Config,
    ) -> MortgageInputs {
        let mut inputs = config.mortgage.to_inputs();
        for edit in self.edits() {
            inputs.apply(edit);
        }
        inputs
    }

    pub fn report(
        &self,
        config: &Config,
    ) -> String {
        let inputs = self.inputs(config);
        let payment = inputs.calculate();
        MortgageReport {
            inputs: &inputs,
            payment: &payment,
        }
        .to_string()
    }
}
