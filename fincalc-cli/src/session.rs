//! Interactive tabbed session.
//!
//! A [`Session`] owns one instance of each calculator, mirroring a tabbed
//! window: only the active tab receives input, and each tab keeps its own
//! state while another is shown. Formula tabs recompute their results after
//! every edit.

use std::io::{BufRead, Write};

use anyhow::Context;
use fincalc_core::input::{
    DOWN_PAYMENT_PERCENT_RANGE, HOME_PRICE_RANGE, INTEREST_TERM_RANGE, LOAN_AMOUNT_RANGE,
    LOAN_RATE_RANGE, LOAN_TERM_RANGE, MORTGAGE_RATE_RANGE, PROPERTY_TAX_RANGE, SliderRange,
    parse_currency_input, parse_integer_input, parse_number_input,
};
use fincalc_core::calculations::MORTGAGE_TERM_OPTIONS;
use fincalc_core::{
    BasicCalculator, CalculatorTab, CompoundingFrequency, FrequencyParseError, InterestInputs,
    InterestResult, Key, KeyParseError, LoanInputs, LoanResult, MortgageEdit, MortgageInputs,
    MortgagePayment, TabParseError,
};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::logging;
use crate::report::{BasicReport, InterestReport, LoanReport, MortgageReport};

const HELP: &str = "\
Commands:
  tab <basic|loan|interest|mortgage>   switch calculator
  show                                 print the active calculator
  set <field> <value>                  type a value into a field
  slide <field> <value>                move a field's slider
  fields                               list the active calculator's fields
  log <level>                          change the log filter
  help                                 show this text
  quit                                 leave the session
On the basic tab any other line is read as keys:
  0-9 . + - × ÷ (or * x /) = AC CE +/- % CH";

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown command '{0}' (type 'help' for a list)")]
    UnknownCommand(String),

    #[error("{tab} has no field '{field}'")]
    UnknownField { tab: CalculatorTab, field: String },

    #[error("field '{0}' has no slider")]
    NoSlider(String),

    #[error("'{value}' is not offered for {field} (choose {options})")]
    NotAnOption {
        field: &'static str,
        value: String,
        options: String,
    },

    #[error("missing {0}")]
    MissingArgument(&'static str),

    #[error(transparent)]
    Key(#[from] KeyParseError),

    #[error(transparent)]
    Tab(#[from] TabParseError),

    #[error(transparent)]
    Frequency(#[from] FrequencyParseError),

    #[error("cannot change log level: {0}")]
    Logging(String),
}

/// What the caller should do after a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Print this text.
    Output(String),
    /// Nothing to print.
    Silent,
    /// End the session.
    Quit,
}

#[derive(Debug, Clone, Copy)]
enum FieldKind {
    /// Dollar amount; non-numeric characters are stripped.
    Currency,
    Number,
    /// Whole years; any fraction is dropped.
    Integer,
    Frequency,
    /// Whole years picked from a fixed list.
    TermChoice(&'static [u32]),
}

#[derive(Debug, Clone, Copy)]
struct FieldSpec {
    name: &'static str,
    kind: FieldKind,
    slider: Option<SliderRange>,
}

impl FieldSpec {
    const fn new(
        name: &'static str,
        kind: FieldKind,
        slider: Option<SliderRange>,
    ) -> Self {
        Self { name, kind, slider }
    }

    /// Reads typed text. Numeric kinds never fail; a frequency must name
    /// one of the compounding options and a term choice must be offered.
    fn parse(
        &self,
        raw: &str,
    ) -> Result<FieldValue, SessionError> {
        let value = match self.kind {
            FieldKind::Currency => parse_currency_input(raw),
            FieldKind::Number => parse_number_input(raw),
            FieldKind::Integer => parse_integer_input(raw),
            FieldKind::Frequency => return Ok(FieldValue::Frequency(raw.parse()?)),
            FieldKind::TermChoice(options) => {
                let years = parse_integer_input(raw);
                if !options.iter().any(|&offered| f64::from(offered) == years) {
                    return Err(SessionError::NotAnOption {
                        field: self.name,
                        value: raw.to_string(),
                        options: join_options(options),
                    });
                }
                years
            }
        };
        Ok(FieldValue::Number(value))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum FieldValue {
    Number(f64),
    Frequency(CompoundingFrequency),
}

const LOAN_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("amount", FieldKind::Currency, Some(LOAN_AMOUNT_RANGE)),
    FieldSpec::new("rate", FieldKind::Number, Some(LOAN_RATE_RANGE)),
    FieldSpec::new("term", FieldKind::Integer, Some(LOAN_TERM_RANGE)),
];

const INTEREST_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("principal", FieldKind::Number, None),
    FieldSpec::new("rate", FieldKind::Number, None),
    FieldSpec::new("term", FieldKind::Number, Some(INTEREST_TERM_RANGE)),
    FieldSpec::new("frequency", FieldKind::Frequency, None),
];

const MORTGAGE_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("price", FieldKind::Currency, Some(HOME_PRICE_RANGE)),
    FieldSpec::new("down", FieldKind::Currency, None),
    FieldSpec::new(
        "down-percent",
        FieldKind::Number,
        Some(DOWN_PAYMENT_PERCENT_RANGE),
    ),
    FieldSpec::new("term", FieldKind::TermChoice(&MORTGAGE_TERM_OPTIONS), None),
    FieldSpec::new("rate", FieldKind::Number, Some(MORTGAGE_RATE_RANGE)),
    FieldSpec::new("tax", FieldKind::Number, Some(PROPERTY_TAX_RANGE)),
    FieldSpec::new("insurance", FieldKind::Number, None),
];

fn fields_for(tab: CalculatorTab) -> &'static [FieldSpec] {
    match tab {
        CalculatorTab::Basic => &[],
        CalculatorTab::Loan => LOAN_FIELDS,
        CalculatorTab::Interest => INTEREST_FIELDS,
        CalculatorTab::Mortgage => MORTGAGE_FIELDS,
    }
}

#[derive(Debug, Clone)]
pub struct LoanTab {
    pub inputs: LoanInputs,
    pub result: LoanResult,
    pub notice: Option<&'static str>,
}

impl LoanTab {
    fn new(inputs: LoanInputs) -> Self {
        let mut tab = Self {
            inputs,
            result: LoanResult::default(),
            notice: None,
        };
        tab.recalculate();
        tab
    }

    fn recalculate(&mut self) {
        let (result, error) = self.inputs.calculate_or_zero();
        self.result = result;
        self.notice = error.map(|e| e.notice());
    }
}

#[derive(Debug, Clone)]
pub struct InterestTab {
    pub inputs: InterestInputs,
    pub result: InterestResult,
}

impl InterestTab {
    fn new(inputs: InterestInputs) -> Self {
        Self {
            result: inputs.calculate(),
            inputs,
        }
    }

    fn recalculate(&mut self) {
        self.result = self.inputs.calculate();
    }
}

#[derive(Debug, Clone)]
pub struct MortgageTab {
    pub inputs: MortgageInputs,
    pub payment: MortgagePayment,
}

impl MortgageTab {
    fn new(inputs: MortgageInputs) -> Self {
        Self {
            payment: inputs.calculate(),
            inputs,
        }
    }

    fn apply(
        &mut self,
        edit: MortgageEdit,
    ) {
        self.inputs.apply(edit);
        self.payment = self.inputs.calculate();
    }
}

/// The four calculators and the active tab.
#[derive(Debug, Clone)]
pub struct Session {
    active: CalculatorTab,
    basic: BasicCalculator,
    loan: LoanTab,
    interest: InterestTab,
    mortgage: MortgageTab,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Session {
    /// Creates a session seeded with the configured starting inputs.
    pub fn new(config: &Config) -> Self {
        Self {
            active: CalculatorTab::default(),
            basic: BasicCalculator::new(),
            loan: LoanTab::new(config.loan),
            interest: InterestTab::new(config.interest),
            mortgage: MortgageTab::new(config.mortgage.to_inputs()),
        }
    }

    pub fn active_tab(&self) -> CalculatorTab {
        self.active
    }

    pub fn basic(&self) -> &BasicCalculator {
        &self.basic
    }

    pub fn loan(&self) -> &LoanTab {
        &self.loan
    }

    pub fn interest(&self) -> &InterestTab {
        &self.interest
    }

    pub fn mortgage(&self) -> &MortgageTab {
        &self.mortgage
    }

    pub fn switch_tab(
        &mut self,
        tab: CalculatorTab,
    ) {
        debug!(from = self.active.as_str(), to = tab.as_str(), "switching tab");
        self.active = tab;
    }

    /// Feeds a line of key tokens to the basic calculator.
    pub fn press_keys(
        &mut self,
        line: &str,
    ) -> Result<(), SessionError> {
        // Parse the whole line first so a typo leaves the calculator untouched.
        let keys = Key::parse_sequence(line)?;
        for key in keys {
            self.basic.press(key);
        }
        Ok(())
    }

    /// Types `raw` into a field of the active tab, using the field's
    /// permissive parser.
    pub fn set_field(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Result<(), SessionError> {
        let spec = self.field_spec(field)?;
        match spec.parse(raw)? {
            FieldValue::Number(value) => self.write_field(spec.name, value),
            FieldValue::Frequency(frequency) => {
                debug!(%frequency, "compounding changed");
                self.interest.inputs.frequency = frequency;
                self.interest.recalculate();
            }
        }
        Ok(())
    }

    /// Moves a field's slider to `raw`, clamped and snapped to the slider's
    /// range and step.
    pub fn slide_field(
        &mut self,
        field: &str,
        raw: &str,
    ) -> Result<(), SessionError> {
        let spec = self.field_spec(field)?;
        let range = spec
            .slider
            .ok_or_else(|| SessionError::NoSlider(spec.name.to_string()))?;
        let value = range.snap(parse_number_input(raw));
        self.write_field(spec.name, value);
        Ok(())
    }

    fn field_spec(
        &self,
        field: &str,
    ) -> Result<FieldSpec, SessionError> {
        fields_for(self.active)
            .iter()
            .find(|spec| spec.name.eq_ignore_ascii_case(field))
            .copied()
            .ok_or_else(|| SessionError::UnknownField {
                tab: self.active,
                field: field.to_string(),
            })
    }

    /// Stores a parsed value. `name` always comes from the active tab's
    /// field table.
    fn write_field(
        &mut self,
        name: &'static str,
        value: f64,
    ) {
        debug!(tab = self.active.as_str(), field = name, value, "field edited");
        match self.active {
            CalculatorTab::Basic => {}
            CalculatorTab::Loan => {
                let inputs = &mut self.loan.inputs;
                match name {
                    "amount" => inputs.principal = value,
                    "rate" => inputs.annual_rate_percent = value,
                    "term" => inputs.term_years = value,
                    _ => return,
                }
                self.loan.recalculate();
            }
            CalculatorTab::Interest => {
                let inputs = &mut self.interest.inputs;
                match name {
                    "principal" => inputs.principal = value,
                    "rate" => inputs.annual_rate_percent = value,
                    "term" => inputs.term_years = value,
                    _ => return,
                }
                self.interest.recalculate();
            }
            CalculatorTab::Mortgage => {
                let edit = match name {
                    "price" => MortgageEdit::HomePrice(value),
                    "down" => MortgageEdit::DownPaymentAmount(value),
                    "down-percent" => MortgageEdit::DownPaymentPercent(value),
                    "term" => MortgageEdit::TermYears(value),
                    "rate" => MortgageEdit::AnnualRate(value),
                    "tax" => MortgageEdit::PropertyTax(value),
                    "insurance" => MortgageEdit::AnnualInsurance(value),
                    _ => return,
                };
                self.mortgage.apply(edit);
            }
        }
    }

    /// Renders the active tab.
    pub fn render(&self) -> String {
        let body = match self.active {
            CalculatorTab::Basic => BasicReport(&self.basic).to_string(),
            CalculatorTab::Loan => LoanReport {
                inputs: &self.loan.inputs,
                result: &self.loan.result,
                notice: self.loan.notice,
            }
            .to_string(),
            CalculatorTab::Interest => InterestReport {
                inputs: &self.interest.inputs,
                result: &self.interest.result,
            }
            .to_string(),
            CalculatorTab::Mortgage => MortgageReport {
                inputs: &self.mortgage.inputs,
                payment: &self.mortgage.payment,
            }
            .to_string(),
        };
        format!("== {} ==\n{body}", self.active)
    }

    fn describe_fields(&self) -> String {
        let fields = fields_for(self.active);
        if fields.is_empty() {
            return format!("{} takes keys, not fields", self.active);
        }
        fields
            .iter()
            .map(|spec| match (spec.slider, spec.kind) {
                (Some(range), _) => format!(
                    "{:<14} slider {}..{} step {}",
                    spec.name, range.min, range.max, range.step
                ),
                (None, FieldKind::TermChoice(options)) => {
                    format!("{:<14} one of {}", spec.name, join_options(options))
                }
                (None, _) => spec.name.to_string(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Executes one line of input.
    pub fn execute(
        &mut self,
        line: &str,
    ) -> Result<Outcome, SessionError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Outcome::Silent);
        }

        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };

        match command.to_ascii_lowercase().as_str() {
            "quit" | "exit" => Ok(Outcome::Quit),
            "help" => Ok(Outcome::Output(HELP.to_string())),
            "show" => Ok(Outcome::Output(self.render())),
            "fields" => Ok(Outcome::Output(self.describe_fields())),
            "tab" => {
                let tab = require(rest, "calculator name")?.parse::<CalculatorTab>()?;
                self.switch_tab(tab);
                Ok(Outcome::Output(self.render()))
            }
            "log" => {
                let level = require(rest, "log level")?;
                logging::set_log_level(level).map_err(|e| SessionError::Logging(e.to_string()))?;
                info!(level, "log level changed");
                Ok(Outcome::Silent)
            }
            "set" | "slide" => {
                let (field, value) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(SessionError::MissingArgument("field and value"))?;
                if command.eq_ignore_ascii_case("set") {
                    self.set_field(field, value.trim())?;
                } else {
                    self.slide_field(field, value.trim())?;
                }
                Ok(Outcome::Output(self.render()))
            }
            _ if self.active == CalculatorTab::Basic => {
                self.press_keys(line)?;
                Ok(Outcome::Output(self.render()))
            }
            _ => Err(SessionError::UnknownCommand(command.to_string())),
        }
    }

    /// Reads commands from `input` until it ends or `quit` is entered,
    /// writing replies to `output`. Command errors are reported and the
    /// session continues.
    pub fn run<R: BufRead, W: Write>(
        &mut self,
        input: R,
        mut output: W,
    ) -> anyhow::Result<()> {
        writeln!(output, "{}", self.render()).context("failed to write output")?;
        for line in input.lines() {
            let line = line.context("failed to read input")?;
            match self.execute(&line) {
                Ok(Outcome::Output(text)) => {
                    writeln!(output, "{text}").context("failed to write output")?
                }
                Ok(Outcome::Silent) => {}
                Ok(Outcome::Quit) => break,
                Err(e) => {
                    warn!(input = %line, error = %e, "command rejected");
                    writeln!(output, "error: {e}").context("failed to write output")?;
                }
            }
            output.flush().context("failed to write output")?;
        }
        Ok(())
    }
}

fn join_options(options: &[u32]) -> String {
    options
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn require<'a>(
    value: &'a str,
    what: &'static str,
) -> Result<&'a str, SessionError> {
    if value.is_empty() {
        Err(SessionError::MissingArgument(what))
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn session_on(tab: CalculatorTab) -> Session {
        let mut session = Session::default();
        session.switch_tab(tab);
        session
    }

    #[test]
    fn starts_on_basic_tab() {
        assert_eq!(Session::default().active_tab(), CalculatorTab::Basic);
    }

    #[test]
    fn keys_reach_basic_calculator() {
        let mut session = Session::default();
        session.execute("5 + 3 =").unwrap();

        assert_eq!(session.basic().display(), "8");
    }

    #[test]
    fn bad_key_line_leaves_calculator_untouched() {
        let mut session = Session::default();
        session.execute("7").unwrap();
        let err = session.execute("+ 2 sqrt").unwrap_err();

        assert!(matches!(err, SessionError::Key(_)));
        assert_eq!(session.basic().display(), "7");
        assert_eq!(session.basic().pending_operator(), None);
    }

    #[test]
    fn tabs_keep_independent_state() {
        let mut session = Session::default();
        session.execute("4 2").unwrap();
        session.execute("tab loan").unwrap();
        session.execute("set amount $50,000").unwrap();
        session.execute("tab basic").unwrap();

        assert_eq!(session.basic().display(), "42");
        assert_eq!(session.loan().inputs.principal, 50000.0);
    }

    #[test]
    fn set_uses_field_parser() {
        let mut session = session_on(CalculatorTab::Loan);
        session.set_field("term", "12.7").unwrap();
        session.set_field("rate", "oops").unwrap();

        assert_eq!(session.loan().inputs.term_years, 12.0);
        assert_eq!(session.loan().inputs.annual_rate_percent, 0.0);
    }

    #[test]
    fn loan_zero_term_shows_notice_and_zero_results() {
        let mut session = session_on(CalculatorTab::Loan);
        session.set_field("term", "0").unwrap();

        assert_eq!(session.loan().result, LoanResult::default());
        assert_eq!(session.loan().notice, Some("Please check your inputs"));

        session.set_field("term", "15").unwrap();
        assert_eq!(session.loan().notice, None);
    }

    #[test]
    fn slide_snaps_to_range() {
        let mut session = session_on(CalculatorTab::Loan);
        session.slide_field("amount", "123456").unwrap();
        session.slide_field("rate", "99").unwrap();

        assert_eq!(session.loan().inputs.principal, 123000.0);
        assert_eq!(session.loan().inputs.annual_rate_percent, 20.0);
    }

    #[test]
    fn slide_rejects_field_without_slider() {
        let mut session = session_on(CalculatorTab::Mortgage);
        let err = session.slide_field("insurance", "100").unwrap_err();

        assert!(matches!(err, SessionError::NoSlider(_)));
    }

    #[test]
    fn set_frequency_recalculates_interest() {
        let mut session = session_on(CalculatorTab::Interest);
        let annual = session.interest().result.future_value;
        session.execute("set frequency monthly").unwrap();

        assert_eq!(
            session.interest().inputs.frequency,
            CompoundingFrequency::Monthly
        );
        assert!(session.interest().result.future_value > annual);
    }

    #[test]
    fn mortgage_edits_keep_down_payment_in_sync() {
        let mut session = session_on(CalculatorTab::Mortgage);
        session.execute("set down $90,000").unwrap();
        assert_eq!(session.mortgage().inputs.down_payment_percent, 30.0);

        session.execute("slide down-percent 10").unwrap();
        assert_eq!(session.mortgage().inputs.down_payment, 30000.0);
        assert_eq!(session.mortgage().payment.loan_amount, 270000.0);
    }

    #[test]
    fn unknown_frequency_leaves_interest_untouched() {
        let mut session = session_on(CalculatorTab::Interest);
        let err = session.set_field("frequency", "hourly").unwrap_err();

        assert!(matches!(err, SessionError::Frequency(_)));
        assert_eq!(
            session.interest().inputs.frequency,
            CompoundingFrequency::Annually
        );
    }

    #[test]
    fn mortgage_term_must_be_an_offered_option() {
        let mut session = session_on(CalculatorTab::Mortgage);
        session.set_field("term", "15").unwrap();
        let err = session.set_field("term", "25").unwrap_err();

        assert_eq!(session.mortgage().inputs.term_years, 15.0);
        assert_eq!(
            err.to_string(),
            "'25' is not offered for term (choose 10, 15, 20, 30)"
        );
    }

    #[test]
    fn unknown_field_names_the_tab() {
        let mut session = session_on(CalculatorTab::Loan);
        let err = session.execute("set price 1").unwrap_err();

        assert_eq!(err.to_string(), "Loan Calculator has no field 'price'");
    }

    #[test]
    fn unknown_command_on_formula_tab_is_rejected() {
        let mut session = session_on(CalculatorTab::Interest);

        assert!(matches!(
            session.execute("5 + 3"),
            Err(SessionError::UnknownCommand(_))
        ));
    }

    #[test]
    fn set_requires_a_value() {
        let mut session = session_on(CalculatorTab::Loan);

        assert!(matches!(
            session.execute("set amount"),
            Err(SessionError::MissingArgument(_))
        ));
    }

    #[test]
    fn quit_and_blank_lines() {
        let mut session = Session::default();

        assert_eq!(session.execute("   ").unwrap(), Outcome::Silent);
        assert_eq!(session.execute("QUIT").unwrap(), Outcome::Quit);
    }
}
