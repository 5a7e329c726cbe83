//! Four-function calculator with an append-only history.
//!
//! The calculator interprets a sequence of key presses into a running
//! result. Its state is an explicit [`CalculatorMode`] rather than a set of
//! independent flags, so a pending operator can never exist without the
//! value it applies to.
//!
//! # Example
//!
//! ```
//! use fincalc_core::calculations::{BasicCalculator, Key};
//!
//! let mut calc = BasicCalculator::new();
//! for key in Key::parse_sequence("5 + 3 = 10 × 2 =").unwrap() {
//!     calc.press(key);
//! }
//!
//! assert_eq!(calc.display(), "20");
//! assert_eq!(calc.history().lines(), vec!["5 + 3 = 8", "10 × 2 = 20"]);
//! ```

use std::str::FromStr;

use thiserror::Error;
use tracing::{debug, trace};

use crate::format::format_number;
use crate::input::parse_float_prefix;
use crate::models::{History, HistoryEntry, Operator};

/// Errors that can occur when reading key presses from text.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum KeyParseError {
    /// The token is not a calculator key.
    #[error("unrecognized key '{0}'")]
    Unrecognized(String),
}

/// A single key on the calculator keypad.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A digit from 0 to 9.
    Digit(u8),
    Decimal,
    Operator(Operator),
    Equals,
    ClearAll,
    ClearEntry,
    ToggleSign,
    Percent,
    ClearHistory,
}

impl Key {
    /// Parses a single keypad token.
    ///
    /// Accepted tokens are the digits, `.`, the operator symbols (see
    /// [`Operator::parse`]), `=`, `AC`, `CE`, `+/-` (or `±`), `%` and `CH`
    /// (clear history). Letter tokens are case-insensitive.
    pub fn parse(token: &str) -> Result<Self, KeyParseError> {
        if token.len() == 1 {
            if let Some(d) = token.chars().next().and_then(|c| c.to_digit(10)) {
                return Ok(Self::Digit(d as u8));
            }
        }
        if let Some(op) = Operator::parse(token) {
            return Ok(Self::Operator(op));
        }

        match token.to_ascii_uppercase().as_str() {
            "." => Ok(Self::Decimal),
            "=" => Ok(Self::Equals),
            "AC" => Ok(Self::ClearAll),
            "CE" => Ok(Self::ClearEntry),
            "+/-" | "±" => Ok(Self::ToggleSign),
            "%" => Ok(Self::Percent),
            "CH" => Ok(Self::ClearHistory),
            _ => Err(KeyParseError::Unrecognized(token.to_string())),
        }
    }

    /// Parses whitespace-separated tokens into key presses.
    ///
    /// A token made only of digits and `.` (such as `12.5`) expands into one
    /// press per character.
    pub fn parse_sequence(input: &str) -> Result<Vec<Self>, KeyParseError> {
        let mut keys = Vec::new();
        for token in input.split_whitespace() {
            let is_numeral =
                token.len() > 1 && token.chars().all(|c| c.is_ascii_digit() || c == '.');
            if is_numeral {
                for c in token.chars() {
                    keys.push(Self::parse(&c.to_string())?);
                }
            } else {
                keys.push(Self::parse(token)?);
            }
        }
        Ok(keys)
    }
}

impl FromStr for Key {
    type Err = KeyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Where the calculator is in an entry.
///
/// `Settled` and `AwaitingOperand` are the two "waiting for operand" states:
/// the next digit starts a fresh entry instead of extending the display.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CalculatorMode {
    /// Typing a number with nothing pending.
    #[default]
    Entering,
    /// Equals produced the displayed result.
    Settled,
    /// An operator was pressed and no digit has been typed since. `edited`
    /// is set once CE, +/- or % changes the display, which then counts as
    /// the right operand.
    AwaitingOperand {
        accumulated: f64,
        operator: Operator,
        edited: bool,
    },
    /// Typing the right operand of a pending operation.
    EnteringOperand { accumulated: f64, operator: Operator },
}

impl CalculatorMode {
    pub fn is_waiting_for_operand(&self) -> bool {
        matches!(self, Self::Settled | Self::AwaitingOperand { .. })
    }

    /// The stored left operand and operator, if an operation is pending.
    pub fn pending(&self) -> Option<(f64, Operator)> {
        match *self {
            Self::AwaitingOperand {
                accumulated,
                operator,
                ..
            }
            | Self::EnteringOperand {
                accumulated,
                operator,
            } => Some((accumulated, operator)),
            Self::Entering | Self::Settled => None,
        }
    }
}

/// The basic calculator: display buffer, mode and history.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicCalculator {
    display: String,
    mode: CalculatorMode,
    history: History,
}

impl Default for BasicCalculator {
    fn default() -> Self {
        Self::new()
    }
}

impl BasicCalculator {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
            mode: CalculatorMode::Entering,
            history: History::new(),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn mode(&self) -> CalculatorMode {
        self.mode
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// The stored left operand, if an operation is pending.
    pub fn current_value(&self) -> Option<f64> {
        self.mode.pending().map(|(value, _)| value)
    }

    pub fn pending_operator(&self) -> Option<Operator> {
        self.mode.pending().map(|(_, op)| op)
    }

    pub fn is_waiting_for_operand(&self) -> bool {
        self.mode.is_waiting_for_operand()
    }

    /// Numeric value of the display.
    pub fn display_value(&self) -> f64 {
        parse_float_prefix(&self.display)
    }

    /// Dispatches a key press to the matching operation.
    pub fn press(
        &mut self,
        key: Key,
    ) {
        trace!(?key, display = %self.display, "key press");
        match key {
            Key::Digit(d) => self.input_digit(d),
            Key::Decimal => self.input_decimal(),
            Key::Operator(op) => self.apply_operator(op),
            Key::Equals => self.equals(),
            Key::ClearAll => self.clear_all(),
            Key::ClearEntry => self.clear_entry(),
            Key::ToggleSign => self.toggle_sign(),
            Key::Percent => self.percent(),
            Key::ClearHistory => self.clear_history(),
        }
    }

    /// Resets the display and drops any pending operation. History is kept.
    pub fn clear_all(&mut self) {
        self.display = "0".to_string();
        self.mode = CalculatorMode::Entering;
    }

    /// Resets only the display; a pending operation survives.
    pub fn clear_entry(&mut self) {
        self.edit_display("0".to_string());
    }

    pub fn toggle_sign(&mut self) {
        self.edit_display(format_number(-self.display_value()));
    }

    pub fn percent(&mut self) {
        self.edit_display(format_number(self.display_value() / 100.0));
    }

    /// Replaces the display in place. While waiting for an operand the new
    /// display becomes the right operand, but the next digit still starts a
    /// fresh entry.
    fn edit_display(
        &mut self,
        display: String,
    ) {
        self.display = display;
        if let CalculatorMode::AwaitingOperand { edited, .. } = &mut self.mode {
            *edited = true;
        }
    }

    /// Enters a digit. Values above 9 are ignored.
    ///
    /// While waiting for an operand the digit replaces the display;
    /// otherwise it is appended, except that a lone `"0"` is replaced.
    pub fn input_digit(
        &mut self,
        digit: u8,
    ) {
        if digit > 9 {
            debug!(digit, "ignoring non-decimal digit");
            return;
        }
        let ch = char::from(b'0' + digit);

        match self.mode {
            CalculatorMode::Settled => {
                self.display = ch.to_string();
                self.mode = CalculatorMode::Entering;
            }
            CalculatorMode::AwaitingOperand {
                accumulated,
                operator,
                ..
            } => {
                self.display = ch.to_string();
                self.mode = CalculatorMode::EnteringOperand {
                    accumulated,
                    operator,
                };
            }
            CalculatorMode::Entering | CalculatorMode::EnteringOperand { .. } => {
                if self.display == "0" {
                    self.display = ch.to_string();
                } else {
                    self.display.push(ch);
                }
            }
        }
    }

    /// Enters a decimal point. The display holds at most one.
    pub fn input_decimal(&mut self) {
        match self.mode {
            CalculatorMode::Settled => {
                self.display = "0.".to_string();
                self.mode = CalculatorMode::Entering;
            }
            CalculatorMode::AwaitingOperand {
                accumulated,
                operator,
                ..
            } => {
                self.display = "0.".to_string();
                self.mode = CalculatorMode::EnteringOperand {
                    accumulated,
                    operator,
                };
            }
            CalculatorMode::Entering | CalculatorMode::EnteringOperand { .. } => {
                if !self.display.contains('.') {
                    self.display.push('.');
                }
            }
        }
    }

    /// Presses an operator key.
    ///
    /// - With nothing pending, the displayed value becomes the left operand.
    /// - After a freshly entered or edited right operand, the pending
    ///   operation is evaluated and its result becomes the new left operand.
    /// - Pressed again with the display untouched, the pending operator is
    ///   replaced.
    pub fn apply_operator(
        &mut self,
        operator: Operator,
    ) {
        let accumulated = match self.mode {
            CalculatorMode::Entering | CalculatorMode::Settled => self.display_value(),
            CalculatorMode::AwaitingOperand {
                accumulated,
                edited: false,
                ..
            } => accumulated,
            CalculatorMode::AwaitingOperand {
                accumulated,
                operator: pending,
                edited: true,
            }
            | CalculatorMode::EnteringOperand {
                accumulated,
                operator: pending,
            } => self.evaluate(accumulated, pending),
        };

        self.mode = CalculatorMode::AwaitingOperand {
            accumulated,
            operator,
            edited: false,
        };
    }

    /// Evaluates the pending operation with the display as right operand.
    /// Does nothing when no operator is pending.
    pub fn equals(&mut self) {
        let Some((accumulated, operator)) = self.mode.pending() else {
            trace!("equals with nothing pending");
            return;
        };

        self.evaluate(accumulated, operator);
        self.mode = CalculatorMode::Settled;
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    /// Computes `accumulated <operator> display`, shows the result and
    /// records it.
    fn evaluate(
        &mut self,
        accumulated: f64,
        operator: Operator,
    ) -> f64 {
        let operand = self.display_value();
        let result = operator.apply(accumulated, operand);
        let entry = HistoryEntry {
            lhs: accumulated,
            operator,
            rhs: operand,
            result,
        };

        debug!(entry = %entry, "evaluated");
        self.display = format_number(result);
        self.history.push(entry);
        result
    }
}
