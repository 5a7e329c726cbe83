//! Permissive parsing of form input and bounded slider values.
//!
//! Text inputs never fail: anything that cannot be read as a number is
//! treated as zero.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

static NON_NUMERIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9.]").expect("NON_NUMERIC is a valid pattern"));

/// Reads the longest numeric prefix of `text`, returning `NaN` when there
/// is none.
///
/// Leading whitespace and a sign are allowed, as are `Infinity`, a single
/// decimal point and an exponent. Trailing garbage is ignored, so `"12.5kg"`
/// reads as `12.5` and `"1.2.3"` as `1.2`.
///
/// # Examples
///
/// ```
/// use fincalc_core::input::parse_float_prefix;
///
/// assert_eq!(parse_float_prefix("0."), 0.0);
/// assert_eq!(parse_float_prefix("-12.5e2x"), -1250.0);
/// assert!(parse_float_prefix("abc").is_nan());
/// ```
pub fn parse_float_prefix(text: &str) -> f64 {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let mut seen_digit = false;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        seen_digit = true;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            seen_digit = true;
        }
    }
    if !seen_digit {
        return f64::NAN;
    }

    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

/// Parses a currency-style text field such as `"$1,250.00"`.
///
/// Every character other than a digit or `.` is removed before parsing, so
/// signs are dropped as well. Unparseable input yields `0`.
pub fn parse_currency_input(text: &str) -> f64 {
    let stripped = NON_NUMERIC.replace_all(text, "");
    or_zero(text, parse_float_prefix(&stripped))
}

/// Parses a plain numeric field (rates, terms, premiums). Unparseable input
/// yields `0`.
pub fn parse_number_input(text: &str) -> f64 {
    or_zero(text, parse_float_prefix(text))
}

/// Parses the leading integer of a field, ignoring any fractional part.
/// Unparseable input yields `0`.
pub fn parse_integer_input(text: &str) -> f64 {
    let s = text.trim_start();
    let sign_len = usize::from(matches!(s.as_bytes().first(), Some(b'+' | b'-')));
    let digits_len = s[sign_len..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    let value = if digits_len == 0 {
        f64::NAN
    } else {
        s[..sign_len + digits_len].parse().unwrap_or(f64::NAN)
    };
    or_zero(text, value)
}

fn or_zero(
    text: &str,
    value: f64,
) -> f64 {
    if value.is_nan() {
        debug!(input = %text, "unparseable input treated as zero");
        0.0
    } else {
        value
    }
}

/// The bounds and granularity of a slider control.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

pub const LOAN_AMOUNT_RANGE: SliderRange = SliderRange::new(1_000.0, 1_000_000.0, 1_000.0);
pub const LOAN_RATE_RANGE: SliderRange = SliderRange::new(0.1, 20.0, 0.1);
pub const LOAN_TERM_RANGE: SliderRange = SliderRange::new(1.0, 40.0, 1.0);
pub const INTEREST_TERM_RANGE: SliderRange = SliderRange::new(1.0, 50.0, 1.0);
pub const HOME_PRICE_RANGE: SliderRange = SliderRange::new(50_000.0, 1_000_000.0, 5_000.0);
pub const DOWN_PAYMENT_PERCENT_RANGE: SliderRange = SliderRange::new(0.0, 50.0, 1.0);
pub const MORTGAGE_RATE_RANGE: SliderRange = SliderRange::new(0.0, 15.0, 0.125);
pub const PROPERTY_TAX_RANGE: SliderRange = SliderRange::new(0.0, 5.0, 0.01);

impl SliderRange {
    pub const fn new(
        min: f64,
        max: f64,
        step: f64,
    ) -> Self {
        Self { min, max, step }
    }

    pub fn contains(
        &self,
        value: f64,
    ) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Clamps `value` into the range and moves it to the nearest step,
    /// counted from `min`. `NaN` snaps to `min`.
    ///
    /// ```
    /// use fincalc_core::input::LOAN_RATE_RANGE;
    ///
    /// assert_eq!(LOAN_RATE_RANGE.snap(5.46), 5.5);
    /// assert_eq!(LOAN_RATE_RANGE.snap(35.0), 20.0);
    /// ```
    pub fn snap(
        &self,
        value: f64,
    ) -> f64 {
        if value.is_nan() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        let snapped = (self.min + steps * self.step).min(self.max);

        // 0.1-sized steps accumulate binary error; trim to the step's precision.
        let scale = 10f64.powi(self.step_decimals());
        (snapped * scale).round() / scale
    }

    fn step_decimals(&self) -> i32 {
        self.step
            .to_string()
            .split_once('.')
            .map_or(0, |(_, fraction)| fraction.len() as i32)
    }
}
