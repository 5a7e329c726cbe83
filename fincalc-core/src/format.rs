//! Display formatting for calculator values.
//!
//! Numbers on the basic calculator are rendered the way a browser
//! stringifies a double; money is rendered in US dollars with thousands
//! separators. Rounding for display goes through [`Decimal`] so that values
//! at exactly half a cent round away from zero.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use crate::calculations::common::round_half_up;

/// Renders a number for the calculator display and history.
///
/// - integral values have no fractional part (`8`, not `8.0`)
/// - negative zero renders as `0`
/// - non-finite values render as `Infinity`, `-Infinity` and `NaN`
/// - magnitudes of `1e21` and above, or below `1e-6`, use exponent notation
///   with an explicit sign (`1e+21`, `1.5e-7`)
///
/// # Examples
///
/// ```
/// use fincalc_core::format::format_number;
///
/// assert_eq!(format_number(8.0), "8");
/// assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
/// assert_eq!(format_number(1.0 / 0.0), "Infinity");
/// assert_eq!(format_number(-0.0), "0");
/// ```
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        return exponent_form(value);
    }
    value.to_string()
}

fn exponent_form(value: f64) -> String {
    let rendered = format!("{value:e}");
    match rendered.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => rendered,
    }
}

/// Renders `value` as US dollars with `decimals` fractional digits.
///
/// # Examples
///
/// ```
/// use fincalc_core::format::format_currency;
///
/// assert_eq!(format_currency(817.0846, 2), "$817.08");
/// assert_eq!(format_currency(1234567.5, 0), "$1,234,568");
/// assert_eq!(format_currency(-42.5, 2), "-$42.50");
/// ```
pub fn format_currency(
    value: f64,
    decimals: u32,
) -> String {
    if value.is_nan() {
        return "$NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "$∞" } else { "-$∞" }.to_string();
    }

    let (negative, digits) = fixed_digits(value, decimals);
    let (whole, fraction) = match digits.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (digits.as_str(), None),
    };

    let mut out = String::with_capacity(digits.len() + 4);
    if negative {
        out.push('-');
    }
    out.push('$');
    out.push_str(&group_thousands(whole));
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

/// Renders `value` as a percentage with `decimals` fractional digits.
///
/// ```
/// use fincalc_core::format::format_percent;
///
/// assert_eq!(format_percent(5.0, 2), "5.00%");
/// assert_eq!(format_percent(33.333, 1), "33.3%");
/// ```
pub fn format_percent(
    value: f64,
    decimals: u32,
) -> String {
    if !value.is_finite() {
        return format!("{}%", format_number(value));
    }
    let (negative, digits) = fixed_digits(value, decimals);
    let sign = if negative { "-" } else { "" };
    format!("{sign}{digits}%")
}

/// Rounds a finite value to `decimals` places and returns the sign and the
/// absolute digits. A value that rounds to zero is never negative.
fn fixed_digits(
    value: f64,
    decimals: u32,
) -> (bool, String) {
    match Decimal::from_f64(value) {
        Some(d) => {
            let rounded = round_half_up(d, decimals);
            let negative = rounded.is_sign_negative() && !rounded.is_zero();
            (negative, format!("{:.*}", decimals as usize, rounded.abs()))
        }
        None => (value < 0.0, expand_beyond_decimal(value.abs(), decimals)),
    }
}

/// Fixed-point digits for a magnitude too large for [`Decimal`], built from
/// the shortest round-trip digits so `1e29` prints as a one followed by
/// zeros rather than its exact binary expansion. Such magnitudes are always
/// integral.
fn expand_beyond_decimal(
    magnitude: f64,
    decimals: u32,
) -> String {
    let scientific = format!("{magnitude:e}");
    let parsed = scientific
        .split_once('e')
        .and_then(|(mantissa, exponent)| Some((mantissa, exponent.parse::<usize>().ok()?)));
    let Some((mantissa, exponent)) = parsed else {
        return format!("{magnitude:.*}", decimals as usize);
    };

    let mut digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let width = exponent + 1;
    if digits.len() < width {
        digits.push_str(&"0".repeat(width - digits.len()));
    }
    if decimals > 0 {
        digits.push('.');
        digits.push_str(&"0".repeat(decimals as usize));
    }
    digits
}

/// Inserts `,` between groups of three digits.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
