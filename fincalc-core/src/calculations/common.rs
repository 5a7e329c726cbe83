//! Common utility functions for the financial formulas.
//!
//! Formulas are evaluated in `f64`; [`Decimal`] is only used when a value is
//! rounded for display or compared to the cent.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Number of months in a year, used to convert annual figures.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Rounds a decimal value to `decimal_places` using half-up rounding.
///
/// Values exactly halfway between two representable results are rounded
/// away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(123.454), 2), dec!(123.45));
/// assert_eq!(round_half_up(dec!(123.455), 2), dec!(123.46));
/// assert_eq!(round_half_up(dec!(-0.5), 0), dec!(-1));
/// ```
pub fn round_half_up(
    value: Decimal,
    decimal_places: u32,
) -> Decimal {
    value.round_dp_with_strategy(
        decimal_places,
        rust_decimal::RoundingStrategy::MidpointAwayFromZero,
    )
}

/// Converts a computed amount to whole cents.
///
/// Returns `None` for non-finite values and for magnitudes outside the range
/// of [`Decimal`].
///
/// ```
/// use rust_decimal_macros::dec;
/// use fincalc_core::calculations::common::to_cents;
///
/// assert_eq!(to_cents(817.0846), Some(dec!(817.08)));
/// assert_eq!(to_cents(f64::NAN), None);
/// ```
pub fn to_cents(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).map(|d| round_half_up(d, 2))
}

/// Converts an annual percentage rate to a monthly fraction (`R / 100 / 12`).
pub fn monthly_rate(annual_rate_percent: f64) -> f64 {
    annual_rate_percent / 100.0 / MONTHS_PER_YEAR
}

/// Number of monthly payments in a term of `term_years`.
pub fn payment_count(term_years: f64) -> f64 {
    term_years * MONTHS_PER_YEAR
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(123.454), 2), dec!(123.45));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455), 2), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455), 2), dec!(-123.46));
    }

    #[test]
    fn round_half_up_to_whole_units() {
        assert_eq!(round_half_up(dec!(1520.5), 0), dec!(1521));
        assert_eq!(round_half_up(dec!(1520.49), 0), dec!(1520));
    }

    #[test]
    fn to_cents_rejects_non_finite_values() {
        assert_eq!(to_cents(f64::INFINITY), None);
        assert_eq!(to_cents(f64::NEG_INFINITY), None);
        assert_eq!(to_cents(f64::NAN), None);
    }

    #[test]
    fn to_cents_rounds_to_two_places() {
        assert_eq!(to_cents(1000.0), Some(dec!(1000.00)));
        assert_eq!(to_cents(0.004), Some(dec!(0.00)));
    }

    #[test]
    fn monthly_rate_divides_percentage_by_twelve_hundred() {
        assert!((monthly_rate(12.0) - 0.01).abs() < 1e-15);
        assert_eq!(monthly_rate(0.0), 0.0);
    }

    #[test]
    fn payment_count_converts_years_to_months() {
        assert_eq!(payment_count(15.0), 180.0);
        assert_eq!(payment_count(0.0), 0.0);
    }
}
