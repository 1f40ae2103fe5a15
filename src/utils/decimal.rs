//! Decimal arithmetic utilities for funding rate conversions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::str::FromStr;

/// Funding settlements per day on an hourly venue.
pub const HOURS_PER_DAY: Decimal = dec!(24);

/// Days used to annualize a rate (no compounding).
pub const DAYS_PER_YEAR: Decimal = dec!(365);

/// Parse a decimal from text the way exchange APIs encode numbers.
///
/// Accepts plain decimals ("0.0001", "-12.5") and scientific notation
/// ("1.25e-5"), which `serde_json` produces for very small floats.
pub fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
}

/// Convert a raw fractional rate (0.0001) to a percentage (0.01).
///
/// `None` if the result does not fit in a `Decimal`.
pub fn to_percentage(rate: Decimal) -> Option<Decimal> {
    rate.checked_mul(dec!(100))
}

/// Annualize an hourly fractional rate as a percentage: rate × 24 × 365 × 100.
///
/// `None` on overflow.
pub fn hourly_to_apr(hourly_rate: Decimal) -> Option<Decimal> {
    hourly_rate
        .checked_mul(HOURS_PER_DAY)?
        .checked_mul(DAYS_PER_YEAR)
        .and_then(to_percentage)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("0.0001"), Some(dec!(0.0001)));
        assert_eq!(parse_decimal(" -0.0002 "), Some(dec!(-0.0002)));
        assert_eq!(parse_decimal("1234567.89"), Some(dec!(1234567.89)));
        assert_eq!(parse_decimal("1.25e-5"), Some(dec!(0.0000125)));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("n/a"), None);
    }

    #[test]
    fn test_hourly_conversions() {
        assert_eq!(to_percentage(dec!(0.0001)), Some(dec!(0.01)));
        assert_eq!(hourly_to_apr(dec!(0.0001)), Some(dec!(87.6)));
        assert_eq!(hourly_to_apr(dec!(-0.0002)), Some(dec!(-175.2)));
        assert_eq!(hourly_to_apr(Decimal::ZERO), Some(Decimal::ZERO));
    }

    #[test]
    fn test_conversions_report_overflow() {
        let huge = parse_decimal("1e27").unwrap();
        assert_eq!(to_percentage(huge), None);
        assert_eq!(hourly_to_apr(huge), None);
        assert_eq!(hourly_to_apr(Decimal::MAX), None);
        assert_eq!(to_percentage(Decimal::MIN), None);

        // Fits as a percentage, overflows once annualized.
        let large = parse_decimal("1e23").unwrap();
        assert!(to_percentage(large).is_some());
        assert_eq!(hourly_to_apr(large), None);
    }

    #[test]
    fn test_apr_matches_hourly_percentage() {
        let rate = dec!(0.0000125);
        assert_eq!(
            hourly_to_apr(rate),
            to_percentage(rate).map(|pct| pct * HOURS_PER_DAY * DAYS_PER_YEAR)
        );
    }
}
