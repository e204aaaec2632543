//! Currency arithmetic helpers.

use rust_decimal::{Decimal, RoundingStrategy};

/// Number of fractional digits kept for every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Largest amount a `NUMERIC(12, 2)` column holds.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, MONEY_SCALE);

/// Round to cents, half away from zero.
#[must_use]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// True when `value` is strictly positive and already expressed in whole cents.
#[must_use]
pub fn is_positive_amount(value: Decimal) -> bool {
    value > Decimal::ZERO && round2(value) == value
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap_or_default()
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(dec("1.005")), dec("1.01"));
        assert_eq!(round2(dec("1.004")), dec("1.00"));
        assert_eq!(round2(dec("2.675")), dec("2.68"));
    }

    #[test]
    fn round2_keeps_exact_cents() {
        assert_eq!(round2(dec("19.99")), dec("19.99"));
    }

    #[test]
    fn max_amount_fills_twelve_digits() {
        assert_eq!(MAX_AMOUNT, dec("9999999999.99"));
    }

    #[test]
    fn positive_amount_rejects_zero_negative_and_fractional_cents() {
        assert!(is_positive_amount(dec("20")));
        assert!(is_positive_amount(dec("0.01")));
        assert!(!is_positive_amount(Decimal::ZERO));
        assert!(!is_positive_amount(dec("-5")));
        assert!(!is_positive_amount(dec("1.001")));
    }
}
