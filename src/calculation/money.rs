//! Peso rounding.
//!
//! Every line item is rounded to a whole peso before it is stored, and
//! aggregates are sums of rounded items.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to the nearest whole peso, halves away from zero, and clamps
/// negative amounts to zero.
///
/// # Example
///
/// ```
/// use payroll_engine::calculation::round_peso;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_peso(Decimal::new(5335, 1)), Decimal::from(534)); // 533.5
/// assert_eq!(round_peso(Decimal::new(5334, 1)), Decimal::from(533)); // 533.4
/// assert_eq!(round_peso(Decimal::from(-10)), Decimal::ZERO);
/// ```
pub fn round_peso(amount: Decimal) -> Decimal {
    amount
        .max(Decimal::ZERO)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_half_rounds_up() {
        assert_eq!(round_peso(dec("0.5")), dec("1"));
        assert_eq!(round_peso(dec("2.5")), dec("3"));
    }

    #[test]
    fn test_below_half_rounds_down() {
        assert_eq!(round_peso(dec("533333.3333")), dec("533333"));
    }

    #[test]
    fn test_result_has_no_fraction() {
        assert_eq!(round_peso(dec("1000000.00")).scale(), 0);
    }

    #[test]
    fn test_negative_is_clamped() {
        assert_eq!(round_peso(dec("-0.4")), Decimal::ZERO);
        assert_eq!(round_peso(dec("-1500")), Decimal::ZERO);
    }
}
