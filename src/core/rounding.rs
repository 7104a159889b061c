use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

/// Difference from the first rounding at or above which one more unit is added.
const HALF_UNIT: Decimal = dec!(0.50);

/// Round a rupiah amount to a whole unit.
///
/// Two steps, both on the original `amount`:
/// 1. `r` = round to 0 decimal places, midpoint away from zero.
/// 2. if `amount - r >= 0.50`, return `r + 1`, else `r`.
///
/// For non-negative amounts this is plain half-up: `18000.49 → 18000`,
/// `18000.50 → 18001`. For negative ties step 2 fires, so `-0.50 → 0`
/// and `-1.50 → -1` (ties move toward positive infinity).
///
/// ```
/// use rust_decimal_macros::dec;
/// use tagihan::core::round_money;
///
/// assert_eq!(round_money(dec!(18000.49)), dec!(18000));
/// assert_eq!(round_money(dec!(18000.50)), dec!(18001));
/// ```
pub fn round_money(amount: Decimal) -> Decimal {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let diff = amount - rounded;
    if diff >= HALF_UNIT {
        rounded + Decimal::ONE
    } else {
        rounded
    }
}

/// True if the amount has no fractional part.
pub fn is_whole_amount(amount: Decimal) -> bool {
    amount.fract().is_zero()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn below_half_rounds_down() {
        assert_eq!(round_money(dec!(18000.49)), dec!(18000));
        assert_eq!(round_money(dec!(18000.4999)), dec!(18000));
    }

    #[test]
    fn half_rounds_up() {
        assert_eq!(round_money(dec!(18000.50)), dec!(18001));
        assert_eq!(round_money(dec!(0.50)), dec!(1));
    }

    #[test]
    fn above_half_rounds_up() {
        assert_eq!(round_money(dec!(18000.99)), dec!(18001));
        assert_eq!(round_money(dec!(18000.51)), dec!(18001));
    }

    #[test]
    fn whole_amounts_unchanged() {
        assert_eq!(round_money(dec!(18000.00)), dec!(18000));
        assert_eq!(round_money(Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn negative_ties_move_toward_positive() {
        assert_eq!(round_money(dec!(-0.50)), dec!(0));
        assert_eq!(round_money(dec!(-1.50)), dec!(-1));
        assert_eq!(round_money(dec!(-1.49)), dec!(-1));
        assert_eq!(round_money(dec!(-1.51)), dec!(-2));
    }

    #[test]
    fn result_is_whole() {
        for v in [dec!(1.01), dec!(2.5), dec!(99999.994), dec!(-7.25)] {
            assert!(is_whole_amount(round_money(v)), "{v}");
        }
    }
}
