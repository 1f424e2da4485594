//! Monetary amounts

use rust_decimal::{Decimal, RoundingStrategy};

/// Tolerance when comparing a caller-supplied amount with a server-computed one.
pub const AMOUNT_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Round to cents, halves away from zero.
#[must_use]
pub fn round_money(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Whether two amounts agree within [`AMOUNT_TOLERANCE`].
#[must_use]
pub fn amounts_match(expected: Decimal, claimed: Decimal) -> bool {
    (expected - claimed).abs() <= AMOUNT_TOLERANCE
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn rounds_halves_away_from_zero() {
        assert_eq!(round_money(dec!(1.005)), dec!(1.01));
        assert_eq!(round_money(dec!(1.004)), dec!(1.00));
        assert_eq!(round_money(dec!(16)), dec!(16.00));
    }

    #[test]
    fn tolerance_is_one_cent() {
        assert_eq!(AMOUNT_TOLERANCE, dec!(0.01));
        assert!(amounts_match(dec!(144.00), dec!(144.01)));
        assert!(amounts_match(dec!(144.00), dec!(143.99)));
        assert!(!amounts_match(dec!(144.00), dec!(134.00)));
    }
}
