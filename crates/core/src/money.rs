//! Monetary arithmetic helpers.
//!
//! All monetary amounts in the domain are `rust_decimal::Decimal` values held
//! at currency precision (2 decimal places). Binary floating point is never
//! used for money; repeated recomputation must not drift.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{DomainError, DomainResult};

/// Currency precision: 2 decimal places.
pub const CURRENCY_DP: u32 = 2;

/// Round a monetary value to currency precision, half-up.
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointAwayFromZero)
}

/// Compute `quantity * unit_price` at currency precision.
///
/// Fails with [`DomainError::Arithmetic`] on a negative unit price or on
/// overflow. Quantity positivity is validated by the caller (line items
/// require a positive quantity before any amount math runs).
pub fn line_subtotal(quantity: i64, unit_price: Decimal) -> DomainResult<Decimal> {
    if unit_price.is_sign_negative() {
        return Err(DomainError::arithmetic("unit price cannot be negative"));
    }

    let amount = Decimal::from(quantity)
        .checked_mul(unit_price)
        .ok_or_else(|| DomainError::arithmetic("line subtotal overflow"))?;

    Ok(round_currency(amount))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rounds_half_up_at_two_decimal_places() {
        assert_eq!(round_currency(Decimal::new(10005, 3)), Decimal::new(1001, 2)); // 10.005 -> 10.01
        assert_eq!(round_currency(Decimal::new(10004, 3)), Decimal::new(1000, 2)); // 10.004 -> 10.00
    }

    #[test]
    fn line_subtotal_multiplies_and_rounds() {
        // 3 * 19.99 = 59.97
        let subtotal = line_subtotal(3, Decimal::new(1999, 2)).unwrap();
        assert_eq!(subtotal, Decimal::new(5997, 2));
    }

    #[test]
    fn line_subtotal_rejects_negative_unit_price() {
        let err = line_subtotal(1, Decimal::new(-100, 2)).unwrap_err();
        assert!(matches!(err, DomainError::Arithmetic(_)));
    }

    #[test]
    fn zero_unit_price_is_allowed() {
        let subtotal = line_subtotal(5, Decimal::ZERO).unwrap();
        assert_eq!(subtotal, Decimal::ZERO);
    }
}
