use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use autoparts_core::money::round_currency;
use autoparts_core::{DomainError, DomainResult, ValueObject};

use crate::line::LineItem;

/// Sales tax rate applied to an order subtotal.
///
/// A single named parameter: the business currently operates at a flat 16%
/// and the rate is injected wherever totals are computed, never hard-coded at
/// the call sites.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(Decimal);

impl TaxRate {
    /// Validate and construct a rate. Must lie in `[0, 1)`.
    pub fn new(rate: Decimal) -> DomainResult<Self> {
        if rate.is_sign_negative() || rate >= Decimal::ONE {
            return Err(DomainError::validation(format!(
                "tax rate must be in [0, 1): {rate}"
            )));
        }
        Ok(Self(rate))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl Default for TaxRate {
    /// Flat 16%.
    fn default() -> Self {
        Self(Decimal::new(16, 2))
    }
}

impl ValueObject for TaxRate {}

/// An order's monetary totals, derived from its current line set.
///
/// Invariants, by construction:
/// - `subtotal == sum(line.subtotal)`
/// - `tax == round(subtotal * rate, 2)` (half-up)
/// - `total == subtotal + tax`
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderTotals {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl OrderTotals {
    /// The totals of an order with no lines — a valid terminal state
    /// (e.g. every line removed).
    pub fn zero() -> Self {
        Self {
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
        }
    }

    /// Aggregate the current line set into definitionally-correct totals.
    ///
    /// Pure and deterministic: recomputing over the same lines always yields
    /// the same result, so redundant recomputation is safe.
    pub fn from_lines(lines: &[LineItem], rate: TaxRate) -> DomainResult<Self> {
        let mut subtotal = Decimal::ZERO;
        for line in lines {
            subtotal = subtotal
                .checked_add(line.subtotal())
                .ok_or_else(|| DomainError::arithmetic("order subtotal overflow"))?;
        }

        let tax = round_currency(
            subtotal
                .checked_mul(rate.as_decimal())
                .ok_or_else(|| DomainError::arithmetic("order tax overflow"))?,
        );

        let total = subtotal
            .checked_add(tax)
            .ok_or_else(|| DomainError::arithmetic("order total overflow"))?;

        Ok(Self {
            subtotal,
            tax,
            total,
        })
    }
}

impl ValueObject for OrderTotals {}

#[cfg(test)]
mod tests {
    use super::*;
    use autoparts_core::ProductId;
    use proptest::prelude::*;

    fn line(line_no: u32, quantity: i64, unit_price_cents: i64) -> LineItem {
        LineItem::new(
            line_no,
            ProductId::new(),
            quantity,
            Decimal::new(unit_price_cents, 2),
        )
        .unwrap()
    }

    #[test]
    fn two_lines_at_sixteen_percent() {
        // (qty 2, price 100.00) + (qty 1, price 50.00)
        let lines = vec![line(1, 2, 100_00), line(2, 1, 50_00)];
        let totals = OrderTotals::from_lines(&lines, TaxRate::default()).unwrap();

        assert_eq!(totals.subtotal, Decimal::new(250_00, 2));
        assert_eq!(totals.tax, Decimal::new(40_00, 2));
        assert_eq!(totals.total, Decimal::new(290_00, 2));
    }

    #[test]
    fn empty_line_set_yields_zero_totals() {
        let totals = OrderTotals::from_lines(&[], TaxRate::default()).unwrap();
        assert_eq!(totals, OrderTotals::zero());
    }

    #[test]
    fn tax_rounds_half_up() {
        // subtotal 0.05 * 0.16 = 0.008 -> 0.01
        let lines = vec![line(1, 1, 5)];
        let totals = OrderTotals::from_lines(&lines, TaxRate::default()).unwrap();
        assert_eq!(totals.tax, Decimal::new(1, 2));
        assert_eq!(totals.total, Decimal::new(6, 2));
    }

    #[test]
    fn recompute_is_idempotent() {
        let lines = vec![line(1, 3, 19_99), line(2, 7, 4_25)];
        let a = OrderTotals::from_lines(&lines, TaxRate::default()).unwrap();
        let b = OrderTotals::from_lines(&lines, TaxRate::default()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_rate_of_one_or_more() {
        assert!(TaxRate::new(Decimal::ONE).is_err());
        assert!(TaxRate::new(Decimal::new(-1, 2)).is_err());
        assert!(TaxRate::new(Decimal::new(16, 2)).is_ok());
    }

    proptest! {
        #[test]
        fn totals_invariants_hold_for_any_line_set(
            specs in prop::collection::vec((1i64..=1_000, 0i64..=1_000_000), 0..12)
        ) {
            let lines: Vec<LineItem> = specs
                .iter()
                .enumerate()
                .map(|(i, (qty, cents))| line(i as u32 + 1, *qty, *cents))
                .collect();

            let rate = TaxRate::default();
            let totals = OrderTotals::from_lines(&lines, rate).unwrap();

            let expected_subtotal: Decimal = lines.iter().map(|l| l.subtotal()).sum();
            prop_assert_eq!(totals.subtotal, expected_subtotal);
            prop_assert_eq!(
                totals.tax,
                round_currency(expected_subtotal * rate.as_decimal())
            );
            prop_assert_eq!(totals.total, totals.subtotal + totals.tax);
        }
    }
}
