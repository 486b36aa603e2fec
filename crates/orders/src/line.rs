use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use autoparts_core::money::line_subtotal;
use autoparts_core::{DomainError, DomainResult, ProductId, ValueObject};

/// Requested line content, before the store assigns a line number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLine {
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit price at currency precision (2 decimal places).
    pub unit_price: Decimal,
}

/// Order line: product, quantity, unit price, derived subtotal.
///
/// The subtotal is fixed at construction (`quantity * unit_price`, rounded to
/// currency precision) so a stored line can never disagree with its own
/// amounts. Lines are owned by exactly one order and die with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    line_no: u32,
    product_id: ProductId,
    quantity: i64,
    unit_price: Decimal,
    subtotal: Decimal,
}

impl LineItem {
    /// Validate and construct a line.
    ///
    /// Fails with [`DomainError::Validation`] on a non-positive quantity and
    /// [`DomainError::Arithmetic`] on a negative unit price or amount
    /// overflow — both rejected before anything reaches the store.
    pub fn new(
        line_no: u32,
        product_id: ProductId,
        quantity: i64,
        unit_price: Decimal,
    ) -> DomainResult<Self> {
        if quantity <= 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        let subtotal = line_subtotal(quantity, unit_price)?;

        Ok(Self {
            line_no,
            product_id,
            quantity,
            unit_price,
            subtotal,
        })
    }

    pub fn line_no(&self) -> u32 {
        self.line_no
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }
}

impl ValueObject for LineItem {}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product_id() -> ProductId {
        ProductId::new()
    }

    #[test]
    fn subtotal_is_quantity_times_unit_price() {
        let line = LineItem::new(1, test_product_id(), 2, Decimal::new(10000, 2)).unwrap();
        assert_eq!(line.subtotal(), Decimal::new(20000, 2));
    }

    #[test]
    fn rejects_zero_quantity() {
        let err = LineItem::new(1, test_product_id(), 0, Decimal::new(100, 2)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_negative_quantity() {
        let err = LineItem::new(1, test_product_id(), -3, Decimal::new(100, 2)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn rejects_negative_unit_price() {
        let err = LineItem::new(1, test_product_id(), 1, Decimal::new(-100, 2)).unwrap_err();
        assert!(matches!(err, DomainError::Arithmetic(_)));
    }
}
