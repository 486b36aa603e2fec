use serde::{Deserialize, Serialize};

use autoparts_core::{DomainError, DomainResult};

/// An inventory movement, resolved to a signed quantity delta.
///
/// Stock quantities change only through movements (or an explicit quantity
/// overwrite); they are never computed from other records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "quantity")]
pub enum StockMovement {
    /// Goods received from a supplier; adds to stock.
    Receipt(i64),
    /// A sale being fulfilled; subtracts from stock.
    Fulfillment(i64),
    /// Manual correction; signed.
    Adjustment(i64),
}

impl StockMovement {
    /// The signed delta this movement applies to the on-hand quantity.
    ///
    /// Receipts and fulfillments must carry a positive quantity; adjustments
    /// must be nonzero.
    pub fn delta(&self) -> DomainResult<i64> {
        match *self {
            StockMovement::Receipt(qty) => {
                if qty <= 0 {
                    return Err(DomainError::validation("receipt quantity must be positive"));
                }
                Ok(qty)
            }
            StockMovement::Fulfillment(qty) => {
                if qty <= 0 {
                    return Err(DomainError::validation(
                        "fulfillment quantity must be positive",
                    ));
                }
                Ok(-qty)
            }
            StockMovement::Adjustment(delta) => {
                if delta == 0 {
                    return Err(DomainError::validation("adjustment delta cannot be zero"));
                }
                Ok(delta)
            }
        }
    }
}
