use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use autoparts_core::{DomainError, DomainResult, Entity, ProductId};

/// Stock level relative to the configured minimum threshold.
///
/// Derived, never stored: recomputed from the record on every quantity
/// change. No hysteresis — crossing back above the minimum returns directly
/// to `Normal`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    OutOfStock,
    Critical,
    Normal,
}

impl StockStatus {
    /// Whether entering this status warrants an alert.
    pub fn is_alertable(&self) -> bool {
        matches!(self, StockStatus::Critical | StockStatus::OutOfStock)
    }
}

/// Three-way stock classification.
///
/// `OutOfStock` iff `quantity == 0`, `Critical` iff `0 < quantity <= minimum`,
/// `Normal` iff `quantity > minimum`. Quantities are never negative in stored
/// records.
pub fn classify(quantity: i64, minimum: i64) -> StockStatus {
    if quantity == 0 {
        StockStatus::OutOfStock
    } else if quantity <= minimum {
        StockStatus::Critical
    } else {
        StockStatus::Normal
    }
}

/// Tracked on-hand quantity and thresholds for one product (1:1 by product).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    product_id: ProductId,
    name: String,
    quantity: i64,
    minimum: i64,
    maximum: Option<i64>,
    location: String,
    last_movement: DateTime<Utc>,
}

impl StockRecord {
    /// Validate and construct a record.
    pub fn new(
        product_id: ProductId,
        name: impl Into<String>,
        quantity: i64,
        minimum: i64,
        maximum: Option<i64>,
        location: impl Into<String>,
        occurred_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("name cannot be empty"));
        }
        if quantity < 0 {
            return Err(DomainError::invalid_quantity(format!(
                "stock cannot be negative: {quantity}"
            )));
        }
        if minimum < 0 {
            return Err(DomainError::validation("minimum threshold cannot be negative"));
        }
        if let Some(max) = maximum {
            if max < minimum {
                return Err(DomainError::validation(format!(
                    "maximum threshold {max} is below minimum {minimum}"
                )));
            }
        }

        Ok(Self {
            product_id,
            name,
            quantity,
            minimum,
            maximum,
            location: location.into(),
            last_movement: occurred_at,
        })
    }

    pub fn product_id(&self) -> ProductId {
        self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantity(&self) -> i64 {
        self.quantity
    }

    pub fn minimum(&self) -> i64 {
        self.minimum
    }

    pub fn maximum(&self) -> Option<i64> {
        self.maximum
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn last_movement(&self) -> DateTime<Utc> {
        self.last_movement
    }

    /// Current classification against the configured minimum.
    pub fn status(&self) -> StockStatus {
        classify(self.quantity, self.minimum)
    }

    /// Overwrite the on-hand quantity.
    ///
    /// A mutation that would leave the record negative fails with
    /// [`DomainError::InvalidQuantity`] before anything is written; the
    /// record is never left negative.
    pub fn set_quantity(&mut self, quantity: i64, occurred_at: DateTime<Utc>) -> DomainResult<()> {
        if quantity < 0 {
            return Err(DomainError::invalid_quantity(format!(
                "stock cannot go negative: {quantity}"
            )));
        }
        self.quantity = quantity;
        self.last_movement = occurred_at;
        Ok(())
    }
}

impl Entity for StockRecord {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.product_id
    }
}
