//! Stock status maintenance and alert emission.
//!
//! The monitor classifies a product's stock level on every quantity change
//! and emits one alert exactly when the new classification is critical or
//! depleted. Classification runs inside the quantity-update transaction; the
//! alert is dispatched only after that transaction has committed and the row
//! lock is released, so a slow or failing notification channel can never
//! hold up (or fail) the mutation.

use chrono::{DateTime, Utc};

use autoparts_core::{DomainError, ProductId};
use autoparts_events::{Event, EventBus};
use autoparts_inventory::{StockAlert, StockMovement, StockStatus};

use crate::error::StoreResult;
use crate::stock_ledger::StockLedger;

/// Classifies stock on every quantity change and announces critical states.
#[derive(Debug)]
pub struct StockStatusMonitor<L, B> {
    ledger: L,
    alerts: B,
}

impl<L, B> StockStatusMonitor<L, B>
where
    L: StockLedger,
    B: EventBus<StockAlert>,
{
    pub fn new(ledger: L, alerts: B) -> Self {
        Self { ledger, alerts }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Overwrite a product's on-hand quantity and reclassify it.
    ///
    /// A negative target quantity is rejected with `InvalidQuantity` before
    /// anything is persisted. Returns the post-mutation classification.
    pub fn set_quantity(
        &self,
        product_id: ProductId,
        new_quantity: i64,
        occurred_at: DateTime<Utc>,
    ) -> StoreResult<StockStatus> {
        let (status, alert) = self.ledger.with_record(product_id, |record| {
            record.set_quantity(new_quantity, occurred_at)?;
            Ok((record.status(), StockAlert::for_record(record, occurred_at)))
        })?;

        if let Some(alert) = alert {
            self.dispatch(alert);
        }
        Ok(status)
    }

    /// Apply a stock movement (receipt, fulfillment, adjustment) and
    /// reclassify.
    ///
    /// A fulfillment or downward adjustment that would drive the quantity
    /// negative fails with `InvalidQuantity` and the stored quantity is
    /// unchanged.
    pub fn apply_movement(
        &self,
        product_id: ProductId,
        movement: StockMovement,
        occurred_at: DateTime<Utc>,
    ) -> StoreResult<StockStatus> {
        let delta = movement.delta()?;

        let (status, alert) = self.ledger.with_record(product_id, |record| {
            let new_quantity = record
                .quantity()
                .checked_add(delta)
                .ok_or_else(|| DomainError::arithmetic("stock quantity overflow"))?;
            record.set_quantity(new_quantity, occurred_at)?;
            Ok((record.status(), StockAlert::for_record(record, occurred_at)))
        })?;

        if let Some(alert) = alert {
            self.dispatch(alert);
        }
        Ok(status)
    }

    /// Fire-and-forget alert dispatch, after commit.
    ///
    /// A publish failure is logged and swallowed: notification failure is
    /// never a transaction failure.
    fn dispatch(&self, alert: StockAlert) {
        tracing::warn!(
            product_id = %alert.product_id,
            product = %alert.product_name,
            quantity = alert.quantity,
            minimum = alert.minimum,
            event = alert.event_type(),
            "stock alert"
        );

        if let Err(e) = self.alerts.publish(alert) {
            tracing::warn!(error = ?e, "stock alert dispatch failed");
        }
    }
}
