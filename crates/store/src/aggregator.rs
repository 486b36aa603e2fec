//! Order totals maintenance (application-level orchestration).
//!
//! The aggregator keeps an order's `subtotal`/`tax`/`total` equal to the
//! aggregate of its current line items. Every line-item mutation goes through
//! one of the methods below, which perform the mutation **and** the totals
//! recompute inside the same row-locked transaction — recompute is never
//! skipped, and two concurrent mutations against one order cannot both read
//! a stale line set.
//!
//! `recompute` itself is idempotent and safe to call redundantly; it always
//! rebuilds the totals from the full current line set rather than applying
//! increments, so the result is definitionally correct and never drifts.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use autoparts_core::OrderId;
use autoparts_orders::{LineItem, NewLine, OrderTotals, TaxRate};

use crate::error::StoreResult;
use crate::order_store::OrderStore;

/// Recomputes an order's monetary totals whenever its line set changes.
#[derive(Debug)]
pub struct OrderTotalAggregator<S> {
    store: S,
    tax_rate: TaxRate,
}

impl<S> OrderTotalAggregator<S>
where
    S: OrderStore,
{
    pub fn new(store: S, tax_rate: TaxRate) -> Self {
        Self { store, tax_rate }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Rebuild an order's totals from its full current line set.
    ///
    /// Zero lines is a valid terminal state and yields all-zero totals.
    /// Fails with `NotFound` when the order does not exist.
    pub fn recompute(
        &self,
        order_id: OrderId,
        occurred_at: DateTime<Utc>,
    ) -> StoreResult<OrderTotals> {
        let totals = self.store.with_order(order_id, |row| {
            let totals = OrderTotals::from_lines(&row.lines, self.tax_rate)?;
            row.order.apply_totals(totals, occurred_at);
            Ok(totals)
        })?;

        tracing::debug!(order_id = %order_id, total = %totals.total, "order totals recomputed");
        Ok(totals)
    }

    /// Add a line to an order and refresh its totals, atomically.
    ///
    /// The store assigns the line number. Line validation (positive quantity,
    /// non-negative price) runs before anything is written; a failed line
    /// leaves the order untouched.
    pub fn insert_line(
        &self,
        order_id: OrderId,
        line: NewLine,
        occurred_at: DateTime<Utc>,
    ) -> StoreResult<LineItem> {
        self.store.with_order(order_id, |row| {
            let item = LineItem::new(
                row.next_line_no(),
                line.product_id,
                line.quantity,
                line.unit_price,
            )?;
            row.lines.push(item.clone());

            let totals = OrderTotals::from_lines(&row.lines, self.tax_rate)?;
            row.order.apply_totals(totals, occurred_at);
            Ok(item)
        })
    }

    /// Change a line's quantity and/or unit price and refresh the order's
    /// totals, atomically. The line keeps its number and product.
    pub fn update_line(
        &self,
        order_id: OrderId,
        line_no: u32,
        quantity: i64,
        unit_price: Decimal,
        occurred_at: DateTime<Utc>,
    ) -> StoreResult<LineItem> {
        self.store.with_order(order_id, |row| {
            let existing = row
                .find_line(line_no)
                .ok_or_else(autoparts_core::DomainError::not_found)?;

            let item = LineItem::new(line_no, existing.product_id(), quantity, unit_price)?;
            row.replace_line(item.clone())?;

            let totals = OrderTotals::from_lines(&row.lines, self.tax_rate)?;
            row.order.apply_totals(totals, occurred_at);
            Ok(item)
        })
    }

    /// Delete a line and refresh the order's totals, atomically.
    ///
    /// Removing the last line drives the totals to zero rather than leaving
    /// stale nonzero values.
    pub fn remove_line(
        &self,
        order_id: OrderId,
        line_no: u32,
        occurred_at: DateTime<Utc>,
    ) -> StoreResult<OrderTotals> {
        self.store.with_order(order_id, |row| {
            row.take_line(line_no)?;

            let totals = OrderTotals::from_lines(&row.lines, self.tax_rate)?;
            row.order.apply_totals(totals, occurred_at);
            Ok(totals)
        })
    }
}
