use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use autoparts_core::{Entity, OrderId};

use crate::totals::OrderTotals;

/// Order fulfillment lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    InTransit,
    Delivered,
    Cancelled,
}

/// A customer order with derived monetary totals.
///
/// The totals fields are owned by the totals aggregator: every line-item
/// mutation rewrites them inside the same transaction, and no other code path
/// touches them. `updated_at` is the business time of the last mutation,
/// threaded in explicitly by each write call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    id: OrderId,
    status: OrderStatus,
    subtotal: Decimal,
    tax: Decimal,
    total: Decimal,
    updated_at: DateTime<Utc>,
}

impl Order {
    /// A freshly placed order: pending, no lines, zero totals.
    pub fn new(id: OrderId, occurred_at: DateTime<Utc>) -> Self {
        Self {
            id,
            status: OrderStatus::Pending,
            subtotal: Decimal::ZERO,
            tax: Decimal::ZERO,
            total: Decimal::ZERO,
            updated_at: occurred_at,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn status(&self) -> OrderStatus {
        self.status
    }

    pub fn subtotal(&self) -> Decimal {
        self.subtotal
    }

    pub fn tax(&self) -> Decimal {
        self.tax
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn totals(&self) -> OrderTotals {
        OrderTotals {
            subtotal: self.subtotal,
            tax: self.tax,
            total: self.total,
        }
    }

    /// Overwrite the derived totals fields. Called only by the aggregator,
    /// inside the row-locked transaction that mutated the line set.
    pub fn apply_totals(&mut self, totals: OrderTotals, occurred_at: DateTime<Utc>) {
        self.subtotal = totals.subtotal;
        self.tax = totals.tax;
        self.total = totals.total;
        self.updated_at = occurred_at;
    }

    /// Advance the fulfillment status (CRUD-layer concern; does not touch
    /// totals).
    pub fn set_status(&mut self, status: OrderStatus, occurred_at: DateTime<Utc>) {
        self.status = status;
        self.updated_at = occurred_at;
    }
}

impl Entity for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_order_is_pending_with_zero_totals() {
        let order = Order::new(OrderId::new(), Utc::now());
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.totals(), OrderTotals::zero());
    }

    #[test]
    fn apply_totals_overwrites_all_three_fields_and_timestamp() {
        let mut order = Order::new(OrderId::new(), Utc::now());
        let at = Utc::now();
        let totals = OrderTotals {
            subtotal: Decimal::new(250_00, 2),
            tax: Decimal::new(40_00, 2),
            total: Decimal::new(290_00, 2),
        };

        order.apply_totals(totals, at);

        assert_eq!(order.subtotal(), Decimal::new(250_00, 2));
        assert_eq!(order.tax(), Decimal::new(40_00, 2));
        assert_eq!(order.total(), Decimal::new(290_00, 2));
        assert_eq!(order.updated_at(), at);
    }

    #[test]
    fn set_status_does_not_touch_totals() {
        let mut order = Order::new(OrderId::new(), Utc::now());
        let totals = OrderTotals {
            subtotal: Decimal::new(10_00, 2),
            tax: Decimal::new(1_60, 2),
            total: Decimal::new(11_60, 2),
        };
        order.apply_totals(totals, Utc::now());

        order.set_status(OrderStatus::Confirmed, Utc::now());

        assert_eq!(order.status(), OrderStatus::Confirmed);
        assert_eq!(order.totals(), totals);
    }

    #[test]
    fn status_serializes_as_kebab_case() {
        let json = serde_json::to_string(&OrderStatus::InTransit).unwrap();
        assert_eq!(json, "\"in-transit\"");
    }
}
