use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use autoparts_core::ProductId;
use autoparts_events::Event;

use crate::stock::{StockRecord, StockStatus};

/// Notification that a product's stock entered a critical or depleted state.
///
/// Emitted once per qualifying quantity mutation — repeated qualifying writes
/// re-announce independently, with no suppression. Alerts are fire-and-forget
/// and never persisted by the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockAlert {
    pub product_id: ProductId,
    pub product_name: String,
    pub quantity: i64,
    pub minimum: i64,
    pub status: StockStatus,
    pub occurred_at: DateTime<Utc>,
}

impl StockAlert {
    /// Build the alert a record's current state calls for, if any.
    ///
    /// Returns `None` when the record classifies as `Normal` — the only
    /// constructor, so an alert always carries an alertable status.
    pub fn for_record(record: &StockRecord, occurred_at: DateTime<Utc>) -> Option<Self> {
        let status = record.status();
        if !status.is_alertable() {
            return None;
        }

        Some(Self {
            product_id: record.product_id(),
            product_name: record.name().to_string(),
            quantity: record.quantity(),
            minimum: record.minimum(),
            status,
            occurred_at,
        })
    }
}

impl Event for StockAlert {
    fn event_type(&self) -> &'static str {
        match self.status {
            StockStatus::OutOfStock => "inventory.stock.depleted",
            _ => "inventory.stock.critical",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(quantity: i64, minimum: i64) -> StockRecord {
        StockRecord::new(
            ProductId::new(),
            "Iridium Spark Plug",
            quantity,
            minimum,
            None,
            "A2-12",
            Utc::now(),
        )
        .unwrap()
    }

    #[test]
    fn no_alert_for_normal_stock() {
        assert!(StockAlert::for_record(&record(6, 5), Utc::now()).is_none());
    }

    #[test]
    fn critical_stock_yields_critical_alert() {
        let alert = StockAlert::for_record(&record(5, 5), Utc::now()).unwrap();
        assert_eq!(alert.status, StockStatus::Critical);
        assert_eq!(alert.quantity, 5);
        assert_eq!(alert.minimum, 5);
        assert_eq!(alert.event_type(), "inventory.stock.critical");
    }

    #[test]
    fn depleted_stock_yields_depleted_alert() {
        let alert = StockAlert::for_record(&record(0, 5), Utc::now()).unwrap();
        assert_eq!(alert.status, StockStatus::OutOfStock);
        assert_eq!(alert.event_type(), "inventory.stock.depleted");
    }

    #[test]
    fn alert_carries_resolved_product_name() {
        let alert = StockAlert::for_record(&record(0, 5), Utc::now()).unwrap();
        assert_eq!(alert.product_name, "Iridium Spark Plug");
    }
}
