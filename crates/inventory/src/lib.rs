//! Inventory domain: stock records, status classification, movements, alerts.

pub mod alert;
pub mod movement;
pub mod stock;

pub use alert::StockAlert;
pub use movement::StockMovement;
pub use stock::{classify, StockRecord, StockStatus};
