//! Storage layer: record stores with row-level locking, plus the two
//! derived-state maintainers that run inside their transactions.
//!
//! The database-trigger dispatch of the original schema is explicit here:
//! every mutating write path performs the store write **and** the maintainer
//! call as one row-locked unit. Callers never write totals or classify stock
//! themselves.

pub mod aggregator;
pub mod error;
pub mod monitor;
pub mod order_store;
pub mod stock_ledger;


pub use aggregator::OrderTotalAggregator;
pub use error::{StoreError, StoreResult};
pub use monitor::StockStatusMonitor;
pub use order_store::{InMemoryOrderStore, OrderRow, OrderStore};
pub use stock_ledger::{InMemoryStockLedger, StockLedger};
