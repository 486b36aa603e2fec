//! Stock ledger: one record per product, row-locked quantity mutations.
//!
//! The record is the unit of serialization: the negativity check and the
//! status classification always see the value they are about to commit.
//! Unrelated products proceed in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use autoparts_core::{DomainError, DomainResult, ProductId};
use autoparts_inventory::StockRecord;

use crate::error::{StoreError, StoreResult};

/// Durable mapping from product to current stock quantity and thresholds.
///
/// `with_record` is the transaction boundary: the closure runs against a
/// scratch copy under the row lock and is written back only on `Ok`.
pub trait StockLedger: Send + Sync {
    /// Register a product's stock record. One record per product.
    fn insert(&self, record: StockRecord) -> StoreResult<()>;

    /// Read one stock record.
    fn get(&self, product_id: ProductId) -> StoreResult<Option<StockRecord>>;

    /// Row-locked read-modify-write over one record.
    ///
    /// Fails with [`DomainError::NotFound`] when no record exists for the
    /// product; any error from the closure rolls the record back untouched.
    fn with_record<T>(
        &self,
        product_id: ProductId,
        f: impl FnOnce(&mut StockRecord) -> DomainResult<T>,
    ) -> StoreResult<T>;

    /// Records at or below their minimum threshold, most depleted first
    /// (ties broken by product name).
    fn list_below_minimum(&self) -> StoreResult<Vec<StockRecord>>;
}

impl<L> StockLedger for Arc<L>
where
    L: StockLedger + ?Sized,
{
    fn insert(&self, record: StockRecord) -> StoreResult<()> {
        (**self).insert(record)
    }

    fn get(&self, product_id: ProductId) -> StoreResult<Option<StockRecord>> {
        (**self).get(product_id)
    }

    fn with_record<T>(
        &self,
        product_id: ProductId,
        f: impl FnOnce(&mut StockRecord) -> DomainResult<T>,
    ) -> StoreResult<T> {
        (**self).with_record(product_id, f)
    }

    fn list_below_minimum(&self) -> StoreResult<Vec<StockRecord>> {
        (**self).list_below_minimum()
    }
}

/// In-memory stock ledger for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStockLedger {
    records: RwLock<HashMap<ProductId, Arc<Mutex<StockRecord>>>>,
}

impl InMemoryStockLedger {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&self, product_id: ProductId) -> StoreResult<Option<Arc<Mutex<StockRecord>>>> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::unavailable("ledger map lock poisoned"))?;
        Ok(records.get(&product_id).cloned())
    }
}

impl StockLedger for InMemoryStockLedger {
    fn insert(&self, record: StockRecord) -> StoreResult<()> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::unavailable("ledger map lock poisoned"))?;

        let product_id = record.product_id();
        if records.contains_key(&product_id) {
            return Err(DomainError::conflict(format!(
                "stock record for {product_id} already exists"
            ))
            .into());
        }

        records.insert(product_id, Arc::new(Mutex::new(record)));
        Ok(())
    }

    fn get(&self, product_id: ProductId) -> StoreResult<Option<StockRecord>> {
        match self.record(product_id)? {
            None => Ok(None),
            Some(rec) => {
                let rec = rec
                    .lock()
                    .map_err(|_| StoreError::unavailable("stock row lock poisoned"))?;
                Ok(Some(rec.clone()))
            }
        }
    }

    fn with_record<T>(
        &self,
        product_id: ProductId,
        f: impl FnOnce(&mut StockRecord) -> DomainResult<T>,
    ) -> StoreResult<T> {
        let rec = self
            .record(product_id)?
            .ok_or_else(|| StoreError::from(DomainError::not_found()))?;

        let mut rec = rec
            .lock()
            .map_err(|_| StoreError::unavailable("stock row lock poisoned"))?;

        // Scratch copy: commit on Ok, discard on Err.
        let mut scratch = rec.clone();
        let value = f(&mut scratch)?;
        *rec = scratch;
        Ok(value)
    }

    fn list_below_minimum(&self) -> StoreResult<Vec<StockRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::unavailable("ledger map lock poisoned"))?;

        let mut critical = Vec::new();
        for rec in records.values() {
            let rec = rec
                .lock()
                .map_err(|_| StoreError::unavailable("stock row lock poisoned"))?;
            if rec.quantity() <= rec.minimum() {
                critical.push(rec.clone());
            }
        }

        critical.sort_by(|a, b| {
            a.quantity()
                .cmp(&b.quantity())
                .then_with(|| a.name().cmp(b.name()))
        });

        Ok(critical)
    }
}
