//! Order record store: orders plus their owned line items.
//!
//! The order row (record + line set) is the unit of locking: a mutation and
//! the totals recompute it triggers execute under one row lock, so two
//! concurrent mutations against the same order can never both read a stale
//! line set. Unrelated orders proceed fully in parallel.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use serde::{Deserialize, Serialize};

use autoparts_core::{DomainError, DomainResult, OrderId};
use autoparts_orders::{LineItem, Order};

use crate::error::{StoreError, StoreResult};

/// One order row: the order record and the line items it owns.
///
/// Lines are exclusively owned by their order and are removed with it
/// (cascade); a line cannot outlive its order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderRow {
    pub order: Order,
    pub lines: Vec<LineItem>,
}

impl OrderRow {
    pub fn new(order: Order) -> Self {
        Self {
            order,
            lines: Vec::new(),
        }
    }

    /// Next free line number (line numbers are never reused within an order).
    pub fn next_line_no(&self) -> u32 {
        self.lines.iter().map(LineItem::line_no).max().unwrap_or(0) + 1
    }

    pub fn find_line(&self, line_no: u32) -> Option<&LineItem> {
        self.lines.iter().find(|l| l.line_no() == line_no)
    }

    /// Remove one line by number.
    pub fn take_line(&mut self, line_no: u32) -> DomainResult<LineItem> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.line_no() == line_no)
            .ok_or_else(DomainError::not_found)?;
        Ok(self.lines.remove(idx))
    }

    /// Replace one line by number.
    pub fn replace_line(&mut self, line: LineItem) -> DomainResult<()> {
        let idx = self
            .lines
            .iter()
            .position(|l| l.line_no() == line.line_no())
            .ok_or_else(DomainError::not_found)?;
        self.lines[idx] = line;
        Ok(())
    }
}

/// Order + line-item store.
///
/// `with_order` is the transaction boundary: the closure runs against a
/// scratch copy of the row under the row lock, and the copy is written back
/// only when it returns `Ok` — either the whole mutation commits or none of
/// it does.
pub trait OrderStore: Send + Sync {
    /// Insert a newly placed order (no lines yet).
    fn insert(&self, order: Order) -> StoreResult<()>;

    /// Read one order record.
    fn get(&self, order_id: OrderId) -> StoreResult<Option<Order>>;

    /// Read the full current line set for an order.
    fn list_lines(&self, order_id: OrderId) -> StoreResult<Vec<LineItem>>;

    /// Delete an order and, with it, every line it owns.
    fn remove(&self, order_id: OrderId) -> StoreResult<()>;

    /// Row-locked read-modify-write over one order.
    ///
    /// Fails with [`DomainError::NotFound`] when the order does not exist
    /// (e.g. deleted concurrently); any error from the closure rolls the row
    /// back untouched.
    fn with_order<T>(
        &self,
        order_id: OrderId,
        f: impl FnOnce(&mut OrderRow) -> DomainResult<T>,
    ) -> StoreResult<T>;
}

impl<S> OrderStore for Arc<S>
where
    S: OrderStore + ?Sized,
{
    fn insert(&self, order: Order) -> StoreResult<()> {
        (**self).insert(order)
    }

    fn get(&self, order_id: OrderId) -> StoreResult<Option<Order>> {
        (**self).get(order_id)
    }

    fn list_lines(&self, order_id: OrderId) -> StoreResult<Vec<LineItem>> {
        (**self).list_lines(order_id)
    }

    fn remove(&self, order_id: OrderId) -> StoreResult<()> {
        (**self).remove(order_id)
    }

    fn with_order<T>(
        &self,
        order_id: OrderId,
        f: impl FnOnce(&mut OrderRow) -> DomainResult<T>,
    ) -> StoreResult<T> {
        (**self).with_order(order_id, f)
    }
}

/// In-memory order store.
///
/// Intended for tests/dev. Row locks are per-order `Mutex`es; the row map
/// itself is only locked long enough to resolve the row handle.
#[derive(Debug, Default)]
pub struct InMemoryOrderStore {
    rows: RwLock<HashMap<OrderId, Arc<Mutex<OrderRow>>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn row(&self, order_id: OrderId) -> StoreResult<Option<Arc<Mutex<OrderRow>>>> {
        let rows = self
            .rows
            .read()
            .map_err(|_| StoreError::unavailable("order map lock poisoned"))?;
        Ok(rows.get(&order_id).cloned())
    }
}

impl OrderStore for InMemoryOrderStore {
    fn insert(&self, order: Order) -> StoreResult<()> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::unavailable("order map lock poisoned"))?;

        let order_id = order.id_typed();
        if rows.contains_key(&order_id) {
            return Err(DomainError::conflict(format!("order {order_id} already exists")).into());
        }

        rows.insert(order_id, Arc::new(Mutex::new(OrderRow::new(order))));
        Ok(())
    }

    fn get(&self, order_id: OrderId) -> StoreResult<Option<Order>> {
        match self.row(order_id)? {
            None => Ok(None),
            Some(row) => {
                let row = row
                    .lock()
                    .map_err(|_| StoreError::unavailable("order row lock poisoned"))?;
                Ok(Some(row.order.clone()))
            }
        }
    }

    fn list_lines(&self, order_id: OrderId) -> StoreResult<Vec<LineItem>> {
        match self.row(order_id)? {
            None => Err(DomainError::not_found().into()),
            Some(row) => {
                let row = row
                    .lock()
                    .map_err(|_| StoreError::unavailable("order row lock poisoned"))?;
                Ok(row.lines.clone())
            }
        }
    }

    fn remove(&self, order_id: OrderId) -> StoreResult<()> {
        let mut rows = self
            .rows
            .write()
            .map_err(|_| StoreError::unavailable("order map lock poisoned"))?;

        // Cascade: the row owns its lines, so they go with it.
        match rows.remove(&order_id) {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found().into()),
        }
    }

    fn with_order<T>(
        &self,
        order_id: OrderId,
        f: impl FnOnce(&mut OrderRow) -> DomainResult<T>,
    ) -> StoreResult<T> {
        let row = self
            .row(order_id)?
            .ok_or_else(|| StoreError::from(DomainError::not_found()))?;

        let mut row = row
            .lock()
            .map_err(|_| StoreError::unavailable("order row lock poisoned"))?;

        // Scratch copy: commit on Ok, discard on Err.
        let mut scratch = row.clone();
        let value = f(&mut scratch)?;
        *row = scratch;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn new_order() -> Order {
        Order::new(OrderId::new(), Utc::now())
    }

    fn line(line_no: u32) -> LineItem {
        LineItem::new(
            line_no,
            autoparts_core::ProductId::new(),
            1,
            Decimal::new(10_00, 2),
        )
        .unwrap()
    }

    #[test]
    fn insert_then_get_round_trips() {
        let store = InMemoryOrderStore::new();
        let order = new_order();
        let order_id = order.id_typed();

        store.insert(order.clone()).unwrap();
        assert_eq!(store.get(order_id).unwrap(), Some(order));
    }

    #[test]
    fn double_insert_is_a_conflict() {
        let store = InMemoryOrderStore::new();
        let order = new_order();

        store.insert(order.clone()).unwrap();
        let err = store.insert(order).unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::Conflict(_))));
    }

    #[test]
    fn with_order_commits_on_ok() {
        let store = InMemoryOrderStore::new();
        let order = new_order();
        let order_id = order.id_typed();
        store.insert(order).unwrap();

        store
            .with_order(order_id, |row| {
                row.lines.push(line(row.next_line_no()));
                Ok(())
            })
            .unwrap();

        assert_eq!(store.list_lines(order_id).unwrap().len(), 1);
    }

    #[test]
    fn with_order_rolls_back_on_error() {
        let store = InMemoryOrderStore::new();
        let order = new_order();
        let order_id = order.id_typed();
        store.insert(order).unwrap();

        let result: StoreResult<()> = store.with_order(order_id, |row| {
            row.lines.push(line(1));
            Err(DomainError::invariant("forced failure"))
        });

        assert!(result.is_err());
        assert!(store.list_lines(order_id).unwrap().is_empty());
    }

    #[test]
    fn with_order_on_missing_order_is_not_found() {
        let store = InMemoryOrderStore::new();
        let err = store
            .with_order(OrderId::new(), |_row| Ok(()))
            .unwrap_err();
        assert!(matches!(err, StoreError::Domain(DomainError::NotFound)));
    }

    #[test]
    fn remove_cascades_lines_away() {
        let store = InMemoryOrderStore::new();
        let order = new_order();
        let order_id = order.id_typed();
        store.insert(order).unwrap();
        store
            .with_order(order_id, |row| {
                row.lines.push(line(1));
                Ok(())
            })
            .unwrap();

        store.remove(order_id).unwrap();
        assert!(store.get(order_id).unwrap().is_none());
        assert!(matches!(
            store.list_lines(order_id).unwrap_err(),
            StoreError::Domain(DomainError::NotFound)
        ));
    }

    #[test]
    fn line_numbers_are_never_reused() {
        let mut row = OrderRow::new(new_order());
        row.lines.push(line(1));
        row.lines.push(line(2));
        row.take_line(1).unwrap();
        assert_eq!(row.next_line_no(), 3);
    }
}
