//! Event publishing/subscription abstraction (mechanics only).
//!
//! This module provides the **event bus pattern** - a pub/sub mechanism for
//! distributing notification events (stock alerts) to external observers
//! (logging, telemetry, alerting channels).
//!
//! ## Design Philosophy
//!
//! The event bus is intentionally **lightweight** and makes minimal assumptions:
//!
//! - **Transport-agnostic**: Works with in-memory channels, message queues, etc.
//! - **Fire-and-forget**: Publication happens after the triggering transaction
//!   has committed; a publish failure must never fail that transaction
//! - **No ordering guarantees**: Events may arrive out of order (unless the
//!   implementation provides ordering)
//! - **No persistence**: The bus distributes; it does not store. A missed
//!   alert is re-announced by the next qualifying mutation, not replayed

use std::sync::Arc;
use std::sync::mpsc::Receiver;
use std::time::Duration;

/// A subscription to an event stream.
///
/// Each subscription gets a copy of all events published to the bus
/// (broadcast semantics).
///
/// ## Usage Pattern
///
/// ```ignore
/// let bus: Arc<dyn EventBus<StockAlert>> = ...;
/// let subscription = bus.subscribe();
///
/// loop {
///     match subscription.recv_timeout(Duration::from_secs(1)) {
///         Ok(alert) => notify(alert)?,
///         Err(std::sync::mpsc::RecvTimeoutError::Timeout) => continue,  // Check for shutdown
///         Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,  // Bus closed
///     }
/// }
/// ```
///
/// ## Thread Safety
///
/// Subscriptions are designed for single-threaded consumption. Each
/// subscription should be used by one thread (or use a mutex/channel to
/// distribute events to multiple threads).
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Block until the next message is available.
    pub fn recv(&self) -> Result<M, std::sync::mpsc::RecvError> {
        self.receiver.recv()
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, std::sync::mpsc::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Block for up to `timeout` waiting for a message.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<M, std::sync::mpsc::RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// The bus sits between the derived-state maintainers and their observers:
///
/// ```text
/// Quantity mutation → StockLedger (commit) → Event Bus (publish) → Observers
///                                                                      ├─ Logging
///                                                                      ├─ Telemetry
///                                                                      └─ Alerting channel
/// ```
///
/// Events are published **after commit**, outside the row lock, so a slow or
/// failing observer channel can never hold up the triggering transaction.
///
/// ## Error Handling
///
/// `publish()` can fail (e.g. bus is full, channel closed). Failures surface
/// to the caller (the maintainer), which logs and swallows them — notification
/// failure is never a transaction failure.
///
/// ## Thread Safety
///
/// The trait requires `Send + Sync`; multiple threads may publish concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
