//! Event emission & subscription.
//!
//! Derived-state maintainers emit notification events (stock alerts); this
//! crate provides the event contract and the pub/sub channel observers use to
//! receive them.

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
