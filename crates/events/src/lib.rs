//! Domain events and the in-process notice bus.
//!
//! Aggregates return events from `handle`; the dashboard fans selected ones
//! out to presentation-layer subscribers through an [`EventBus`].

pub mod bus;
pub mod event;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use event::Event;
pub use in_memory_bus::{BusError, InMemoryEventBus};
