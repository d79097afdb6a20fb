//! `tapdesk-events` — application event bus.
//!
//! A lightweight pub/sub layer: controllers publish [`AppEvent`]s, observers
//! subscribe and react (the bundled one just logs). Delivery is best-effort
//! fan-out with no persistence; subscribers must tolerate missing events.

pub mod app_event;
pub mod bus;
pub mod in_memory_bus;
pub mod logger;

pub use app_event::AppEvent;
pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
pub use logger::spawn_logger;
