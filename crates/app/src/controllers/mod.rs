//! Controllers: the imperative edge the front-end calls into.
//!
//! Each controller owns one flow, updates its model, and announces the
//! outcome on the event bus. Publishing is best-effort — a full or broken
//! bus never fails the underlying operation.

pub mod auth;
pub mod order;
pub mod stock;

pub use auth::AuthController;
pub use order::{ChosenLine, OrderController};
pub use stock::StockController;

use tapdesk_events::{AppEvent, EventBus};

/// Publish without letting observer plumbing break the flow.
pub(crate) fn emit<B: EventBus<AppEvent>>(bus: &B, event: AppEvent) {
    if let Err(err) = bus.publish(event) {
        tracing::warn!(error = ?err, "failed to publish app event");
    }
}
