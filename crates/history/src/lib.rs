//! `tapdesk-history` — local order history.
//!
//! Submitted orders are remembered on this machine only, keyed by the
//! customer email. The ERP stays the source of truth for the orders
//! themselves; this is display history, nothing more.

pub mod store;

pub use store::{OrderHistory, OrderLineSnapshot, SavedOrder};
