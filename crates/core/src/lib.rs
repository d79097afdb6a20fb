//! `tapdesk-core` — shared foundation for the ordering client.
//!
//! This crate contains **pure** building blocks (no IO, no HTTP): the
//! client error taxonomy and the price-tier model.

pub mod error;
pub mod pricing;

pub use error::{ClientError, ClientResult};
pub use pricing::PriceTier;
