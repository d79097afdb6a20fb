//! `tapdesk-moysklad` — client for the MoySklad remap 1.2 API.
//!
//! This crate owns every interaction with the ERP:
//! - the authenticated, paginating HTTP gateway,
//! - price resolution against loosely named price-type groups,
//! - reconciliation of the product catalog with the stock report,
//! - the customer-order submission pipeline.
//!
//! Endpoint paths and payload shapes follow the remote contract exactly;
//! they are not this crate's to redesign.

pub mod config;
pub mod dto;
pub mod gateway;
pub mod orders;
pub mod price;
pub mod stock;

pub use config::{ErpConfig, ErpCredentials};
pub use gateway::Gateway;
pub use orders::{OrderLine, OrderRequest, submit_order};
pub use price::resolve_price;
pub use stock::{StockItem, fetch_available_stock, reconcile};
