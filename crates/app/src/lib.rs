//! `tapdesk-app` — application layer over the ERP client.
//!
//! **Responsibility:** wire the MoySklad client, the local order history,
//! and the event bus together behind small controllers the front-end
//! (currently a CLI) drives. State lives in snapshot models; everything
//! interesting is announced on the bus.

pub mod controllers;
pub mod model;
pub mod telemetry;

pub use controllers::{AuthController, ChosenLine, OrderController, StockController};
pub use model::{StockModel, StockState};
