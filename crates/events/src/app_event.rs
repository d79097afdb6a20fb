//! Application events published by the controllers.

use serde::{Deserialize, Serialize};

use tapdesk_core::PriceTier;

/// Everything the application announces on the bus.
///
/// Payloads are flat value snapshots so events can be cloned to every
/// subscriber and serialized for logs without touching live state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AppEvent {
    LoggedIn {
        email: String,
        tier: PriceTier,
    },
    LoggedOut,
    StockRequested {
        tier: PriceTier,
    },
    StockLoaded {
        tier: PriceTier,
        item_count: usize,
    },
    StockFailed {
        tier: PriceTier,
        message: String,
    },
    OrderSubmitted {
        order_id: String,
        customer_email: String,
        line_count: usize,
    },
}

impl AppEvent {
    /// Stable event name, used as the logging tag.
    pub fn event_type(&self) -> &'static str {
        match self {
            AppEvent::LoggedIn { .. } => "auth:login",
            AppEvent::LoggedOut => "auth:logout",
            AppEvent::StockRequested { .. } => "stock:requested",
            AppEvent::StockLoaded { .. } => "stock:loaded",
            AppEvent::StockFailed { .. } => "stock:failed",
            AppEvent::OrderSubmitted { .. } => "order:submitted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_types_are_stable() {
        let cases = [
            (
                AppEvent::LoggedIn {
                    email: "smallbar@beer.ru".into(),
                    tier: PriceTier::Basic,
                },
                "auth:login",
            ),
            (AppEvent::LoggedOut, "auth:logout"),
            (
                AppEvent::StockRequested {
                    tier: PriceTier::Basic,
                },
                "stock:requested",
            ),
            (
                AppEvent::StockLoaded {
                    tier: PriceTier::Level1,
                    item_count: 3,
                },
                "stock:loaded",
            ),
            (
                AppEvent::StockFailed {
                    tier: PriceTier::Basic,
                    message: "boom".into(),
                },
                "stock:failed",
            ),
            (
                AppEvent::OrderSubmitted {
                    order_id: "o1".into(),
                    customer_email: "smallbar@beer.ru".into(),
                    line_count: 2,
                },
                "order:submitted",
            ),
        ];

        for (event, expected) in cases {
            assert_eq!(event.event_type(), expected);
        }
    }
}
