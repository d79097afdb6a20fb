//! Logging observer: mirrors every bus event into the tracing output.

use std::thread::JoinHandle;

use crate::app_event::AppEvent;
use crate::bus::EventBus;

/// Subscribe a background thread that logs every [`AppEvent`].
///
/// The thread exits when the bus (and with it the channel sender side) is
/// dropped. Failures are log-level only; the observer never affects the
/// flows it watches.
pub fn spawn_logger<B>(bus: &B) -> JoinHandle<()>
where
    B: EventBus<AppEvent>,
{
    let subscription = bus.subscribe();

    std::thread::spawn(move || {
        while let Ok(event) = subscription.recv() {
            log_event(&event);
        }
    })
}

fn log_event(event: &AppEvent) {
    let kind = event.event_type();
    match event {
        AppEvent::LoggedIn { email, tier } => {
            tracing::info!(event = kind, %email, %tier, "user logged in");
        }
        AppEvent::LoggedOut => {
            tracing::info!(event = kind, "user logged out");
        }
        AppEvent::StockRequested { tier } => {
            tracing::info!(event = kind, %tier, "stock requested");
        }
        AppEvent::StockLoaded { tier, item_count } => {
            tracing::info!(event = kind, %tier, item_count, "stock loaded");
        }
        AppEvent::StockFailed { tier, message } => {
            tracing::warn!(event = kind, %tier, error = %message, "stock load failed");
        }
        AppEvent::OrderSubmitted {
            order_id,
            customer_email,
            line_count,
        } => {
            tracing::info!(
                event = kind,
                %order_id,
                %customer_email,
                line_count,
                "order submitted"
            );
        }
    }
}
