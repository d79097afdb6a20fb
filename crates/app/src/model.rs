//! Stock view state.

use std::sync::Mutex;

use tapdesk_core::PriceTier;
use tapdesk_moysklad::StockItem;

/// Immutable snapshot of the stock view.
#[derive(Debug, Clone, PartialEq)]
pub struct StockState {
    pub items: Vec<StockItem>,
    pub loading: bool,
    pub error: Option<String>,
    pub tier: PriceTier,
}

impl Default for StockState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            tier: PriceTier::Basic,
        }
    }
}

/// Holds the current [`StockState`]; observers read snapshots, the stock
/// controller drives the transitions.
#[derive(Debug, Default)]
pub struct StockModel {
    state: Mutex<StockState>,
}

impl StockModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StockState {
        self.lock().clone()
    }

    pub fn set_loading(&self, tier: PriceTier) {
        let mut state = self.lock();
        state.loading = true;
        state.error = None;
        state.tier = tier;
    }

    pub fn set_data(&self, tier: PriceTier, items: Vec<StockItem>) {
        let mut state = self.lock();
        *state = StockState {
            items,
            loading: false,
            error: None,
            tier,
        };
    }

    pub fn set_error(&self, tier: PriceTier, message: String) {
        let mut state = self.lock();
        state.loading = false;
        state.error = Some(message);
        state.tier = tier;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StockState> {
        // A poisoned lock only means a panicking writer; the snapshot data
        // itself is still usable.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
