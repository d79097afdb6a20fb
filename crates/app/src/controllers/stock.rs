//! Stock loading flow.

use std::sync::Arc;

use tapdesk_core::{ClientResult, PriceTier};
use tapdesk_events::{AppEvent, EventBus};
use tapdesk_moysklad::{Gateway, StockItem, fetch_available_stock};

use super::emit;
use crate::model::StockModel;

pub struct StockController<B> {
    gateway: Arc<Gateway>,
    model: Arc<StockModel>,
    bus: Arc<B>,
}

impl<B: EventBus<AppEvent>> StockController<B> {
    pub fn new(gateway: Arc<Gateway>, model: Arc<StockModel>, bus: Arc<B>) -> Self {
        Self {
            gateway,
            model,
            bus,
        }
    }

    pub fn model(&self) -> &StockModel {
        &self.model
    }

    /// Load sellable stock for `tier`, refetching everything remote.
    pub async fn load(&self, tier: PriceTier) -> ClientResult<Vec<StockItem>> {
        self.model.set_loading(tier);
        emit(&*self.bus, AppEvent::StockRequested { tier });

        match fetch_available_stock(&self.gateway, tier).await {
            Ok(items) => {
                self.model.set_data(tier, items.clone());
                emit(
                    &*self.bus,
                    AppEvent::StockLoaded {
                        tier,
                        item_count: items.len(),
                    },
                );
                Ok(items)
            }
            Err(err) => {
                let message = err.to_string();
                self.model.set_error(tier, message.clone());
                emit(&*self.bus, AppEvent::StockFailed { tier, message });
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;
    use tapdesk_core::ClientError;
    use tapdesk_events::InMemoryEventBus;
    use tapdesk_moysklad::{ErpConfig, ErpCredentials};

    fn controller(server: &MockServer) -> StockController<InMemoryEventBus<AppEvent>> {
        let config = ErpConfig::new(server.base_url(), ErpCredentials::Token("test-token".into()));
        StockController::new(
            Arc::new(Gateway::new(config).unwrap()),
            Arc::new(StockModel::new()),
            Arc::new(InMemoryEventBus::new()),
        )
    }

    fn mock_catalog(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/entity/product");
            then.status(200).json_body(json!({ "rows": [{
                "id": "p1",
                "name": "Jaws Lager",
                "salePrices": [{ "priceType": { "name": "Прайс основной" }, "value": 150000 }]
            }] }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/report/stock/all");
            then.status(200).json_body(json!({ "rows": [{
                "stock": 20,
                "reserve": 5,
                "assortment": { "meta": {
                    "href": format!("{}/entity/product/p1", server.base_url()),
                    "type": "product"
                } }
            }] }));
        });
    }

    #[tokio::test]
    async fn successful_load_updates_model_and_emits_requested_then_loaded() {
        let server = MockServer::start_async().await;
        mock_catalog(&server);
        let controller = controller(&server);
        let events = controller.bus.subscribe();

        let items = controller.load(PriceTier::Basic).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].available, 15.0);
        assert_eq!(items[0].price, 1500.0);

        let state = controller.model().snapshot();
        assert!(!state.loading);
        assert_eq!(state.items, items);
        assert_eq!(state.error, None);

        assert!(matches!(
            events.try_recv().unwrap(),
            AppEvent::StockRequested { tier: PriceTier::Basic }
        ));
        assert!(matches!(
            events.try_recv().unwrap(),
            AppEvent::StockLoaded { item_count: 1, .. }
        ));
    }

    #[tokio::test]
    async fn failed_load_records_the_error_and_emits_stock_failed() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/entity/product");
            then.status(429);
        });
        let controller = controller(&server);
        let events = controller.bus.subscribe();

        let err = controller.load(PriceTier::Level1).await.unwrap_err();
        assert!(matches!(err, ClientError::RateLimited(_)));

        let state = controller.model().snapshot();
        assert!(!state.loading);
        assert_eq!(state.error.as_deref(), Some(err.to_string().as_str()));

        assert!(matches!(
            events.try_recv().unwrap(),
            AppEvent::StockRequested { .. }
        ));
        assert!(matches!(
            events.try_recv().unwrap(),
            AppEvent::StockFailed { .. }
        ));
    }
}
