//! Order submission flow.

use std::sync::Arc;

use anyhow::Context;

use tapdesk_auth::normalize_email;
use tapdesk_events::{AppEvent, EventBus};
use tapdesk_history::{OrderHistory, OrderLineSnapshot, SavedOrder};
use tapdesk_moysklad::{Gateway, OrderLine, OrderRequest, StockItem, submit_order};

use super::emit;

/// A stock item the user put in the basket, with the chosen quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct ChosenLine {
    pub item: StockItem,
    pub quantity: u32,
}

pub struct OrderController<B> {
    gateway: Arc<Gateway>,
    history: Arc<OrderHistory>,
    bus: Arc<B>,
}

impl<B: EventBus<AppEvent>> OrderController<B> {
    pub fn new(gateway: Arc<Gateway>, history: Arc<OrderHistory>, bus: Arc<B>) -> Self {
        Self {
            gateway,
            history,
            bus,
        }
    }

    /// Submit the basket as a customer order, then remember it locally.
    pub async fn submit(
        &self,
        customer_email: &str,
        comment: Option<&str>,
        lines: &[ChosenLine],
    ) -> anyhow::Result<SavedOrder> {
        let customer_email = normalize_email(customer_email);
        let request = OrderRequest {
            customer_email: customer_email.clone(),
            comment: comment
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
            lines: lines
                .iter()
                .map(|chosen| OrderLine {
                    product_id: chosen.item.id.clone(),
                    quantity: chosen.quantity,
                })
                .collect(),
        };

        let created = submit_order(&self.gateway, &request).await?;

        let snapshots: Vec<OrderLineSnapshot> = lines
            .iter()
            .map(|chosen| OrderLineSnapshot {
                product_id: chosen.item.id.clone(),
                name: chosen.item.name.clone(),
                quantity: chosen.quantity,
            })
            .collect();
        let saved = self
            .history
            .add(&customer_email, request.comment.as_deref(), &snapshots)
            .await
            .context("order was submitted but could not be saved to local history")?;

        emit(
            &*self.bus,
            AppEvent::OrderSubmitted {
                order_id: created.id,
                customer_email,
                line_count: request.lines.len(),
            },
        );
        Ok(saved)
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
    use uuid::Uuid;

    fn controller(server: &MockServer) -> OrderController<InMemoryEventBus<AppEvent>> {
        let config = ErpConfig::new(server.base_url(), ErpCredentials::Token("test-token".into()));
        let db_path = std::env::temp_dir().join(format!("tapdesk-orders-{}.db", Uuid::now_v7()));
        OrderController::new(
            Arc::new(Gateway::new(config).unwrap()),
            Arc::new(OrderHistory::new(db_path)),
            Arc::new(InMemoryEventBus::new()),
        )
    }

    fn chosen(id: &str, quantity: u32) -> ChosenLine {
        ChosenLine {
            item: StockItem {
                id: id.into(),
                name: format!("Jaws {id}"),
                article: String::new(),
                available: 10.0,
                price: 50.0,
            },
            quantity,
        }
    }

    fn mock_submission_path(server: &MockServer) {
        server.mock(|when, then| {
            when.method(GET).path("/entity/organization");
            then.status(200).json_body(json!({ "rows": [{ "id": "org1" }] }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/entity/counterparty");
            then.status(200).json_body(json!({ "rows": [{ "id": "cp1" }] }));
        });
        server.mock(|when, then| {
            when.method(GET).path("/entity/product/p1");
            then.status(200).json_body(json!({
                "id": "p1",
                "name": "Jaws p1",
                "salePrices": [{ "priceType": { "name": "Прайс основной" }, "value": 5000 }]
            }));
        });
        server.mock(|when, then| {
            when.method(POST).path("/entity/customerorder");
            then.status(200).json_body(json!({ "id": "o1", "name": "Заказ 00001" }));
        });
    }

    #[tokio::test]
    async fn submit_saves_history_and_emits_order_submitted() {
        let server = MockServer::start_async().await;
        mock_submission_path(&server);
        let controller = controller(&server);
        let events = controller.bus.subscribe();

        let saved = controller
            .submit(" SmallBar@Beer.RU ", Some("  до пятницы  "), &[chosen("p1", 2)])
            .await
            .unwrap();

        assert_eq!(saved.customer_email, "smallbar@beer.ru");
        assert_eq!(saved.comment.as_deref(), Some("до пятницы"));
        assert_eq!(saved.lines.len(), 1);
        assert_eq!(saved.lines[0].quantity, 2);

        let listed = controller.history.list("smallbar@beer.ru").await.unwrap();
        assert_eq!(listed, vec![saved]);

        match events.try_recv().unwrap() {
            AppEvent::OrderSubmitted {
                order_id,
                customer_email,
                line_count,
            } => {
                assert_eq!(order_id, "o1");
                assert_eq!(customer_email, "smallbar@beer.ru");
                assert_eq!(line_count, 1);
            }
            other => panic!("expected OrderSubmitted, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn failed_submission_saves_nothing_and_emits_nothing() {
        let server = MockServer::start_async().await;
        // No mocks at all: the organization lookup 404s.
        let controller = controller(&server);
        let events = controller.bus.subscribe();

        let err = controller
            .submit("smallbar@beer.ru", None, &[chosen("p1", 1)])
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ClientError>(),
            Some(ClientError::RemoteApi(_))
        ));

        assert!(controller.history.list("smallbar@beer.ru").await.unwrap().is_empty());
        assert!(events.try_recv().is_err());
    }
}
