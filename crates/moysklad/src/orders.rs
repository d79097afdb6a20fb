//! Customer-order submission pipeline.
//!
//! A linear flow with fallback branches and no retries: resolve the
//! organization, resolve (or provision) the counterparty, re-fetch each
//! ordered product for authoritative pricing, create the order, then log a
//! best-effort notification summary. Each step depends on the previous
//! one's result; only the product re-fetches fan out concurrently.

use std::collections::HashMap;

use futures_util::future::try_join_all;

use tapdesk_core::{ClientError, ClientResult};

use crate::config::ErpConfig;
use crate::dto::{
    Counterparty, CounterpartyDraft, CreatedOrder, CustomerOrderDraft, ListResponse, MetaRef,
    Organization, PositionDraft, Product,
};
use crate::gateway::Gateway;

/// One requested order line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLine {
    pub product_id: String,
    /// At least 1; zero quantities are rejected at submission.
    pub quantity: u32,
}

/// A complete order as the caller hands it over. Consumed once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub customer_email: String,
    pub comment: Option<String>,
    pub lines: Vec<OrderLine>,
}

/// Submit a customer order to the ERP.
///
/// Prices shown while browsing are never trusted here; every ordered
/// product is re-fetched and priced from its current first sale price.
pub async fn submit_order(
    gateway: &Gateway,
    request: &OrderRequest,
) -> ClientResult<CreatedOrder> {
    if request.lines.is_empty() {
        return Err(ClientError::validation(
            "order must contain at least one line",
        ));
    }
    if request.lines.iter().any(|line| line.quantity == 0) {
        return Err(ClientError::validation(
            "order line quantities must be at least 1",
        ));
    }

    let organization = resolve_organization(gateway).await?;
    let counterparty = resolve_counterparty(gateway, &request.customer_email).await?;
    let products = fetch_order_products(gateway, &request.lines).await?;

    let base_url = gateway.config().base_url.as_str();
    let draft = CustomerOrderDraft {
        name: format!("Заказ от {}", request.customer_email),
        description: order_description(request),
        organization: MetaRef::organization(base_url, &organization.id),
        agent: MetaRef::counterparty(base_url, &counterparty.id),
        positions: build_positions(base_url, &request.lines, &products),
    };

    let created: CreatedOrder = gateway.post("/entity/customerorder", &draft).await?;
    tracing::info!(order_id = %created.id, order_name = %created.name, "customer order created");

    notify(gateway.config(), request, &products, &created);
    Ok(created)
}

async fn resolve_organization(gateway: &Gateway) -> ClientResult<Organization> {
    let list: ListResponse<Organization> = gateway
        .get_with_query("/entity/organization", &[("limit", "1".to_string())])
        .await?;

    list.rows.into_iter().next().ok_or_else(|| {
        ClientError::remote_api(
            "no organization is configured in the ERP; create one before ordering",
        )
    })
}

/// Three-tier counterparty resolution.
///
/// The remote requires a valid agent reference on every order, but an
/// order must not be blocked just because automatic customer provisioning
/// failed — hence the fallback to the first counterparty of any kind.
async fn resolve_counterparty(gateway: &Gateway, email: &str) -> ClientResult<Counterparty> {
    match find_or_create_counterparty(gateway, email).await {
        Ok(counterparty) => Ok(counterparty),
        Err(err) => {
            tracing::warn!(
                error = %err,
                "counterparty lookup/creation failed, falling back to the first available"
            );
            let fallback: ListResponse<Counterparty> = gateway
                .get_with_query("/entity/counterparty", &[("limit", "1".to_string())])
                .await
                .map_err(|_| counterparty_exhausted())?;
            fallback
                .rows
                .into_iter()
                .next()
                .ok_or_else(counterparty_exhausted)
        }
    }
}

fn counterparty_exhausted() -> ClientError {
    ClientError::remote_api("failed to find or create a counterparty (agent) for the order")
}

async fn find_or_create_counterparty(gateway: &Gateway, email: &str) -> ClientResult<Counterparty> {
    let found: ListResponse<Counterparty> = gateway
        .get_with_query(
            "/entity/counterparty",
            &[
                ("filter", format!("email={email}")),
                ("limit", "1".to_string()),
            ],
        )
        .await?;
    if let Some(counterparty) = found.rows.into_iter().next() {
        return Ok(counterparty);
    }

    tracing::info!(%email, "no counterparty matched, creating one");
    gateway
        .post(
            "/entity/counterparty",
            &CounterpartyDraft {
                name: email.to_string(),
                email: email.to_string(),
            },
        )
        .await
}

/// Re-fetch each distinct ordered product, concurrently.
async fn fetch_order_products(
    gateway: &Gateway,
    lines: &[OrderLine],
) -> ClientResult<HashMap<String, Product>> {
    let mut distinct: Vec<&str> = Vec::new();
    for line in lines {
        if !distinct.contains(&line.product_id.as_str()) {
            distinct.push(&line.product_id);
        }
    }

    let fetched = try_join_all(distinct.iter().map(|id| {
        let endpoint = format!("/entity/product/{id}");
        async move { gateway.get::<Product>(&endpoint).await }
    }))
    .await?;

    Ok(fetched
        .into_iter()
        .map(|product| (product.id.clone(), product))
        .collect())
}

fn build_positions(
    base_url: &str,
    lines: &[OrderLine],
    products: &HashMap<String, Product>,
) -> Vec<PositionDraft> {
    lines
        .iter()
        .map(|line| {
            // First listed sale price, in minor units; 0 when unpriced.
            let price = products
                .get(&line.product_id)
                .and_then(|product| product.sale_prices.first())
                .map(|sale_price| sale_price.value)
                .unwrap_or(0);

            PositionDraft {
                quantity: f64::from(line.quantity),
                price,
                discount: 0,
                vat: 0,
                assortment: MetaRef::product(base_url, &line.product_id),
            }
        })
        .collect()
}

fn order_description(request: &OrderRequest) -> String {
    request
        .comment
        .as_deref()
        .map(str::trim)
        .filter(|comment| !comment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| {
            format!(
                "Заказ от клиента {email}\nEmail: {email}",
                email = request.customer_email
            )
        })
}

/// Log the order summary for the configured recipient.
///
/// Fire-and-forget: whatever happens here, the submission already
/// succeeded.
fn notify(
    config: &ErpConfig,
    request: &OrderRequest,
    products: &HashMap<String, Product>,
    created: &CreatedOrder,
) {
    let Some(recipient) = config.notification_email.as_deref() else {
        tracing::debug!("no notification email configured, skipping order summary");
        return;
    };

    let summary = request
        .lines
        .iter()
        .map(|line| {
            let name = products
                .get(&line.product_id)
                .map(|product| product.name.as_str())
                .filter(|name| !name.is_empty())
                .unwrap_or(line.product_id.as_str());
            format!("- {}: {} шт.", name, line.quantity)
        })
        .collect::<Vec<_>>()
        .join("\n");

    tracing::info!(
        recipient,
        order_id = %created.id,
        customer = %request.customer_email,
        comment = request.comment.as_deref().unwrap_or("No comment"),
        "order notification:\n{summary}"
    );
}
