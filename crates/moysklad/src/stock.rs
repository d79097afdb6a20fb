//! Stock reconciliation: join the product catalog with the stock report.
//!
//! The stock report references products only weakly — by the id embedded in
//! its `assortment.meta.href`, or failing that by display name. The join is
//! a plain lookup table with explicit precedence; iteration is
//! product-first so output order matches catalog order.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use tapdesk_core::{ClientResult, PriceTier};

use crate::dto::{Product, StockRow};
use crate::gateway::Gateway;
use crate::price::resolve_price;

/// A sellable catalog item with its resolved tier price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: String,
    pub name: String,
    pub article: String,
    /// On-hand minus reserved, floored at zero.
    pub available: f64,
    /// Unit price in major currency units for the requested tier.
    pub price: f64,
}

/// Last path segment of a stock row's product back-reference.
fn product_id_from_href(href: &str) -> Option<&str> {
    href.rsplit('/').next().filter(|segment| !segment.is_empty())
}

/// Map each product id to its stock report row.
///
/// Primary key: the id parsed from `assortment.meta.href`. Fallback,
/// applied only when the primary key is absent or names no catalog
/// product: case-insensitive exact name match. Both keys fill gaps only —
/// the first row mapped to a product stays mapped.
fn index_stock_rows<'a>(
    products: &'a [Product],
    stock_rows: &'a [StockRow],
) -> HashMap<&'a str, &'a StockRow> {
    let known_ids: HashSet<&str> = products.iter().map(|p| p.id.as_str()).collect();
    let mut by_product: HashMap<&'a str, &'a StockRow> = HashMap::new();

    for row in stock_rows {
        let primary = row
            .assortment
            .as_ref()
            .and_then(|reference| product_id_from_href(&reference.meta.href));

        if let Some(id) = primary {
            if known_ids.contains(id) {
                by_product.entry(id).or_insert(row);
                continue;
            }
        }

        if row.name.is_empty() {
            continue;
        }
        let row_name = row.name.to_lowercase();
        if let Some(product) = products
            .iter()
            .find(|p| !p.name.is_empty() && p.name.to_lowercase() == row_name)
        {
            by_product.entry(product.id.as_str()).or_insert(row);
        }
    }

    by_product
}

/// Join products with stock rows and keep only sellable items.
///
/// A product is emitted when it passes the optional name-prefix `tag`
/// filter, its price list resolves for `target_label`, a stock row maps to
/// it, and the available quantity is positive. Products without the
/// requested price group are skipped outright, never priced by a
/// different group.
pub fn reconcile(
    products: &[Product],
    stock_rows: &[StockRow],
    target_label: &str,
    tag: Option<&str>,
) -> Vec<StockItem> {
    let by_product = index_stock_rows(products, stock_rows);
    let mut items = Vec::new();

    for product in products {
        if let Some(tag) = tag {
            if !product.name.trim().starts_with(tag) {
                continue;
            }
        }

        let Some(price) = resolve_price(&product.sale_prices, target_label) else {
            continue;
        };
        let Some(row) = by_product.get(product.id.as_str()) else {
            continue;
        };

        let available = (row.stock - row.reserve).max(0.0);
        if available <= 0.0 {
            continue;
        }

        let article = product
            .article
            .clone()
            .or_else(|| row.article.clone())
            .or_else(|| row.code.clone())
            .or_else(|| row.external_code.clone())
            .unwrap_or_default();

        let name = if product.name.is_empty() {
            "Unnamed Product".to_string()
        } else {
            product.name.clone()
        };

        items.push(StockItem {
            id: product.id.clone(),
            name,
            article,
            available,
            price,
        });
    }

    items
}

/// Fetch the catalog and the stock report, then reconcile them for `tier`.
///
/// Both datasets are refetched on every call; nothing is cached.
pub async fn fetch_available_stock(
    gateway: &Gateway,
    tier: PriceTier,
) -> ClientResult<Vec<StockItem>> {
    tracing::info!(%tier, "fetching products from the ERP");
    let products: Vec<Product> = gateway.fetch_all_pages("/entity/product").await?;
    if products.is_empty() {
        tracing::warn!("no products found in the ERP catalog");
        return Ok(Vec::new());
    }
    tracing::debug!(count = products.len(), "fetched catalog products");

    let stock_rows: Vec<StockRow> = gateway.fetch_all_pages("/report/stock/all").await?;
    tracing::debug!(count = stock_rows.len(), "fetched stock report rows");

    let items = reconcile(
        &products,
        &stock_rows,
        tier.remote_label(),
        gateway.config().catalog_tag.as_deref(),
    );
    tracing::info!(count = items.len(), "reconciled sellable stock");
    Ok(items)
}
