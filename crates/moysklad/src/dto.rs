//! Wire types for the MoySklad remap 1.2 contract.
//!
//! Field names mirror the remote JSON exactly (camelCase preserved through
//! serde renames). Missing optional fields deserialize to defaults so a
//! sparse row never fails the whole page.

use serde::{Deserialize, Serialize};

/// Entity reference metadata (`meta` object).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub href: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// A `{ "meta": { ... } }` wrapper, used both in responses (stock
/// back-references) and in outgoing payloads (order references).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaRef {
    pub meta: Meta,
}

impl MetaRef {
    fn entity(base_url: &str, entity: &str, id: &str, kind: &str) -> Self {
        Self {
            meta: Meta {
                href: format!("{base_url}/entity/{entity}/{id}"),
                kind: kind.to_string(),
            },
        }
    }

    pub fn product(base_url: &str, id: &str) -> Self {
        Self::entity(base_url, "product", id, "product")
    }

    pub fn organization(base_url: &str, id: &str) -> Self {
        Self::entity(base_url, "organization", id, "organization")
    }

    pub fn counterparty(base_url: &str, id: &str) -> Self {
        Self::entity(base_url, "counterparty", id, "counterparty")
    }
}

/// Pagination envelope metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ListMeta {
    #[serde(default)]
    pub size: i64,
    #[serde(default)]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

/// Paginated listing envelope: `{ "rows": [...], "meta": {...} }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
    #[serde(default)]
    pub meta: ListMeta,
}

/// A named price-type group (e.g. `Прайс основной`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceType {
    pub name: String,
}

/// One sale price: price-type group plus a value in minor currency units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalePrice {
    #[serde(rename = "priceType")]
    pub price_type: PriceType,
    pub value: i64,
}

/// A catalog product snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub article: Option<String>,
    #[serde(rename = "salePrices", default)]
    pub sale_prices: Vec<SalePrice>,
}

/// One row of the `/report/stock/all` quantity report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    #[serde(default)]
    pub stock: f64,
    #[serde(default)]
    pub reserve: f64,
    #[serde(rename = "inTransit", default)]
    pub in_transit: f64,
    #[serde(default)]
    pub quantity: f64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub article: Option<String>,
    #[serde(rename = "externalCode", default)]
    pub external_code: Option<String>,
    /// Weak back-reference to the product this row reports on.
    #[serde(default)]
    pub assortment: Option<MetaRef>,
}

/// An organization record (seller side of every order).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// A counterparty (the remote system's customer/agent record).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Counterparty {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

/// The remote's answer to a successful order creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatedOrder {
    pub id: String,
    #[serde(default)]
    pub name: String,
}

/// Outgoing payload: create a counterparty for a customer email.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CounterpartyDraft {
    pub name: String,
    pub email: String,
}

/// Outgoing payload: one order line item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PositionDraft {
    pub quantity: f64,
    /// Minor currency units, as the remote stores prices.
    pub price: i64,
    pub discount: i64,
    pub vat: i64,
    pub assortment: MetaRef,
}

/// Outgoing payload: the customer order itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerOrderDraft {
    pub name: String,
    pub description: String,
    pub organization: MetaRef,
    pub agent: MetaRef,
    pub positions: Vec<PositionDraft>,
}
