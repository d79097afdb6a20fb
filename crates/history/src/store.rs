//! SQLite-backed order history store.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqlitePool};
use tokio::sync::Mutex;
use uuid::Uuid;

/// What an order line looked like at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineSnapshot {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
}

/// One locally remembered order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedOrder {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub customer_email: String,
    pub comment: Option<String>,
    pub lines: Vec<OrderLineSnapshot>,
}

/// SQLite-backed history with a lazily initialized connection pool.
#[derive(Debug, Clone)]
pub struct OrderHistory {
    pool: Arc<Mutex<Option<SqlitePool>>>,
    db_path: PathBuf,
}

impl OrderHistory {
    /// Create a history over `db_path` (initialized on first use).
    pub fn new(db_path: impl Into<PathBuf>) -> Self {
        Self {
            pool: Arc::new(Mutex::new(None)),
            db_path: db_path.into(),
        }
    }

    /// History at the default location: `TAPDESK_HISTORY_DB` when set,
    /// otherwise `history.db` under the platform data directory.
    pub fn open_default() -> anyhow::Result<Self> {
        if let Ok(path) = std::env::var("TAPDESK_HISTORY_DB") {
            if !path.trim().is_empty() {
                return Ok(Self::new(path));
            }
        }

        let dir = dirs::data_local_dir()
            .context("failed to determine the local data directory for the order history")?
            .join("tapdesk");
        Ok(Self::new(dir.join("history.db")))
    }

    async fn ensure_initialized(&self) -> anyhow::Result<()> {
        let mut pool_guard = self.pool.lock().await;
        if pool_guard.is_some() {
            return Ok(());
        }

        if let Some(parent) = self.db_path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create history directory at {parent:?}")
            })?;
        }

        let db_url = format!("sqlite://{}?mode=rwc", self.db_path.to_string_lossy());
        let pool = SqlitePool::connect(&db_url)
            .await
            .with_context(|| format!("failed to open order history at {:?}", self.db_path))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS order_history (
                id             TEXT NOT NULL PRIMARY KEY,
                customer_email TEXT NOT NULL,
                comment        TEXT NULL,
                lines          TEXT NOT NULL,
                created_at     TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create order_history table")?;

        *pool_guard = Some(pool);
        Ok(())
    }

    async fn get_pool(&self) -> anyhow::Result<SqlitePool> {
        self.ensure_initialized().await?;
        let pool_guard = self.pool.lock().await;
        pool_guard
            .clone()
            .context("order history pool disappeared after initialization")
    }

    /// Remember a submitted order. Returns the stored entry.
    pub async fn add(
        &self,
        customer_email: &str,
        comment: Option<&str>,
        lines: &[OrderLineSnapshot],
    ) -> anyhow::Result<SavedOrder> {
        let saved = SavedOrder {
            id: Uuid::now_v7(),
            created_at: Utc::now(),
            customer_email: normalize_email(customer_email),
            comment: comment.map(str::to_string),
            lines: lines.to_vec(),
        };

        let pool = self.get_pool().await?;
        let lines_json =
            serde_json::to_string(&saved.lines).context("failed to encode order lines")?;

        sqlx::query(
            "INSERT INTO order_history (id, customer_email, comment, lines, created_at) \
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(saved.id.to_string())
        .bind(&saved.customer_email)
        .bind(&saved.comment)
        .bind(lines_json)
        .bind(saved.created_at.to_rfc3339())
        .execute(&pool)
        .await
        .context("failed to insert order into history")?;

        tracing::debug!(order_id = %saved.id, customer = %saved.customer_email, "order saved to history");
        Ok(saved)
    }

    /// All orders for one customer, newest first.
    pub async fn list(&self, customer_email: &str) -> anyhow::Result<Vec<SavedOrder>> {
        let pool = self.get_pool().await?;
        let rows = sqlx::query(
            "SELECT id, customer_email, comment, lines, created_at \
             FROM order_history WHERE customer_email = ? \
             ORDER BY created_at DESC, id DESC",
        )
        .bind(normalize_email(customer_email))
        .fetch_all(&pool)
        .await
        .context("failed to read order history")?;

        rows.iter().map(decode_row).collect()
    }

    /// Forget one customer's orders, or everything when `customer_email`
    /// is `None`.
    pub async fn clear(&self, customer_email: Option<&str>) -> anyhow::Result<()> {
        let pool = self.get_pool().await?;
        match customer_email {
            Some(email) => {
                sqlx::query("DELETE FROM order_history WHERE customer_email = ?")
                    .bind(normalize_email(email))
                    .execute(&pool)
                    .await
            }
            None => sqlx::query("DELETE FROM order_history").execute(&pool).await,
        }
        .context("failed to clear order history")?;
        Ok(())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn decode_row(row: &sqlx::sqlite::SqliteRow) -> anyhow::Result<SavedOrder> {
    let id: String = row.try_get("id")?;
    let created_at: String = row.try_get("created_at")?;
    let lines: String = row.try_get("lines")?;

    Ok(SavedOrder {
        id: id.parse().context("stored order id is not a uuid")?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .context("stored order timestamp is not RFC 3339")?
            .with_timezone(&Utc),
        customer_email: row.try_get("customer_email")?,
        comment: row.try_get("comment")?,
        lines: serde_json::from_str(&lines).context("stored order lines are not decodable")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn temp_history() -> OrderHistory {
        let path = std::env::temp_dir().join(format!("tapdesk-history-{}.db", Uuid::now_v7()));
        OrderHistory::new(path)
    }

    fn lines(name: &str) -> Vec<OrderLineSnapshot> {
        vec![OrderLineSnapshot {
            product_id: "p1".into(),
            name: name.into(),
            quantity: 2,
        }]
    }

    #[tokio::test]
    async fn added_orders_come_back_newest_first() {
        let history = temp_history();

        let first = history
            .add("smallbar@beer.ru", Some("first"), &lines("Jaws Lager"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = history
            .add("smallbar@beer.ru", None, &lines("Jaws Stout"))
            .await
            .unwrap();

        let listed = history.list("smallbar@beer.ru").await.unwrap();
        assert_eq!(listed, vec![second, first]);
    }

    #[tokio::test]
    async fn buckets_are_keyed_by_normalized_email() {
        let history = temp_history();
        history
            .add(" SmallBar@Beer.RU ", None, &lines("Jaws Lager"))
            .await
            .unwrap();

        let listed = history.list("smallbar@beer.ru").await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].customer_email, "smallbar@beer.ru");
        assert_eq!(listed[0].lines, lines("Jaws Lager"));

        assert!(history.list("bigbar@beer.ru").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn clear_removes_one_bucket_or_everything() {
        let history = temp_history();
        history
            .add("smallbar@beer.ru", None, &lines("Jaws Lager"))
            .await
            .unwrap();
        history
            .add("bigbar@beer.ru", None, &lines("Jaws Stout"))
            .await
            .unwrap();

        history.clear(Some("smallbar@beer.ru")).await.unwrap();
        assert!(history.list("smallbar@beer.ru").await.unwrap().is_empty());
        assert_eq!(history.list("bigbar@beer.ru").await.unwrap().len(), 1);

        history.clear(None).await.unwrap();
        assert!(history.list("bigbar@beer.ru").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn comments_survive_the_round_trip() {
        let history = temp_history();
        history
            .add("smallbar@beer.ru", Some("к выходным"), &lines("Jaws Lager"))
            .await
            .unwrap();
        history
            .add("smallbar@beer.ru", None, &lines("Jaws Lager"))
            .await
            .unwrap();

        let listed = history.list("smallbar@beer.ru").await.unwrap();
        let comments: Vec<Option<&str>> =
            listed.iter().map(|order| order.comment.as_deref()).collect();
        assert!(comments.contains(&Some("к выходным")));
        assert!(comments.contains(&None));
    }
}
