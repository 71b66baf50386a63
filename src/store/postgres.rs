//! Postgres-backed transaction store

use super::TransactionStore;
use crate::error::AssistantError;
use crate::models::TransactionRecord;
use crate::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, error};

pub struct PgTransactionStore {
    pool: PgPool,
    schema_ready: Arc<OnceCell<()>>,
}

impl PgTransactionStore {
    /// Build a lazily-connecting pool. No connection is opened until the
    /// first query.
    pub fn connect_lazy(url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_lazy(url)
            .map_err(|e| AssistantError::Database(format!("Invalid database URL: {}", e)))?;

        Ok(Self {
            pool,
            schema_ready: Arc::new(OnceCell::new()),
        })
    }

    async fn ensure_schema(&self) -> Result<()> {
        let pool = &self.pool;

        self.schema_ready
            .get_or_try_init(|| async {
                sqlx::query(
                    r#"
                    CREATE TABLE IF NOT EXISTS financial_transactions (
                      id BIGINT PRIMARY KEY,
                      category TEXT NOT NULL,
                      amount NUMERIC(14, 2) NOT NULL,
                      date DATE NOT NULL,
                      merchant TEXT NOT NULL
                    );
                    "#,
                )
                .execute(pool)
                .await?;

                Ok::<(), sqlx::Error>(())
            })
            .await
            .map_err(|e| {
                AssistantError::Database(format!(
                    "Failed to initialize transaction schema: {}",
                    e
                ))
            })?;

        Ok(())
    }
}

#[async_trait::async_trait]
impl TransactionStore for PgTransactionStore {
    async fn append(&self, record: &TransactionRecord) -> Result<()> {
        self.ensure_schema().await?;

        sqlx::query(
            r#"
            INSERT INTO financial_transactions (id, category, amount, date, merchant)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.id)
        .bind(&record.category)
        .bind(record.amount)
        .bind(record.date)
        .bind(&record.merchant)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(id = record.id, "Failed to insert transaction: {}", e);
            AssistantError::Persistence(format!("Failed to insert transaction: {}", e))
        })?;

        debug!(id = record.id, "Transaction persisted");
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<TransactionRecord>> {
        self.ensure_schema().await?;

        let rows = sqlx::query(
            "SELECT id, category, amount, date, merchant FROM financial_transactions",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AssistantError::Database(format!("Failed to load transactions: {}", e)))?;

        rows.into_iter()
            .map(|row| -> Result<TransactionRecord> {
                Ok(TransactionRecord {
                    id: row.try_get("id").map_err(decode_error)?,
                    category: row.try_get("category").map_err(decode_error)?,
                    amount: row.try_get("amount").map_err(decode_error)?,
                    date: row.try_get("date").map_err(decode_error)?,
                    merchant: row.try_get("merchant").map_err(decode_error)?,
                })
            })
            .collect()
    }
}

fn decode_error(e: sqlx::Error) -> AssistantError {
    AssistantError::Database(format!("Failed to decode transaction row: {}", e))
}
