//! Transaction persistence layer
//!
//! Records are append-only. The in-memory store backs development and
//! tests; Postgres is used when a database URL is configured.

use crate::models::TransactionRecord;
use crate::Result;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub mod postgres;
pub use postgres::PgTransactionStore;

/// Trait for transaction persistence
#[async_trait::async_trait]
pub trait TransactionStore: Send + Sync {
    async fn append(&self, record: &TransactionRecord) -> Result<()>;

    /// All stored records. Order is unspecified.
    async fn list_all(&self) -> Result<Vec<TransactionRecord>>;
}

/// In-memory transaction store for development
pub struct InMemoryTransactionStore {
    records: Arc<RwLock<Vec<TransactionRecord>>>,
}

impl InMemoryTransactionStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryTransactionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn append(&self, record: &TransactionRecord) -> Result<()> {
        let mut records = self.records.write().await;
        records.push(record.clone());
        Ok(())
    }

    async fn list_all(&self) -> Result<Vec<TransactionRecord>> {
        let records = self.records.read().await;
        Ok(records.clone())
    }
}

/// Pick a store from an optional database URL, falling back to memory
pub fn build_store(database_url: Option<&str>) -> Arc<dyn TransactionStore> {
    if let Some(url) = database_url {
        match PgTransactionStore::connect_lazy(url) {
            Ok(store) => {
                info!("Transaction store backend: postgres");
                return Arc::new(store);
            }
            Err(error) => {
                warn!(
                    "Failed to initialize postgres transaction store, falling back to in-memory: {}",
                    error
                );
            }
        }
    }

    info!("Transaction store backend: in-memory");
    Arc::new(InMemoryTransactionStore::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn record(id: i64, merchant: &str) -> TransactionRecord {
        TransactionRecord {
            id,
            category: "Food".to_string(),
            amount: Decimal::new(1250, 2),
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            merchant: merchant.to_string(),
        }
    }

    #[test]
    fn test_append_then_list() {
        let store = InMemoryTransactionStore::new();

        tokio_test::block_on(async {
            store.append(&record(1, "Walmart")).await.unwrap();
            store.append(&record(2, "Target")).await.unwrap();

            let all = store.list_all().await.unwrap();
            assert_eq!(all.len(), 2);
            assert!(all.iter().any(|r| r.merchant == "Walmart"));
            assert!(all.iter().any(|r| r.merchant == "Target"));
        });
    }

    #[test]
    fn test_empty_store_lists_nothing() {
        let store = InMemoryTransactionStore::default();
        let all = tokio_test::block_on(store.list_all()).unwrap();
        assert!(all.is_empty());
    }

    #[test]
    fn test_build_store_without_url_is_in_memory() {
        let store = build_store(None);
        let all = tokio_test::block_on(store.list_all()).unwrap();
        assert!(all.is_empty());
    }
}
