use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use tokio::sync::Mutex;

use crate::country::Country;
use crate::error::CatalogResult;
use crate::store::CatalogStore;

/// In-memory catalog mirroring the disk store's semantics, including key
/// order on scan. Used in tests and embedded callers that do not want a
/// data directory.
pub struct MemoryCatalog {
    rows: Mutex<BTreeMap<String, Country>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
        }
    }
}

impl Default for MemoryCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn upsert_all(&self, records: Vec<Country>) -> CatalogResult<()> {
        let mut rows = self.rows.lock().await;
        for mut record in records {
            let key = record.key();
            if let Some(existing) = rows.get(&key) {
                record.created_at = existing.created_at;
            }
            rows.insert(key, record);
        }
        Ok(())
    }

    async fn scan(&self) -> CatalogResult<Vec<Country>> {
        let rows = self.rows.lock().await;
        Ok(rows.values().cloned().collect())
    }

    async fn get(&self, name: &str) -> CatalogResult<Option<Country>> {
        let rows = self.rows.lock().await;
        Ok(rows.get(&name.to_lowercase()).cloned())
    }

    async fn remove(&self, name: &str) -> CatalogResult<bool> {
        let mut rows = self.rows.lock().await;
        Ok(rows.remove(&name.to_lowercase()).is_some())
    }

    async fn count(&self) -> CatalogResult<u64> {
        let rows = self.rows.lock().await;
        Ok(rows.len() as u64)
    }

    async fn last_refreshed_at(&self) -> CatalogResult<Option<DateTime<Utc>>> {
        let rows = self.rows.lock().await;
        Ok(rows.values().filter_map(|c| c.last_refreshed_at).max())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn country(name: &str) -> Country {
        let now = Utc::now();
        Country {
            name: name.to_string(),
            capital: None,
            region: None,
            population: "0".to_string(),
            currency_code: None,
            exchange_rate: None,
            estimated_gdp: None,
            flag_url: None,
            last_refreshed_at: Some(now),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_upsert_get_remove() {
        let store = MemoryCatalog::new();
        store.upsert_all(vec![country("France")]).await.unwrap();

        assert!(store.get("france").await.unwrap().is_some());
        assert_eq!(store.count().await.unwrap(), 1);
        assert!(store.remove("FRANCE").await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_scan_returns_key_order() {
        let store = MemoryCatalog::new();
        store
            .upsert_all(vec![country("Zimbabwe"), country("Albania")])
            .await
            .unwrap();

        let rows = store.scan().await.unwrap();
        assert_eq!(rows[0].name, "Albania");
        assert_eq!(rows[1].name, "Zimbabwe");
    }
}
