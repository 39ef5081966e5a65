use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fjall::{Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use std::path::Path;
use tracing::debug;

use crate::country::Country;
use crate::error::CatalogResult;
use crate::store::CatalogStore;

/// Catalog rows in a fjall partition, one JSON value per lower-cased name.
/// A refresh lands as a single batch commit, which is the all-or-nothing
/// unit the orchestrator relies on.
pub struct DiskCatalog {
    keyspace: Keyspace,
    partition: PartitionHandle,
}

impl DiskCatalog {
    pub fn open(path: &Path) -> CatalogResult<Self> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data directory: {}", path.display()))?;

        let keyspace = fjall::Config::new(path).open()?;
        let partition =
            keyspace.open_partition("countries", PartitionCreateOptions::default())?;

        Ok(Self {
            keyspace,
            partition,
        })
    }
}

#[async_trait]
impl CatalogStore for DiskCatalog {
    async fn upsert_all(&self, records: Vec<Country>) -> CatalogResult<()> {
        let total = records.len();
        let mut batch = self.keyspace.batch();

        for mut record in records {
            let key = record.key();
            if let Some(existing) = self.partition.get(&key)? {
                let existing: Country = serde_json::from_slice(&existing)?;
                record.created_at = existing.created_at;
            }
            batch.insert(&self.partition, key.as_bytes(), serde_json::to_vec(&record)?);
        }

        batch.commit()?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        debug!(total, "Committed catalog batch");
        Ok(())
    }

    async fn scan(&self) -> CatalogResult<Vec<Country>> {
        let mut rows = Vec::new();
        for entry in self.partition.iter() {
            let (_key, value) = entry?;
            rows.push(serde_json::from_slice(&value)?);
        }
        Ok(rows)
    }

    async fn get(&self, name: &str) -> CatalogResult<Option<Country>> {
        match self.partition.get(name.to_lowercase())? {
            Some(value) => Ok(Some(serde_json::from_slice(&value)?)),
            None => Ok(None),
        }
    }

    async fn remove(&self, name: &str) -> CatalogResult<bool> {
        let key = name.to_lowercase();
        let existed = self.partition.get(&key)?.is_some();
        if existed {
            self.partition.remove(key.as_bytes())?;
            self.keyspace.persist(PersistMode::SyncAll)?;
        }
        Ok(existed)
    }

    async fn count(&self) -> CatalogResult<u64> {
        let mut total = 0u64;
        for entry in self.partition.iter() {
            entry?;
            total += 1;
        }
        Ok(total)
    }

    async fn last_refreshed_at(&self) -> CatalogResult<Option<DateTime<Utc>>> {
        let rows = self.scan().await?;
        Ok(rows.into_iter().filter_map(|c| c.last_refreshed_at).max())
    }
}
