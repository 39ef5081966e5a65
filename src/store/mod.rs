pub mod disk;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::country::Country;
use crate::error::CatalogResult;

/// Persistence boundary for catalog rows.
///
/// Implementations key rows by the lower-cased country name, so upsert,
/// lookup and delete share one case-insensitive identity. `upsert_all` is
/// the only mutating entry point a refresh run uses and must apply all rows
/// or none; `created_at` of an existing row survives the overwrite.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn upsert_all(&self, records: Vec<Country>) -> CatalogResult<()>;

    /// Snapshot of every row, in key order.
    async fn scan(&self) -> CatalogResult<Vec<Country>>;

    async fn get(&self, name: &str) -> CatalogResult<Option<Country>>;

    /// Removes a row, reporting whether it existed.
    async fn remove(&self, name: &str) -> CatalogResult<bool>;

    async fn count(&self) -> CatalogResult<u64>;

    /// Maximum `last_refreshed_at` across all rows, `None` when empty.
    async fn last_refreshed_at(&self) -> CatalogResult<Option<DateTime<Utc>>>;
}
