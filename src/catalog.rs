//! The catalog service: refresh orchestration plus the read/delete surface
//! the routing layer calls into.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::country::Country;
use crate::directory_provider::CountryDirectoryProvider;
use crate::error::{CatalogError, CatalogResult};
use crate::merge::{self, MultiplierSource};
use crate::query::{self, CountryQuery};
use crate::rate_provider::ExchangeRateProvider;
use crate::render::{self, SummaryRenderer};
use crate::store::CatalogStore;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefreshOutcome {
    pub total: usize,
    pub refreshed_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatalogStatus {
    pub total_countries: u64,
    pub last_refreshed_at: Option<DateTime<Utc>>,
}

pub struct CountryCatalog {
    store: Arc<dyn CatalogStore>,
    directory: Option<Arc<dyn CountryDirectoryProvider>>,
    rates: Option<Arc<dyn ExchangeRateProvider>>,
    multipliers: Arc<dyn MultiplierSource>,
    renderer: SummaryRenderer,
    // Advisory lock: one in-flight refresh at a time, later callers queue.
    refresh_gate: Mutex<()>,
}

impl CountryCatalog {
    pub fn new(
        store: Arc<dyn CatalogStore>,
        directory: Option<Arc<dyn CountryDirectoryProvider>>,
        rates: Option<Arc<dyn ExchangeRateProvider>>,
        multipliers: Arc<dyn MultiplierSource>,
        renderer: SummaryRenderer,
    ) -> Self {
        Self {
            store,
            directory,
            rates,
            multipliers,
            renderer,
            refresh_gate: Mutex::new(()),
        }
    }

    /// Runs the full fetch, merge, write, render pipeline. Fails without a
    /// partial write when either source is unconfigured or unreachable;
    /// every surviving row carries the same `last_refreshed_at`.
    pub async fn refresh(&self) -> CatalogResult<RefreshOutcome> {
        let _running = self.refresh_gate.lock().await;

        let (Some(directory), Some(rates_provider)) = (&self.directory, &self.rates) else {
            return Err(CatalogError::SourceUnavailable(
                "missing countries or exchange rates source configuration",
            ));
        };

        info!("Starting catalog refresh");
        let fetched = futures::try_join!(
            directory.fetch_countries(),
            rates_provider.fetch_rates()
        );
        let (countries, rates) = match fetched {
            Ok(datasets) => datasets,
            Err(err) => {
                warn!(error = %err, "External fetch failed");
                return Err(CatalogError::SourceUnavailable(
                    "could not fetch data from the countries or exchange rates source",
                ));
            }
        };

        let refreshed_at = Utc::now();
        let records =
            merge::merge_datasets(countries, &rates, self.multipliers.as_ref(), refreshed_at);
        let total = records.len();
        self.store.upsert_all(records).await?;

        self.regenerate_summary(refreshed_at).await?;

        info!(total, "Catalog refresh complete");
        Ok(RefreshOutcome {
            total,
            refreshed_at,
        })
    }

    /// Rebuilds the summary artifact from post-write store state.
    async fn regenerate_summary(&self, now: DateTime<Utc>) -> CatalogResult<PathBuf> {
        let total = self.store.count().await?;
        let rows = self.store.scan().await?;
        let top = render::top_by_estimated_gdp(rows, 5);
        self.renderer.render_to_file(total, &top, now)
    }

    pub async fn find(&self, query: &CountryQuery) -> CatalogResult<Vec<Country>> {
        let rows = self.store.scan().await?;
        Ok(query::run_query(rows, query))
    }

    pub async fn find_one(&self, name: &str) -> CatalogResult<Country> {
        self.store.get(name).await?.ok_or(CatalogError::NotFound)
    }

    pub async fn delete(&self, name: &str) -> CatalogResult<()> {
        if self.store.remove(name).await? {
            Ok(())
        } else {
            Err(CatalogError::NotFound)
        }
    }

    pub async fn status(&self) -> CatalogResult<CatalogStatus> {
        Ok(CatalogStatus {
            total_countries: self.store.count().await?,
            last_refreshed_at: self.store.last_refreshed_at().await?,
        })
    }

    pub fn summary_image_path(&self) -> PathBuf {
        self.renderer.image_path()
    }
}
