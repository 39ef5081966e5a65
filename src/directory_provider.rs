//! Provides the country directory feed for the catalog.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

/// One entry of a country's currency list. The feed may report the entry or
/// its code as null.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceCurrency {
    #[serde(default)]
    pub code: Option<String>,
}

/// A raw country record as the directory feed reports it. Upstream treats
/// every field except `name` as optional, so the optionality is resolved
/// here, once, at the ingestion boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceCountry {
    pub name: String,
    #[serde(default)]
    pub capital: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
    #[serde(default)]
    pub flag: Option<String>,
    #[serde(default)]
    pub currencies: Option<Vec<Option<SourceCurrency>>>,
}

impl SourceCountry {
    /// Code of the first currency entry, or `None` when the list is missing,
    /// empty, or its first entry carries no code.
    pub fn primary_currency(&self) -> Option<String> {
        self.currencies.as_ref()?.first()?.as_ref()?.code.clone()
    }
}

#[async_trait]
pub trait CountryDirectoryProvider: Send + Sync {
    async fn fetch_countries(&self) -> Result<Vec<SourceCountry>>;
}
