//! Provides the currency exchange-rate feed for the catalog.

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

#[async_trait]
pub trait ExchangeRateProvider: Send + Sync {
    /// Returns the full currency-code to exchange-rate table.
    async fn fetch_rates(&self) -> Result<HashMap<String, f64>>;
}
