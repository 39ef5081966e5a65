use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::rate_provider::ExchangeRateProvider;
use crate::sources::FETCH_TIMEOUT;

/// Exchange-rate table backed by an open.er-api.com compatible endpoint.
///
/// The feed marks success in the payload body, not only in the HTTP status,
/// so a 200 response with an unset marker is still rejected.
pub struct OpenErApiProvider {
    base_url: String,
}

impl OpenErApiProvider {
    pub fn new(base_url: &str) -> Self {
        OpenErApiProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RatesResponse {
    result: String,
    #[serde(default)]
    rates: Option<HashMap<String, f64>>,
}

#[async_trait]
impl ExchangeRateProvider for OpenErApiProvider {
    #[instrument(name = "ExchangeRateFetch", skip(self))]
    async fn fetch_rates(&self) -> Result<HashMap<String, f64>> {
        debug!("Requesting exchange rates from {}", self.base_url);

        let client = reqwest::Client::builder()
            .user_agent("geodex/0.1")
            .timeout(FETCH_TIMEOUT)
            .build()?;
        let response = client
            .get(&self.base_url)
            .send()
            .await
            .map_err(|e| anyhow!("Request error: {} for URL: {}", e, self.base_url))?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "HTTP error: {} from exchange rate feed",
                response.status()
            ));
        }

        let body = response
            .json::<RatesResponse>()
            .await
            .map_err(|e| anyhow!("Failed to parse exchange rate response: {}", e))?;

        if body.result != "success" {
            return Err(anyhow!(
                "Exchange rate feed reported result: {}",
                body.result
            ));
        }

        let rates = body
            .rates
            .ok_or_else(|| anyhow!("Exchange rate feed returned no rates table"))?;

        debug!(count = rates.len(), "Received exchange rate table");
        Ok(rates)
    }
}
