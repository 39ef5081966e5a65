use anyhow::{Result, anyhow};
use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::directory_provider::{CountryDirectoryProvider, SourceCountry};
use crate::sources::FETCH_TIMEOUT;

/// Country directory backed by a REST Countries compatible endpoint that
/// returns the full country list in a single response.
pub struct RestCountriesProvider {
    base_url: String,
}

impl RestCountriesProvider {
    pub fn new(base_url: &str) -> Self {
        RestCountriesProvider {
            base_url: base_url.to_string(),
        }
    }
}

#[async_trait]
impl CountryDirectoryProvider for RestCountriesProvider {
    #[instrument(name = "CountryDirectoryFetch", skip(self))]
    async fn fetch_countries(&self) -> Result<Vec<SourceCountry>> {
        debug!("Requesting country directory from {}", self.base_url);

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
                "HTTP error: {} from country directory",
                response.status()
            ));
        }

        let countries = response
            .json::<Vec<SourceCountry>>()
            .await
            .map_err(|e| anyhow!("Failed to parse country directory response: {}", e))?;

        debug!(count = countries.len(), "Received country directory");
        Ok(countries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn create_mock_server(mock_response: &str) -> MockServer {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v2/all"))
            .respond_with(ResponseTemplate::new(200).set_body_string(mock_response))
            .mount(&mock_server)
            .await;

        mock_server
    }

    #[tokio::test]
    async fn test_successful_directory_fetch() {
        let mock_response = r#"[
            {
                "name": "France",
                "capital": "Paris",
                "region": "Europe",
                "population": 67390000,
                "flag": "https://flagcdn.com/fr.svg",
                "currencies": [{"code": "EUR"}]
            },
            {
                "name": "Antarctica"
            }
        ]"#;

        let mock_server = create_mock_server(mock_response).await;
        let provider = RestCountriesProvider::new(&format!("{}/v2/all", mock_server.uri()));

        let countries = provider.fetch_countries().await.unwrap();
        assert_eq!(countries.len(), 2);
        assert_eq!(countries[0].name, "France");
        assert_eq!(countries[0].capital.as_deref(), Some("Paris"));
        assert_eq!(countries[0].population, Some(67_390_000));
        assert_eq!(countries[0].primary_currency(), Some("EUR".to_string()));
        assert_eq!(countries[1].name, "Antarctica");
        assert_eq!(countries[1].population, None);
        assert_eq!(countries[1].primary_currency(), None);
    }

    #[tokio::test]
    async fn test_directory_http_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/all"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider = RestCountriesProvider::new(&format!("{}/v2/all", mock_server.uri()));
        let result = provider.fetch_countries().await;
        assert!(result.is_err());
        assert_eq!(
            result.unwrap_err().to_string(),
            "HTTP error: 500 Internal Server Error from country directory"
        );
    }

    #[tokio::test]
    async fn test_directory_malformed_response() {
        let mock_server = create_mock_server(r#"{"not": "a list"}"#).await;
        let provider = RestCountriesProvider::new(&format!("{}/v2/all", mock_server.uri()));

        let result = provider.fetch_countries().await;
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to parse country directory response")
        );
    }
}
