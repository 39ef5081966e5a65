use std::collections::HashSet;
use std::sync::Arc;

use geodex::catalog::CountryCatalog;
use geodex::directory_provider::CountryDirectoryProvider;
use geodex::error::CatalogError;
use geodex::merge::FixedMultiplier;
use geodex::query::{CountryQuery, SortKey};
use geodex::rate_provider::ExchangeRateProvider;
use geodex::render::SummaryRenderer;
use geodex::sources::open_er_api::OpenErApiProvider;
use geodex::sources::rest_countries::RestCountriesProvider;
use geodex::store::disk::DiskCatalog;

mod test_utils {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub const COUNTRIES_BODY: &str = r#"[
        {
            "name": "France",
            "capital": "Paris",
            "region": "Europe",
            "population": 67390000,
            "flag": "https://flagcdn.com/fr.svg",
            "currencies": [{"code": "EUR"}]
        },
        {
            "name": "Japan",
            "capital": "Tokyo",
            "region": "Asia",
            "population": 125800000,
            "currencies": [{"code": "JPY"}]
        },
        {
            "name": "Antarctica",
            "region": "Polar"
        },
        {
            "name": "Narnia",
            "population": 1000,
            "currencies": [{"code": "NAR"}]
        }
    ]"#;

    pub const RATES_BODY: &str = r#"{
        "result": "success",
        "rates": {"USD": 1.0, "EUR": 0.92, "JPY": 149.5}
    }"#;

    pub async fn create_countries_server(body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v2/all"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }

    pub async fn create_rates_server(body: &str) -> MockServer {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v6/latest/USD"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;
        mock_server
    }
}

fn catalog_at(
    dir: &std::path::Path,
    countries_url: Option<String>,
    rates_url: Option<String>,
) -> CountryCatalog {
    let store = Arc::new(DiskCatalog::open(&dir.join("catalog")).unwrap());
    let directory = countries_url.map(|url| {
        Arc::new(RestCountriesProvider::new(&url)) as Arc<dyn CountryDirectoryProvider>
    });
    let rates = rates_url
        .map(|url| Arc::new(OpenErApiProvider::new(&url)) as Arc<dyn ExchangeRateProvider>);

    CountryCatalog::new(
        store,
        directory,
        rates,
        Arc::new(FixedMultiplier(1500)),
        SummaryRenderer::new(&dir.join("cache"), None),
    )
}

#[test_log::test(tokio::test)]
async fn test_full_refresh_flow_with_mocks() {
    let countries_server = test_utils::create_countries_server(test_utils::COUNTRIES_BODY).await;
    let rates_server = test_utils::create_rates_server(test_utils::RATES_BODY).await;
    let dir = tempfile::tempdir().unwrap();

    let catalog = catalog_at(
        dir.path(),
        Some(format!("{}/v2/all", countries_server.uri())),
        Some(format!("{}/v6/latest/USD", rates_server.uri())),
    );

    let outcome = catalog.refresh().await.unwrap();
    assert_eq!(outcome.total, 4);

    // Known positive rate: gdp == population * m / rate with the pinned m.
    let france = catalog.find_one("france").await.unwrap();
    assert_eq!(france.exchange_rate, Some(0.92));
    assert_eq!(france.estimated_gdp, Some(67_390_000.0 * 1500.0 / 0.92));
    assert_eq!(france.last_refreshed_at, Some(outcome.refreshed_at));

    // No currency entries: gdp zero by definition, rate absent.
    let antarctica = catalog.find_one("Antarctica").await.unwrap();
    assert_eq!(antarctica.currency_code, None);
    assert_eq!(antarctica.exchange_rate, None);
    assert_eq!(antarctica.estimated_gdp, Some(0.0));
    assert_eq!(antarctica.population, "0");

    // Code absent from the rate table: both absent.
    let narnia = catalog.find_one("Narnia").await.unwrap();
    assert_eq!(narnia.currency_code, Some("NAR".to_string()));
    assert_eq!(narnia.exchange_rate, None);
    assert_eq!(narnia.estimated_gdp, None);

    // Summary artifact exists at the well-known path and is a PNG.
    let image = std::fs::read(catalog.summary_image_path()).unwrap();
    assert_eq!(&image[..8], b"\x89PNG\r\n\x1a\n");

    let status = catalog.status().await.unwrap();
    assert_eq!(status.total_countries, 4);
    assert_eq!(status.last_refreshed_at, Some(outcome.refreshed_at));
}

#[test_log::test(tokio::test)]
async fn test_refresh_twice_is_idempotent_by_key() {
    let countries_server = test_utils::create_countries_server(test_utils::COUNTRIES_BODY).await;
    let rates_server = test_utils::create_rates_server(test_utils::RATES_BODY).await;
    let dir = tempfile::tempdir().unwrap();

    let catalog = catalog_at(
        dir.path(),
        Some(format!("{}/v2/all", countries_server.uri())),
        Some(format!("{}/v6/latest/USD", rates_server.uri())),
    );

    let first = catalog.refresh().await.unwrap();
    let names_before: HashSet<String> = catalog
        .find(&CountryQuery::default())
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();

    let second = catalog.refresh().await.unwrap();
    let names_after: HashSet<String> = catalog
        .find(&CountryQuery::default())
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();

    assert_eq!(first.total, second.total);
    assert_eq!(names_before, names_after);
    assert_eq!(
        catalog.status().await.unwrap().total_countries,
        first.total as u64
    );
}

#[test_log::test(tokio::test)]
async fn test_missing_configuration_refuses_before_any_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog_at(dir.path(), None, None);

    let result = catalog.refresh().await;
    assert!(matches!(result, Err(CatalogError::SourceUnavailable(_))));

    let status = catalog.status().await.unwrap();
    assert_eq!(status.total_countries, 0);
    assert_eq!(status.last_refreshed_at, None);
}

#[test_log::test(tokio::test)]
async fn test_rate_feed_failure_aborts_whole_refresh() {
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let countries_server = test_utils::create_countries_server(test_utils::COUNTRIES_BODY).await;
    let rates_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v6/latest/USD"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&rates_server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let catalog = catalog_at(
        dir.path(),
        Some(format!("{}/v2/all", countries_server.uri())),
        Some(format!("{}/v6/latest/USD", rates_server.uri())),
    );

    let result = catalog.refresh().await;
    assert!(matches!(result, Err(CatalogError::SourceUnavailable(_))));
    assert_eq!(catalog.status().await.unwrap().total_countries, 0);
}

#[test_log::test(tokio::test)]
async fn test_unset_success_marker_aborts_whole_refresh() {
    let countries_server = test_utils::create_countries_server(test_utils::COUNTRIES_BODY).await;
    let rates_server =
        test_utils::create_rates_server(r#"{"result": "error", "rates": {"USD": 1.0}}"#).await;
    let dir = tempfile::tempdir().unwrap();

    let catalog = catalog_at(
        dir.path(),
        Some(format!("{}/v2/all", countries_server.uri())),
        Some(format!("{}/v6/latest/USD", rates_server.uri())),
    );

    let result = catalog.refresh().await;
    assert!(matches!(result, Err(CatalogError::SourceUnavailable(_))));
    assert_eq!(catalog.status().await.unwrap().total_countries, 0);
}

#[test_log::test(tokio::test)]
async fn test_query_sorting_and_pagination_over_refreshed_catalog() {
    let countries_server = test_utils::create_countries_server(test_utils::COUNTRIES_BODY).await;
    let rates_server = test_utils::create_rates_server(test_utils::RATES_BODY).await;
    let dir = tempfile::tempdir().unwrap();

    let catalog = catalog_at(
        dir.path(),
        Some(format!("{}/v2/all", countries_server.uri())),
        Some(format!("{}/v6/latest/USD", rates_server.uri())),
    );
    catalog.refresh().await.unwrap();

    let by_population = catalog
        .find(&CountryQuery {
            sort: SortKey::PopulationDesc,
            ..Default::default()
        })
        .await
        .unwrap();
    let names: Vec<&str> = by_population.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Japan", "France", "Narnia", "Antarctica"]);

    let europe = catalog
        .find(&CountryQuery {
            region: Some("Europe".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(europe.len(), 1);
    assert_eq!(europe[0].name, "France");

    let page = catalog
        .find(&CountryQuery {
            sort: SortKey::PopulationDesc,
            limit: Some(2),
            offset: Some(1),
            ..Default::default()
        })
        .await
        .unwrap();
    let page_names: Vec<&str> = page.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(page_names, vec!["France", "Narnia"]);

    // Absent estimates rank last when sorting gdp_desc.
    let by_gdp = catalog
        .find(&CountryQuery {
            sort: SortKey::GdpDesc,
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(by_gdp.last().unwrap().name, "Narnia");
}

#[test_log::test(tokio::test)]
async fn test_case_insensitive_show_and_delete() {
    let countries_server = test_utils::create_countries_server(test_utils::COUNTRIES_BODY).await;
    let rates_server = test_utils::create_rates_server(test_utils::RATES_BODY).await;
    let dir = tempfile::tempdir().unwrap();

    let catalog = catalog_at(
        dir.path(),
        Some(format!("{}/v2/all", countries_server.uri())),
        Some(format!("{}/v6/latest/USD", rates_server.uri())),
    );
    catalog.refresh().await.unwrap();

    let found = catalog.find_one("fRaNcE").await.unwrap();
    assert_eq!(found.name, "France");

    catalog.delete("FRANCE").await.unwrap();
    let gone = catalog.find_one("france").await;
    assert!(matches!(gone, Err(CatalogError::NotFound)));

    let again = catalog.delete("france").await;
    assert!(matches!(again, Err(CatalogError::NotFound)));
}

#[test_log::test(tokio::test)]
async fn test_build_catalog_from_config_file() {
    let countries_server = test_utils::create_countries_server(test_utils::COUNTRIES_BODY).await;
    let rates_server = test_utils::create_rates_server(test_utils::RATES_BODY).await;
    let dir = tempfile::tempdir().unwrap();

    let config_content = format!(
        r#"
sources:
  countries:
    base_url: "{}/v2/all"
  rates:
    base_url: "{}/v6/latest/USD"
data_dir: "{}"
"#,
        countries_server.uri(),
        rates_server.uri(),
        dir.path().display()
    );
    let config_file = dir.path().join("config.yaml");
    std::fs::write(&config_file, config_content).unwrap();

    let config = geodex::config::AppConfig::load_from_path(&config_file).unwrap();
    let catalog = geodex::build_catalog(&config).unwrap();

    let outcome = catalog.refresh().await.unwrap();
    assert_eq!(outcome.total, 4);
    assert!(catalog.summary_image_path().starts_with(dir.path()));
}
