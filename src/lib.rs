pub mod catalog;
pub mod cli;
pub mod config;
pub mod country;
pub mod directory_provider;
pub mod error;
pub mod log;
pub mod merge;
pub mod query;
pub mod rate_provider;
pub mod render;
pub mod sources;
pub mod store;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

use crate::catalog::CountryCatalog;
use crate::config::AppConfig;
use crate::directory_provider::CountryDirectoryProvider;
use crate::merge::UniformMultiplier;
use crate::query::CountryQuery;
use crate::rate_provider::ExchangeRateProvider;
use crate::render::SummaryRenderer;
use crate::sources::open_er_api::OpenErApiProvider;
use crate::sources::rest_countries::RestCountriesProvider;
use crate::store::disk::DiskCatalog;

pub enum AppCommand {
    Refresh,
    List(CountryQuery),
    Show { name: String },
    Delete { name: String },
    Status,
}

/// Wires a catalog from config: disk store, HTTP providers for whichever
/// sources are configured, the uniform multiplier, and the PNG renderer.
pub fn build_catalog(config: &AppConfig) -> Result<CountryCatalog> {
    let data_dir = config.data_path()?;
    let store = Arc::new(DiskCatalog::open(&data_dir.join("catalog"))?);

    let directory = config.sources.countries.as_ref().map(|source| {
        Arc::new(RestCountriesProvider::new(&source.base_url)) as Arc<dyn CountryDirectoryProvider>
    });
    let rates = config.sources.rates.as_ref().map(|source| {
        Arc::new(OpenErApiProvider::new(&source.base_url)) as Arc<dyn ExchangeRateProvider>
    });

    let font_data = match &config.font_path {
        Some(path) => Some(
            std::fs::read(path)
                .with_context(|| format!("Failed to read font file: {}", path.display()))?,
        ),
        None => None,
    };
    let renderer = SummaryRenderer::new(&config.output_path()?, font_data);

    Ok(CountryCatalog::new(
        store,
        directory,
        rates,
        Arc::new(UniformMultiplier),
        renderer,
    ))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let catalog = build_catalog(&config)?;

    match command {
        AppCommand::Refresh => {
            let spinner = cli::ui::new_spinner("Refreshing catalog...");
            let result = catalog.refresh().await;
            spinner.finish_and_clear();
            let outcome = result?;
            println!(
                "Refreshed {} countries at {}",
                outcome.total,
                outcome.refreshed_at.to_rfc3339()
            );
            println!("Summary image: {}", catalog.summary_image_path().display());
        }
        AppCommand::List(query) => {
            let countries = catalog.find(&query).await?;
            println!("{}", cli::list::countries_table(&countries));
        }
        AppCommand::Show { name } => {
            let country = catalog.find_one(&name).await?;
            println!("{}", cli::list::country_details(&country));
        }
        AppCommand::Delete { name } => {
            catalog.delete(&name).await?;
            println!("Deleted {name}");
        }
        AppCommand::Status => {
            let status = catalog.status().await?;
            println!("{}", cli::status::status_lines(&status));
        }
    }

    Ok(())
}
