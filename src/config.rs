use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CountrySourceConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct RateSourceConfig {
    pub base_url: String,
}

/// Both upstream endpoints are optional in the file; a refresh with either
/// missing fails with the source-unavailable error before any network call.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SourcesConfig {
    pub countries: Option<CountrySourceConfig>,
    pub rates: Option<RateSourceConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Override for the catalog data directory.
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    /// Where the summary artifact lands; defaults under the data directory.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// TrueType/OpenType font used by the summary renderer.
    #[serde(default)]
    pub font_path: Option<PathBuf>,
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        debug!("Loading default config");
        let config_path = Self::default_config_path()?;
        Self::load_from_path(&config_path)
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.config_dir().join("config.yaml"))
    }

    pub fn default_data_path() -> Result<PathBuf> {
        let proj_dirs = Self::project_dirs()?;
        Ok(proj_dirs.data_dir().to_path_buf())
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("dev", "geodex", "geodex")
            .context("Could not determine project directories")
    }

    pub fn load_from_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let config_str = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {}", path.as_ref().display()))?;

        let config: Self = serde_yaml::from_str(&config_str)
            .with_context(|| format!("Failed to parse config file: {}", path.as_ref().display()))?;
        debug!("Successfully loaded config");
        Ok(config)
    }

    /// Resolved catalog data directory.
    pub fn data_path(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Self::default_data_path(),
        }
    }

    /// Resolved artifact output directory, never the process CWD.
    pub fn output_path(&self) -> Result<PathBuf> {
        match &self.output_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.data_path()?.join("cache")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let yaml_str = r#"
sources:
  countries:
    base_url: "https://restcountries.com/v2/all"
  rates:
    base_url: "https://open.er-api.com/v6/latest/USD"
output_dir: "/tmp/geodex-cache"
"#;

        let config: AppConfig = serde_yaml::from_str(yaml_str).expect("Failed to deserialize");
        assert_eq!(
            config.sources.countries.as_ref().unwrap().base_url,
            "https://restcountries.com/v2/all"
        );
        assert_eq!(
            config.sources.rates.as_ref().unwrap().base_url,
            "https://open.er-api.com/v6/latest/USD"
        );
        assert_eq!(
            config.output_path().unwrap(),
            PathBuf::from("/tmp/geodex-cache")
        );
        assert!(config.font_path.is_none());
    }

    #[test]
    fn test_sources_default_to_unconfigured() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.sources.countries.is_none());
        assert!(config.sources.rates.is_none());
    }

    #[test]
    fn test_output_dir_defaults_under_data_dir() {
        let config: AppConfig = serde_yaml::from_str(
            r#"
data_dir: "/var/lib/geodex"
"#,
        )
        .unwrap();
        assert_eq!(
            config.output_path().unwrap(),
            PathBuf::from("/var/lib/geodex/cache")
        );
    }
}
