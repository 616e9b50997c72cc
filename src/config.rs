/// Dashboard configuration loader - parses dashboard.toml
///
/// Separates provider endpoints and request tuning from code, making it
/// easy to point the dashboard at a mirror or a mock server without
/// recompiling. Every field has a production default, so a missing or
/// partial configuration file is not an error.

use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Provider endpoints and request limits.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Base URL of the USGS Water Data OGC API.
    pub usgs_base_url: String,

    /// Base URL of the National Weather Service API.
    pub weather_base_url: String,

    /// Page limit for the states/counties collection queries.
    pub collection_page_limit: u32,

    /// Page limit for the monitoring-locations query. Lower than the
    /// collection limit; a single county rarely has more than a few
    /// hundred stream sites.
    pub location_page_limit: u32,

    /// Page limit for daily time-series queries.
    pub daily_page_limit: u32,

    /// User-Agent sent with every request. The weather API rejects
    /// requests without one.
    pub user_agent: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            usgs_base_url: "https://api.waterdata.usgs.gov/ogcapi/v0".to_string(),
            weather_base_url: "https://api.weather.gov".to_string(),
            collection_page_limit: 10_000,
            location_page_limit: 1_000,
            daily_page_limit: 10_000,
            user_agent: concat!("hydrodash_service/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Errors from reading or parsing a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Loads dashboard configuration from a TOML file. Fields absent from the
/// file keep their defaults.
///
/// # Errors
/// [`ConfigError`] if the file cannot be read or is not valid TOML.
pub fn load_config(path: &Path) -> Result<DashboardConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_point_at_production_endpoints() {
        let config = DashboardConfig::default();
        assert!(config.usgs_base_url.contains("api.waterdata.usgs.gov"));
        assert!(config.weather_base_url.contains("api.weather.gov"));
        assert_eq!(config.collection_page_limit, 10_000);
        assert_eq!(config.location_page_limit, 1_000);
        assert!(!config.user_agent.is_empty(), "weather API requires a User-Agent");
    }

    #[test]
    fn test_partial_file_keeps_defaults_for_missing_fields() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, r#"usgs_base_url = "http://localhost:8080/ogcapi/v0""#).unwrap();

        let config = load_config(file.path()).expect("partial config should load");
        assert_eq!(config.usgs_base_url, "http://localhost:8080/ogcapi/v0");
        assert!(config.weather_base_url.contains("api.weather.gov"));
        assert_eq!(config.daily_page_limit, 10_000);
    }

    #[test]
    fn test_missing_file_is_a_read_error() {
        let result = load_config(Path::new("/nonexistent/dashboard.toml"));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().expect("create temp file");
        writeln!(file, "usgs_base_url = [not toml").unwrap();

        let result = load_config(file.path());
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
