use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiConfig,
    pub search: SearchConfig,
    pub cache: CacheConfig,
    pub summary: SummaryConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ApiConfig {
    /// Prefix for every request path; empty means same origin
    pub base_url: String,
    pub purchase_orders_path: String,
    pub customers_search_path: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SearchConfig {
    pub suggestion_debounce_ms: u64,
    pub search_debounce_ms: u64,
    pub min_query_len: usize,
    pub suggestion_page_size: usize,
    pub default_page_size: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct CacheConfig {
    pub ttl_ms: u64,
    pub capacity: usize,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SummaryConfig {
    pub endpoints: Vec<SummaryEndpoint>,
}

/// One aggregate endpoint of the dashboard summary
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SummaryEndpoint {
    pub path: String,
    /// Dotted key path the response is assigned to; `None` merges the
    /// response's top-level keys into the view root
    #[serde(default)]
    pub mount: Option<String>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid config value: {0}")]
    Invalid(String),
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            purchase_orders_path: "/api/a025/purchase-orders".to_string(),
            customers_search_path: "/api/a003/counterparty/search".to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            suggestion_debounce_ms: 300,
            search_debounce_ms: 500,
            min_query_len: 2,
            suggestion_page_size: 10,
            default_page_size: 10,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl_ms: 300_000,
            capacity: 50,
        }
    }
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            endpoints: vec![
                SummaryEndpoint {
                    path: "/api/d405/invoices-summary".to_string(),
                    mount: None,
                },
                SummaryEndpoint {
                    path: "/api/d405/cost-summary".to_string(),
                    mount: None,
                },
            ],
        }
    }
}

impl Config {
    /// Parse a TOML document; missing sections and keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.search.default_page_size == 0 {
            return Err(ConfigError::Invalid("search.default_page_size must be > 0".into()));
        }
        if self.search.suggestion_page_size == 0 {
            return Err(ConfigError::Invalid("search.suggestion_page_size must be > 0".into()));
        }
        if self.cache.capacity == 0 {
            return Err(ConfigError::Invalid("cache.capacity must be > 0".into()));
        }
        if self.summary.endpoints.is_empty() {
            return Err(ConfigError::Invalid("summary.endpoints must not be empty".into()));
        }
        Ok(())
    }
}

/// Load configuration.
///
/// Uses `overrides` (TOML text supplied by the host page) when present,
/// otherwise the built-in defaults.
pub fn load_config(overrides: Option<&str>) -> Result<Config, ConfigError> {
    match overrides {
        Some(contents) => {
            log::info!("Loading config from host overrides");
            Config::from_toml_str(contents)
        }
        None => {
            log::info!("Using default configuration");
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_loads() {
        let config = load_config(None).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.search.suggestion_debounce_ms, 300);
        assert_eq!(config.cache.ttl_ms, 300_000);
        assert_eq!(config.cache.capacity, 50);
        assert_eq!(config.summary.endpoints.len(), 2);
    }

    #[test]
    fn test_empty_document_is_default() {
        assert_eq!(Config::from_toml_str("").unwrap(), Config::default());
        assert_eq!(
            Config::from_toml_str("[summary]\n").unwrap().summary,
            SummaryConfig::default()
        );
    }

    #[test]
    fn test_partial_overrides_keep_defaults() {
        let config = load_config(Some(
            r#"
            [api]
            base_url = "http://127.0.0.1:3000"

            [search]
            search_debounce_ms = 250
            "#,
        ))
        .unwrap();
        assert_eq!(config.api.base_url, "http://127.0.0.1:3000");
        assert_eq!(config.api.purchase_orders_path, "/api/a025/purchase-orders");
        assert_eq!(config.search.search_debounce_ms, 250);
        assert_eq!(config.search.min_query_len, 2);
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            Config::from_toml_str("[cache]\ncapacity = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[search]\nmin_query_len = \"two\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
