//! Data-layer configuration.
//!
//! TOML-backed settings with serde defaults, environment overrides for
//! deployment-sensitive values, and a `validate()` pass that runs after
//! loading. Every section can be omitted from the file.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Top-level configuration for the data layer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataLayerConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    #[serde(default)]
    pub search: SearchSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Connection settings for the PostgreSQL datastore.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Connection URL. Overridable via `TABULARIUM_DATABASE_URL`.
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Pool size shared by all request workers.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

/// Full-text search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Text-search configuration passed to `tsvector_update_trigger` and
    /// `plainto_tsquery`. One global value for every dataset; per-dataset
    /// languages are a known limitation, not inferred here.
    #[serde(default = "default_search_language")]
    pub language: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            language: default_search_language(),
        }
    }
}

/// Logging settings consumed by the binary that hosts this layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_database_url() -> String {
    "postgres://localhost/tabularium".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_search_language() -> String {
    "pg_catalog.portuguese".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DataLayerConfig {
    /// Load configuration from a TOML file.
    ///
    /// Note: environment overrides are applied separately via
    /// `apply_env_overrides()`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| anyhow::anyhow!("Failed to read config file: {}", e))?;

        let config: DataLayerConfig = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config file: {}", e))?;

        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides, then re-validate.
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(url) = std::env::var("TABULARIUM_DATABASE_URL") {
            self.database.url = url;
        }
        self.validate()
    }

    /// Validate configuration settings.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.database.url.is_empty() {
            return Err(anyhow::anyhow!("Database URL cannot be empty"));
        }

        if self.database.max_connections == 0 {
            return Err(anyhow::anyhow!("Database pool size cannot be 0"));
        }

        let valid_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(anyhow::anyhow!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_levels.join(", ")
            ));
        }

        // The language value reaches the datastore as a bind parameter, but
        // a typo here would surface as a confusing runtime SQL error.
        if !self
            .search
            .language
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_' || c == '.')
            || self.search.language.is_empty()
        {
            return Err(anyhow::anyhow!(
                "Invalid search language '{}'",
                self.search.language
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DataLayerConfig::default();
        assert_eq!(config.search.language, "pg_catalog.portuguese");
        assert_eq!(config.database.max_connections, 16);
        assert_eq!(config.logging.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config: DataLayerConfig = toml::from_str(
            r#"
            [database]
            url = "postgres://db.internal/opendata"
            "#,
        )
        .unwrap();
        assert_eq!(config.database.url, "postgres://db.internal/opendata");
        assert_eq!(config.database.max_connections, 16);
        assert_eq!(config.search.language, "pg_catalog.portuguese");
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let mut config = DataLayerConfig::default();
        config.logging.level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_language() {
        let mut config = DataLayerConfig::default();
        config.search.language = "pg_catalog.portuguese; DROP".to_string();
        assert!(config.validate().is_err());

        config.search.language = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_pool() {
        let mut config = DataLayerConfig::default();
        config.database.max_connections = 0;
        assert!(config.validate().is_err());
    }
}
