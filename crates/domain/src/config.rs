//! Configuration structures
//!
//! Plain serde structs filled in by the infra config loader (environment
//! variables first, config file fallback). Every field has a default so a
//! bare checkout runs against a local database file.

use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_VALIDITY_DAYS;

/// Top-level application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub database: DatabaseConfig,
    pub render: RenderConfig,
    pub quoting: QuotingConfig,
}

/// SQLite database settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Path of the database file.
    pub path: String,
    /// Connections held by the r2d2 pool.
    pub pool_size: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { path: "oficina.db".to_string(), pool_size: 8 }
    }
}

/// Document rendering settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderConfig {
    /// Directory holding the TTF font family used by the PDF renderer.
    pub fonts_dir: String,
    /// Font family name (`<family>-Regular.ttf` etc. inside `fonts_dir`).
    pub font_family: String,
    /// Company name printed on document headers and contract terms.
    pub company_name: String,
    /// Line printed under the company name on document headers.
    pub company_tagline: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            fonts_dir: "./fonts".to_string(),
            font_family: "LiberationSans".to_string(),
            company_name: "Oficina Mecânica".to_string(),
            company_tagline: "Serviços automotivos".to_string(),
        }
    }
}

/// Quote issuance settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct QuotingConfig {
    /// Validity window applied when a quote does not specify one, in days.
    pub validity_days: i64,
}

impl Default for QuotingConfig {
    fn default() -> Self {
        Self { validity_days: DEFAULT_VALIDITY_DAYS }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_usable() {
        let config = Config::default();
        assert_eq!(config.database.path, "oficina.db");
        assert!(config.database.pool_size > 0);
        assert_eq!(config.quoting.validity_days, 30);
    }

    #[test]
    fn partial_config_fills_missing_sections() {
        let config: Config =
            serde_json::from_str(r#"{"database": {"path": "/tmp/shop.db"}}"#).unwrap();
        assert_eq!(config.database.path, "/tmp/shop.db");
        assert_eq!(config.database.pool_size, DatabaseConfig::default().pool_size);
        assert_eq!(config.render, RenderConfig::default());
    }
}
