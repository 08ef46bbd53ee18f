//! Stockroom API configuration module.
//!
//! Configuration is loaded from environment variables with fallback to defaults.

use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use stockroom_core::StockPolicy;
use stockroom_db::DbConfig;

/// Stockroom API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockroomConfig {
    /// Address the HTTP server binds to
    pub http_host: String,

    /// HTTP server port
    pub http_port: u16,

    /// SQLite database file (`:memory:` for a throwaway database)
    pub database_path: PathBuf,

    /// Connection pool size
    pub db_max_connections: u32,

    /// Which line-items of a sale move stock
    pub stock_policy: StockPolicy,
}

impl StockroomConfig {
    /// Load configuration from environment variables.
    ///
    /// | variable             | default        |
    /// |----------------------|----------------|
    /// | `HTTP_HOST`          | `0.0.0.0`      |
    /// | `HTTP_PORT`          | `3000`         |
    /// | `DATABASE_PATH`      | `stockroom.db` |
    /// | `DB_MAX_CONNECTIONS` | `5`            |
    /// | `STOCK_POLICY`       | `first`        |
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = StockroomConfig {
            http_host: lookup("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            http_port: lookup("HTTP_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("HTTP_PORT".to_string()))?,

            database_path: lookup("DATABASE_PATH")
                .unwrap_or_else(|| "stockroom.db".to_string())
                .into(),

            db_max_connections: lookup("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|| "5".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()))?,

            stock_policy: lookup("STOCK_POLICY")
                .unwrap_or_else(|| "first".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidValue("STOCK_POLICY".to_string()))?,
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// `host:port` for the listener.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.http_host, self.http_port)
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        let config = DbConfig::new(self.database_path.clone());
        if config.is_in_memory() {
            return DbConfig::in_memory();
        }
        config.max_connections(self.db_max_connections)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}
