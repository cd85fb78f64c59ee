//! API server configuration.
//!
//! Loaded from environment variables with fallback to defaults.

use std::env;
use std::net::SocketAddr;
use std::str::FromStr;

use ordo_db::DbConfig;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Bind address
    pub http_host: String,

    /// Bind port
    pub http_port: u16,

    /// sqlx SQLite URL
    pub database_url: String,

    /// Pool size
    pub db_max_connections: u32,

    pub log: LogConfig,
}

/// Logging configuration, consumed by [`crate::logging::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Default filter directive; `RUST_LOG` takes precedence when set
    pub level: String,

    /// JSON lines instead of human-readable output
    pub json: bool,

    /// Directory for the daily rolling log file; console only when unset
    pub dir: Option<String>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
            json: false,
            dir: None,
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let config = ApiConfig {
            http_host: lookup("HTTP_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),

            http_port: parse_or(&lookup, "HTTP_PORT", 8080)?,

            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| "sqlite://ordo.db".to_string()),

            db_max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?,

            log: LogConfig {
                level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
                json: parse_or(&lookup, "LOG_JSON", false)?,
                dir: lookup("LOG_DIR").filter(|d| !d.trim().is_empty()),
            },
        };

        if config.db_max_connections == 0 {
            return Err(ConfigError::InvalidValue("DB_MAX_CONNECTIONS".to_string()));
        }

        Ok(config)
    }

    /// Socket address to bind.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.http_host, self.http_port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("HTTP_HOST".to_string()))
    }

    /// Pool settings. Migrations run separately so a failure can be logged
    /// without aborting startup.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_url)
            .max_connections(self.db_max_connections)
            .run_migrations(false)
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue(key.to_string())),
        None => Ok(default),
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.http_host, "0.0.0.0");
        assert_eq!(config.http_port, 8080);
        assert_eq!(config.database_url, "sqlite://ordo.db");
        assert_eq!(config.db_max_connections, 5);
        assert_eq!(config.log, LogConfig::default());
        assert_eq!(config.bind_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("HTTP_PORT", "9000"),
            ("DATABASE_URL", "sqlite::memory:"),
            ("LOG_JSON", "true"),
            ("LOG_DIR", "/var/log/ordo"),
        ])
        .unwrap();

        assert_eq!(config.http_port, 9000);
        assert!(config.log.json);
        assert_eq!(config.log.dir.as_deref(), Some("/var/log/ordo"));
        assert!(!config.db_config().run_migrations);
    }

    #[test]
    fn test_invalid_values() {
        let err = load(&[("HTTP_PORT", "eighty")]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid value for HTTP_PORT");

        assert!(load(&[("DB_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[("LOG_JSON", "maybe")]).is_err());
        assert!(load(&[("HTTP_HOST", "not a host")]).unwrap().bind_addr().is_err());
    }
}
