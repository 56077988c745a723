//! Accounts API configuration module.
//!
//! Configuration is layered with the `config` crate, later layers winning:
//!
//! 1. Built-in defaults
//! 2. `accounts.toml` in the working directory (optional)
//! 3. `ACCOUNTS_*` environment variables (e.g. `ACCOUNTS_HTTP_PORT=9090`)

use accounts_db::DbConfig;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

/// Accounts API configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ApiConfig {
    /// Interface to listen on
    pub bind_address: String,

    /// HTTP server port
    pub http_port: u16,

    /// SQLite database file
    pub database_path: String,

    /// Pool size
    pub max_connections: u32,

    /// Apply embedded migrations at startup
    pub run_migrations: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            bind_address: "0.0.0.0".to_string(),
            http_port: 8080,
            database_path: "./data/accounts.db".to_string(),
            max_connections: 5,
            run_migrations: true,
        }
    }
}

impl ApiConfig {
    /// Load configuration from defaults, `accounts.toml` and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        let builder = Self::defaults()?
            .add_source(File::with_name("accounts").required(false))
            .add_source(Environment::with_prefix("ACCOUNTS").try_parsing(true));

        Self::from_builder(builder)
    }

    /// Load configuration from defaults overlaid with a TOML document.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let builder = Self::defaults()?.add_source(File::from_str(toml, FileFormat::Toml));
        Self::from_builder(builder)
    }

    fn defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
        let d = ApiConfig::default();
        Ok(Config::builder()
            .set_default("bind_address", d.bind_address)?
            .set_default("http_port", i64::from(d.http_port))?
            .set_default("database_path", d.database_path)?
            .set_default("max_connections", i64::from(d.max_connections))?
            .set_default("run_migrations", d.run_migrations)?)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: ApiConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_connections == 0 {
            return Err(ConfigError::InvalidValue("max_connections".to_string()));
        }
        if self.database_path.trim().is_empty() {
            return Err(ConfigError::MissingRequired("database_path".to_string()));
        }
        self.socket_addr()?;
        Ok(())
    }

    /// Address the HTTP server binds to.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_address, self.http_port)
            .parse()
            .map_err(|_| ConfigError::InvalidValue("bind_address".to_string()))
    }

    /// Database settings derived from this configuration.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.database_path)
            .max_connections(self.max_connections)
            .run_migrations(self.run_migrations)
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::from_toml_str("").unwrap();
        assert_eq!(config, ApiConfig::default());
        assert_eq!(config.socket_addr().unwrap().port(), 8080);
    }

    #[test]
    fn test_toml_overrides_defaults() {
        let config = ApiConfig::from_toml_str(
            r#"
            http_port = 9090
            database_path = "/var/lib/accounts/accounts.db"
            run_migrations = false
            "#,
        )
        .unwrap();

        assert_eq!(config.http_port, 9090);
        assert_eq!(config.database_path, "/var/lib/accounts/accounts.db");
        assert!(!config.run_migrations);
        assert_eq!(config.bind_address, "0.0.0.0");

        let db = config.db_config();
        assert_eq!(db.max_connections, 5);
        assert!(!db.run_migrations);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(matches!(
            ApiConfig::from_toml_str("max_connections = 0"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            ApiConfig::from_toml_str(r#"bind_address = "not an address""#),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            ApiConfig::from_toml_str(r#"http_port = "eighty""#),
            Err(ConfigError::Load(_))
        ));
    }
}
