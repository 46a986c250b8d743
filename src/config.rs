use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Deployment environment; production enables redaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    /// Only the literal `production` (case-insensitive) selects production
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("production") {
            Environment::Production
        } else {
            Environment::Development
        }
    }

    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("LISTEN_ADDR is not a valid socket address: {0}")]
    InvalidListenAddr(String),

    #[error("DATABASE_URL must start with postgres:// or postgresql://")]
    InvalidDatabaseUrl,

    #[error("DB_ACQUIRE_TIMEOUT_SECS must be at least 1 second")]
    InvalidAcquireTimeout,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: String,
    pub environment: Environment,
    pub database_url: Option<String>,
    pub db_acquire_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            listen_addr: lookup("LISTEN_ADDR").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            environment: lookup("APP_ENV")
                .map(|name| Environment::from_name(&name))
                .unwrap_or_default(),
            database_url: lookup("DATABASE_URL").filter(|url| !url.is_empty()),
            db_acquire_timeout_secs: lookup("DB_ACQUIRE_TIMEOUT_SECS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(5),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.listen_socket_addr()?;

        if let Some(url) = &self.database_url {
            if !url.starts_with("postgres://") && !url.starts_with("postgresql://") {
                return Err(ConfigError::InvalidDatabaseUrl);
            }
        }

        if self.db_acquire_timeout_secs == 0 {
            return Err(ConfigError::InvalidAcquireTimeout);
        }

        Ok(())
    }

    pub fn listen_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.listen_addr
            .parse()
            .map_err(|_| ConfigError::InvalidListenAddr(self.listen_addr.clone()))
    }
}
