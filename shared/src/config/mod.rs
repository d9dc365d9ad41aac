//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `auth` - Token signing secrets, algorithm and lifetimes
//! - `database` - Database connection and pool configuration
//! - `server` - HTTP server bind address
//!
//! Every value is read from the process environment once at startup and
//! handed to the services that need it. Nothing in the workspace reads the
//! environment after `AppConfig::from_env` returns.

pub mod auth;
pub mod database;
pub mod server;

use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Re-export commonly used types
pub use auth::AuthConfig;
pub use database::DatabaseConfig;
pub use server::ServerConfig;

/// Startup configuration failures. All of them are fatal.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    #[error("Invalid configuration value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Token issuance configuration (required)
    pub auth: AuthConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// Server configuration
    pub server: ServerConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// Keys are matched case-insensitively, so `ACCESS_TOKEN_SECRET` feeds
    /// `access_token_secret`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let source = Config::builder()
            .add_source(Environment::default().try_parsing(true))
            .build()?;
        Self::from_config(&source)
    }

    /// Build the configuration from an already assembled `config::Config`
    pub fn from_config(source: &Config) -> Result<Self, ConfigError> {
        let auth: AuthConfig = source.clone().try_deserialize()?;
        auth.validate()?;

        let database: DatabaseConfig = source.clone().try_deserialize()?;
        let server: ServerConfig = source.clone().try_deserialize()?;

        Ok(Self {
            auth,
            database,
            server,
        })
    }
}
