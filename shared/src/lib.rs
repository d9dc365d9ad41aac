//! Shared utilities and common types for the Shortlinks server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded once at startup
//! - The error response body returned by every API endpoint

pub mod config;
pub mod errors;

// Re-export commonly used items at crate root
pub use config::{AppConfig, AuthConfig, ConfigError, DatabaseConfig, ServerConfig};
pub use errors::{error_codes, ErrorResponse};
