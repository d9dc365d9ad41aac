//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the Shortlinks
//! authentication subsystem. It provides the MySQL connection pool and the
//! SQLx implementations of the repository traits defined in `sl_core`.
//!
//! The schema the repositories expect lives in `migrations/`.

// Re-export core types for convenience
pub use sl_core::errors::*;

/// Database module - MySQL implementations using SQLx
pub mod database;

pub use database::{DatabasePool, MySqlTokenRepository, MySqlTokenTransaction, MySqlUserRepository};

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// Database connection error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
