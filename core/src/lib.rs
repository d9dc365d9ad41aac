//! # Shortlinks Core
//!
//! Core business logic and domain layer for the Shortlinks authentication
//! subsystem. This crate contains domain entities, the token codec, the
//! token-pair issuing service, repository interfaces with in-memory
//! implementations, and the error types shared by the outer layers.

pub mod domain;
pub mod errors;
pub mod repositories;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use repositories::*;
pub use services::*;
