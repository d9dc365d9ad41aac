//! Token-pair issuing service
//!
//! This module provides:
//! - Stateless JWT encoding and decoding (`TokenCodec`)
//! - Issuance and single-use rotation of access/refresh token pairs
//! - Per-user serialization of issuance (`UserLocks`)

mod codec;
mod config;
mod locks;
mod service;

#[cfg(test)]
mod tests;

pub use codec::TokenCodec;
pub use config::AuthServiceConfig;
pub use locks::{UserLockGuard, UserLocks};
pub use service::AuthService;
