//! Business services containing domain logic and use cases.

pub mod auth;
pub mod credentials;

// Re-export commonly used types
pub use auth::{AuthService, AuthServiceConfig, TokenCodec, UserLockGuard, UserLocks};
pub use credentials::{CredentialVerifier, PasswordAuthenticator};
