//! Domain-specific error types and error handling.

use thiserror::Error;

/// Token-related errors
///
/// `TokenExpired` and `TokenInvalid` are kept apart because callers answer
/// them with different messages.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Signature valid, `exp` in the past
    #[error("Token expired")]
    TokenExpired,

    /// Bad signature, malformed structure, algorithm mismatch or missing claims
    #[error("Invalid token")]
    TokenInvalid,

    /// Well-formed token with no matching active record (rotated, revoked or never issued)
    #[error("Invalid or revoked token")]
    InvalidOrRevokedToken,

    /// A refresh token record with this jti already exists
    #[error("Duplicate token identifier: {jti}")]
    DuplicateJti { jti: String },

    /// The store rejected a second active refresh token for one user
    #[error("Another active refresh token exists for this user")]
    ActiveTokenConflict,

    #[error("Token generation failed")]
    TokenGenerationFailed,
}

/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown user or wrong password; the two are never told apart
    #[error("Invalid login or password")]
    InvalidCredentials,
}

/// Core domain errors (general purpose)
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },

    // Bridge to specific error types
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Token(#[from] TokenError),
}

impl DomainError {
    /// Shorthand for storage and other unexpected failures
    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
