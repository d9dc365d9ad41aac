//! Configuration for the token-pair issuing service

use chrono::Duration;
use jsonwebtoken::Algorithm;
use sl_shared::AuthConfig;
use std::str::FromStr;

use crate::errors::DomainError;

/// Configuration for the auth service
#[derive(Clone)]
pub struct AuthServiceConfig {
    /// Secret used to sign and verify access tokens
    pub access_token_secret: String,
    /// Secret used to sign and verify refresh tokens
    pub refresh_token_secret: String,
    /// Signing algorithm shared by both token kinds
    pub algorithm: Algorithm,
    /// Access token lifetime
    pub access_token_ttl: Duration,
    /// Refresh token lifetime
    pub refresh_token_ttl: Duration,
}

impl AuthServiceConfig {
    /// HS256 configuration with 15 minute access and 7 day refresh lifetimes
    pub fn new(access_token_secret: impl Into<String>, refresh_token_secret: impl Into<String>) -> Self {
        Self {
            access_token_secret: access_token_secret.into(),
            refresh_token_secret: refresh_token_secret.into(),
            algorithm: Algorithm::HS256,
            access_token_ttl: Duration::minutes(15),
            refresh_token_ttl: Duration::days(7),
        }
    }

    /// Builds the service configuration from the loaded application settings
    ///
    /// # Returns
    ///
    /// * `Ok(AuthServiceConfig)` - Ready to hand to `AuthService::new`
    /// * `Err(DomainError::Validation)` - Unknown or non-HMAC algorithm name,
    ///   or a lifetime that does not fit a `Duration`
    pub fn from_auth_config(config: &AuthConfig) -> Result<Self, DomainError> {
        let algorithm = parse_hmac_algorithm(&config.signing_algorithm)?;

        Ok(Self {
            access_token_secret: config.access_token_secret.clone(),
            refresh_token_secret: config.refresh_token_secret.clone(),
            algorithm,
            access_token_ttl: ttl_from_seconds("access", config.access_token_ttl_seconds())?,
            refresh_token_ttl: ttl_from_seconds("refresh", config.refresh_token_ttl_seconds())?,
        })
    }

    pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    pub fn with_access_token_ttl(mut self, ttl: Duration) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    pub fn with_refresh_token_ttl(mut self, ttl: Duration) -> Self {
        self.refresh_token_ttl = ttl;
        self
    }
}

impl std::fmt::Debug for AuthServiceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthServiceConfig")
            .field("access_token_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl", &self.access_token_ttl)
            .field("refresh_token_ttl", &self.refresh_token_ttl)
            .finish()
    }
}

fn ttl_from_seconds(kind: &str, seconds: Option<i64>) -> Result<Duration, DomainError> {
    seconds
        .and_then(Duration::try_seconds)
        .ok_or_else(|| DomainError::Validation {
            message: format!("The {} token lifetime is out of range", kind),
        })
}

/// Parses an algorithm name, accepting only the shared-secret family
pub(crate) fn parse_hmac_algorithm(name: &str) -> Result<Algorithm, DomainError> {
    let algorithm = Algorithm::from_str(name).map_err(|_| DomainError::Validation {
        message: format!("Unknown signing algorithm: {}", name),
    })?;

    ensure_hmac(algorithm)?;
    Ok(algorithm)
}

pub(crate) fn ensure_hmac(algorithm: Algorithm) -> Result<(), DomainError> {
    match algorithm {
        Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512 => Ok(()),
        other => Err(DomainError::Validation {
            message: format!("Signing algorithm {:?} needs a key pair; only HS256, HS384 and HS512 are supported", other),
        }),
    }
}
