//! Authentication configuration

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Longest accepted access token lifetime (one day)
pub const MAX_ACCESS_TOKEN_TTL_MINUTES: i64 = 24 * 60;

/// Longest accepted refresh token lifetime (one year)
pub const MAX_REFRESH_TOKEN_TTL_DAYS: i64 = 365;

/// Token signing configuration
///
/// Every field is required. A process missing any of them refuses to start.
#[derive(Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    /// Secret used to sign access tokens
    pub access_token_secret: String,

    /// Secret used to sign refresh tokens
    pub refresh_token_secret: String,

    /// JWT signing algorithm name (e.g. "HS256")
    pub signing_algorithm: String,

    /// Access token lifetime in minutes
    pub access_token_ttl_minutes: i64,

    /// Refresh token lifetime in days
    pub refresh_token_ttl_days: i64,
}

impl AuthConfig {
    /// Checks the values that deserialization alone cannot
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.access_token_secret.is_empty() {
            return Err(ConfigError::Invalid {
                key: "access_token_secret",
                reason: "must not be empty".to_string(),
            });
        }
        if self.refresh_token_secret.is_empty() {
            return Err(ConfigError::Invalid {
                key: "refresh_token_secret",
                reason: "must not be empty".to_string(),
            });
        }
        check_ttl(
            "access_token_ttl_minutes",
            self.access_token_ttl_minutes,
            MAX_ACCESS_TOKEN_TTL_MINUTES,
        )?;
        check_ttl(
            "refresh_token_ttl_days",
            self.refresh_token_ttl_days,
            MAX_REFRESH_TOKEN_TTL_DAYS,
        )?;
        Ok(())
    }

    /// Access token lifetime in seconds, `None` on overflow
    pub fn access_token_ttl_seconds(&self) -> Option<i64> {
        self.access_token_ttl_minutes.checked_mul(60)
    }

    /// Refresh token lifetime in seconds, `None` on overflow
    pub fn refresh_token_ttl_seconds(&self) -> Option<i64> {
        self.refresh_token_ttl_days.checked_mul(86400)
    }
}

fn check_ttl(key: &'static str, value: i64, max: i64) -> Result<(), ConfigError> {
    if value <= 0 {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("must be positive, got {}", value),
        });
    }
    if value > max {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("must be at most {}, got {}", max, value),
        });
    }
    Ok(())
}

// Secrets stay out of logs.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("access_token_secret", &"<redacted>")
            .field("refresh_token_secret", &"<redacted>")
            .field("signing_algorithm", &self.signing_algorithm)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("refresh_token_ttl_days", &self.refresh_token_ttl_days)
            .finish()
    }
}
