//! Token entities for JWT-based authentication.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token type reported alongside every issued pair
pub const TOKEN_TYPE_BEARER: &str = "bearer";

/// Identity claims supplied by an already-authenticated caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Subject (user ID in string form)
    pub sub: String,

    /// Username at the time of issuance
    pub username: String,
}

impl Identity {
    pub fn new(sub: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            sub: sub.into(),
            username: username.into(),
        }
    }
}

/// Claims structure for JWT payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,

    /// Username of the subject
    pub username: String,

    /// Issued at, UTC epoch seconds
    pub iat: i64,

    /// Expiration, UTC epoch seconds
    pub exp: i64,

    /// JWT ID, present on refresh tokens only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jti: Option<String>,
}

impl Claims {
    /// Gets the user ID from the claims
    ///
    /// # Returns
    ///
    /// `Ok(Uuid)` if the subject can be parsed as a UUID, `Err` otherwise
    pub fn user_id(&self) -> Result<Uuid, uuid::Error> {
        Uuid::parse_str(&self.sub)
    }

    /// The identity these claims were minted for
    pub fn identity(&self) -> Identity {
        Identity::new(self.sub.clone(), self.username.clone())
    }
}

/// Refresh token record stored in the database
///
/// `revoked` only ever moves from `false` to `true`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshTokenRecord {
    /// Internal identifier assigned by the store
    pub id: i64,

    /// Unique token identifier embedded in the refresh token
    pub jti: String,

    /// The encoded refresh token
    pub token: String,

    /// User this token belongs to
    pub user_id: Uuid,

    /// Timestamp when the token was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the record is invalid regardless of `revoked`
    pub expires_at: DateTime<Utc>,

    /// Whether the token has been revoked
    pub revoked: bool,
}

impl RefreshTokenRecord {
    /// Checks if the refresh token has expired
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Active means not revoked and not expired
    pub fn is_active(&self) -> bool {
        !self.revoked && !self.is_expired()
    }

    /// Revokes the refresh token
    pub fn revoke(&mut self) {
        self.revoked = true;
    }
}

/// Insert payload for a refresh token record; the store assigns `id` and `created_at`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRefreshToken {
    pub jti: String,
    pub token: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

impl NewRefreshToken {
    /// Materializes the record as the store will hold it
    pub fn into_record(self, id: i64, created_at: DateTime<Utc>) -> RefreshTokenRecord {
        RefreshTokenRecord {
            id,
            jti: self.jti,
            token: self.token,
            user_id: self.user_id,
            created_at,
            expires_at: self.expires_at,
            revoked: false,
        }
    }
}

/// Token pair returned to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// JWT access token
    pub access_token: String,

    /// JWT refresh token
    pub refresh_token: String,

    /// Always "bearer"
    pub token_type: String,
}

impl TokenPair {
    pub fn new(access_token: String, refresh_token: String) -> Self {
        Self {
            access_token,
            refresh_token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
        }
    }
}
