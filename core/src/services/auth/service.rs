//! Main auth service implementation

use chrono::Utc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::entities::token::{Claims, Identity, NewRefreshToken, TokenPair};
use crate::errors::{DomainError, TokenError};
use crate::repositories::{TokenRepository, TokenTransaction};

use super::codec::TokenCodec;
use super::config::AuthServiceConfig;
use super::locks::UserLocks;

/// Fresh identifiers tried before giving up on a `jti` collision
const MAX_JTI_ATTEMPTS: usize = 3;

/// Service issuing and rotating access/refresh token pairs
///
/// Every user has at most one non-revoked refresh token. Issuing a new pair
/// revokes the previous one and a refresh token can be exchanged only once.
pub struct AuthService<R: TokenRepository> {
    repository: R,
    config: AuthServiceConfig,
    access_codec: TokenCodec,
    refresh_codec: TokenCodec,
    user_locks: UserLocks,
}

impl<R: TokenRepository> AuthService<R> {
    /// Creates a new auth service instance
    ///
    /// # Arguments
    ///
    /// * `repository` - Refresh token store
    /// * `config` - Secrets, algorithm and lifetimes
    ///
    /// # Returns
    ///
    /// A new `AuthService`, or an error if the algorithm is not supported
    pub fn new(repository: R, config: AuthServiceConfig) -> Result<Self, DomainError> {
        let access_codec = TokenCodec::new(config.access_token_secret.as_bytes(), config.algorithm)?;
        let refresh_codec = TokenCodec::new(config.refresh_token_secret.as_bytes(), config.algorithm)?;

        Ok(Self {
            repository,
            config,
            access_codec,
            refresh_codec,
            user_locks: UserLocks::new(),
        })
    }

    pub fn config(&self) -> &AuthServiceConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Issues a new token pair, revoking the user's previous refresh token
    ///
    /// # Arguments
    ///
    /// * `identity` - Claims of an already authenticated user; `sub` must be a UUID
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - Both tokens; the refresh token is the user's only active one
    /// * `Err(DomainError)` - Nothing was changed in the store
    pub async fn issue(&self, identity: &Identity) -> Result<TokenPair, DomainError> {
        let user_id = Uuid::parse_str(&identity.sub).map_err(|_| DomainError::Validation {
            message: format!("Subject is not a user ID: {}", identity.sub),
        })?;

        let _lock = self.user_locks.acquire(user_id).await;
        let mut tx = self.repository.begin().await?;

        if let Some(active) = tx.find_active_for_user(user_id).await? {
            tx.mark_revoked(&active).await?;
            debug!(user_id = %user_id, jti = %active.jti, "Revoked previous refresh token");
        }

        let pair = self.issue_in_tx(&mut tx, identity, user_id).await?;
        tx.commit().await.map_err(|e| log_storage_failure(user_id, e))?;

        info!(user_id = %user_id, "Issued token pair");
        Ok(pair)
    }

    /// Exchanges a refresh token for a new pair
    ///
    /// The presented token is revoked and its replacement becomes the
    /// user's only active refresh token, atomically.
    ///
    /// # Returns
    ///
    /// * `Ok(TokenPair)` - The rotated pair
    /// * `Err(TokenError::TokenExpired)` - Refresh token past its expiry
    /// * `Err(TokenError::TokenInvalid)` - Not an authentic refresh token
    /// * `Err(TokenError::InvalidOrRevokedToken)` - Already used, superseded or unknown
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, DomainError> {
        let claims = self.refresh_codec.decode(refresh_token)?;
        let jti = claims.jti.as_deref().ok_or(TokenError::TokenInvalid)?;
        let user_id = claims.user_id().map_err(|_| TokenError::TokenInvalid)?;

        let _lock = self.user_locks.acquire(user_id).await;
        let mut tx = self.repository.begin().await?;

        let record = match tx.find_by_jti_and_user(jti, user_id).await? {
            Some(record) if !record.revoked => record,
            Some(_) => {
                warn!(user_id = %user_id, jti = %jti, "Revoked refresh token presented");
                return Err(TokenError::InvalidOrRevokedToken.into());
            }
            None => {
                warn!(user_id = %user_id, jti = %jti, "Unknown refresh token presented");
                return Err(TokenError::InvalidOrRevokedToken.into());
            }
        };

        tx.mark_revoked(&record).await?;

        // A login racing with this rotation may have left a newer active record.
        if let Some(active) = tx.find_active_for_user(user_id).await? {
            tx.mark_revoked(&active).await?;
        }

        let pair = self.issue_in_tx(&mut tx, &claims.identity(), user_id).await?;
        tx.commit().await.map_err(|e| log_storage_failure(user_id, e))?;

        info!(user_id = %user_id, jti = %jti, "Rotated refresh token");
        Ok(pair)
    }

    /// Checks an access token without touching the store
    pub fn verify_access_token(&self, access_token: &str) -> Result<Claims, DomainError> {
        Ok(self.access_codec.decode(access_token)?)
    }

    /// Mints and stores a refresh token, then mints the access token
    ///
    /// The caller has already revoked whatever was active and commits afterwards.
    async fn issue_in_tx(
        &self,
        tx: &mut R::Transaction,
        identity: &Identity,
        user_id: Uuid,
    ) -> Result<TokenPair, DomainError> {
        let refresh_token = self.store_refresh_token(tx, identity, user_id).await?;
        let access_token = self
            .access_codec
            .encode(identity, None, self.config.access_token_ttl)?;

        Ok(TokenPair::new(access_token, refresh_token))
    }

    async fn store_refresh_token(
        &self,
        tx: &mut R::Transaction,
        identity: &Identity,
        user_id: Uuid,
    ) -> Result<String, DomainError> {
        let ttl = self.config.refresh_token_ttl;

        for attempt in 1..=MAX_JTI_ATTEMPTS {
            let jti = Uuid::new_v4().to_string();
            let issued_at = Utc::now();
            let expires_at = issued_at.checked_add_signed(ttl).ok_or_else(|| {
                error!(user_id = %user_id, "Refresh token expiry is out of range");
                TokenError::TokenGenerationFailed
            })?;
            let token = self.refresh_codec.encode_at(identity, Some(&jti), issued_at, ttl)?;

            let new_token = NewRefreshToken {
                jti,
                token,
                user_id,
                expires_at,
            };

            match tx.insert(new_token).await {
                Ok(record) => {
                    debug!(user_id = %user_id, jti = %record.jti, "Stored refresh token");
                    return Ok(record.token);
                }
                Err(DomainError::Token(TokenError::DuplicateJti { jti })) => {
                    warn!(user_id = %user_id, jti = %jti, attempt, "Refresh token identifier collision");
                }
                Err(e) => return Err(log_storage_failure(user_id, e)),
            }
        }

        error!(user_id = %user_id, "Could not find an unused refresh token identifier");
        Err(TokenError::TokenGenerationFailed.into())
    }
}

fn log_storage_failure(user_id: Uuid, error: DomainError) -> DomainError {
    if let DomainError::Internal { message } = &error {
        error!(user_id = %user_id, error = %message, "Refresh token store failure");
    }
    error
}
