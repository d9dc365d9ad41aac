//! Token repository traits defining the interface for refresh token persistence.
//!
//! The store is a passive bookkeeping boundary: it enforces uniqueness of
//! `jti` and nothing else. Business rules (one active token per user,
//! single-use rotation) belong to `AuthService`.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::entities::token::{NewRefreshToken, RefreshTokenRecord};
use crate::errors::DomainError;

/// Repository trait for refresh token persistence
///
/// All reads and writes happen inside a [`TokenTransaction`] so that a
/// multi-step sequence either lands completely or not at all.
///
/// # Example
/// ```no_run
/// # use sl_core::repositories::{TokenRepository, TokenTransaction};
/// # use sl_core::errors::DomainError;
/// # use uuid::Uuid;
/// # async fn example(repo: &impl TokenRepository, user_id: Uuid) -> Result<(), DomainError> {
/// let mut tx = repo.begin().await?;
/// if let Some(active) = tx.find_active_for_user(user_id).await? {
///     tx.mark_revoked(&active).await?;
/// }
/// tx.commit().await?;
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Unit of work handed out by [`TokenRepository::begin`]
    type Transaction: TokenTransaction;

    /// Start a unit of work
    ///
    /// # Returns
    /// * `Ok(Transaction)` - An open transaction
    /// * `Err(DomainError)` - The store could not start one
    async fn begin(&self) -> Result<Self::Transaction, DomainError>;
}

/// Operations on refresh token records within one unit of work
///
/// Dropping a transaction without calling [`TokenTransaction::commit`]
/// discards every change made through it.
#[async_trait]
pub trait TokenTransaction: Send {
    /// Find the non-revoked record for a user, if any
    ///
    /// Expiry is not considered: an expired record that was never revoked
    /// still counts as the user's active record.
    ///
    /// # Returns
    /// * `Ok(Some(RefreshTokenRecord))` - The active record
    /// * `Ok(None)` - The user has no active record
    /// * `Err(DomainError)` - Storage failure
    async fn find_active_for_user(
        &mut self,
        user_id: Uuid,
    ) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Exact lookup by token identifier and owner
    ///
    /// # Returns
    /// * `Ok(Some(RefreshTokenRecord))` - Record found, revoked or not
    /// * `Ok(None)` - No record matches both `jti` and `user_id`
    /// * `Err(DomainError)` - Storage failure
    async fn find_by_jti_and_user(
        &mut self,
        jti: &str,
        user_id: Uuid,
    ) -> Result<Option<RefreshTokenRecord>, DomainError>;

    /// Persist a new record
    ///
    /// # Returns
    /// * `Ok(RefreshTokenRecord)` - The stored record with `id` and `created_at` assigned
    /// * `Err(DomainError::Token(TokenError::DuplicateJti))` - `jti` already used
    /// * `Err(DomainError)` - Any other storage failure
    async fn insert(&mut self, token: NewRefreshToken) -> Result<RefreshTokenRecord, DomainError>;

    /// Set `revoked = true` on a record
    ///
    /// Revoking an already revoked record succeeds without changes.
    async fn mark_revoked(&mut self, record: &RefreshTokenRecord) -> Result<(), DomainError>;

    /// Make every change of this transaction visible
    async fn commit(self) -> Result<(), DomainError>;
}
