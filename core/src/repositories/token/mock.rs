//! In-memory implementation of TokenRepository
//!
//! Compiled for tests and for dependents enabling the `mock` feature.
//! A transaction holds the store's write lock from `begin` until it is
//! committed or dropped, so transactions are fully serialized.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};
use uuid::Uuid;

use crate::domain::entities::token::{NewRefreshToken, RefreshTokenRecord};
use crate::errors::{DomainError, TokenError};

use super::r#trait::{TokenRepository, TokenTransaction};

#[derive(Debug, Clone, Default)]
struct StoreState {
    records: Vec<RefreshTokenRecord>,
    next_id: i64,
}

/// Scripted insert failures for exercising error paths
#[derive(Debug, Default)]
struct Faults {
    duplicate_inserts: AtomicUsize,
    failing_inserts: AtomicUsize,
}

impl Faults {
    fn take(counter: &AtomicUsize) -> bool {
        counter
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Mock token repository backed by a vector of records
#[derive(Clone, Default)]
pub struct MockTokenRepository {
    state: Arc<RwLock<StoreState>>,
    faults: Arc<Faults>,
}

impl MockTokenRepository {
    /// Create a new empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` inserts fail with `DuplicateJti`
    pub fn fail_inserts_with_duplicate_jti(&self, count: usize) {
        self.faults.duplicate_inserts.store(count, Ordering::SeqCst);
    }

    /// Make the next `count` inserts fail with a storage error
    pub fn fail_inserts(&self, count: usize) {
        self.faults.failing_inserts.store(count, Ordering::SeqCst);
    }

    /// All committed records of a user, oldest first
    pub async fn records_for_user(&self, user_id: Uuid) -> Vec<RefreshTokenRecord> {
        let state = self.state.read().await;
        state
            .records
            .iter()
            .filter(|r| r.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Number of committed non-revoked records of a user
    pub async fn active_count(&self, user_id: Uuid) -> usize {
        let state = self.state.read().await;
        state
            .records
            .iter()
            .filter(|r| r.user_id == user_id && !r.revoked)
            .count()
    }

    /// Committed record by jti
    pub async fn find_by_jti(&self, jti: &str) -> Option<RefreshTokenRecord> {
        let state = self.state.read().await;
        state.records.iter().find(|r| r.jti == jti).cloned()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    type Transaction = MockTokenTransaction;

    async fn begin(&self) -> Result<Self::Transaction, DomainError> {
        let guard = Arc::clone(&self.state).write_owned().await;
        let working = (*guard).clone();
        Ok(MockTokenTransaction {
            guard,
            working,
            faults: Arc::clone(&self.faults),
        })
    }
}

/// Transaction over the in-memory store
///
/// Changes go to a private working copy that replaces the shared state on commit.
pub struct MockTokenTransaction {
    guard: OwnedRwLockWriteGuard<StoreState>,
    working: StoreState,
    faults: Arc<Faults>,
}

#[async_trait]
impl TokenTransaction for MockTokenTransaction {
    async fn find_active_for_user(
        &mut self,
        user_id: Uuid,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        Ok(self
            .working
            .records
            .iter()
            .rev()
            .find(|r| r.user_id == user_id && !r.revoked)
            .cloned())
    }

    async fn find_by_jti_and_user(
        &mut self,
        jti: &str,
        user_id: Uuid,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        Ok(self
            .working
            .records
            .iter()
            .find(|r| r.jti == jti && r.user_id == user_id)
            .cloned())
    }

    async fn insert(&mut self, token: NewRefreshToken) -> Result<RefreshTokenRecord, DomainError> {
        if Faults::take(&self.faults.failing_inserts) {
            return Err(DomainError::internal("Failed to save refresh token: injected failure"));
        }
        if Faults::take(&self.faults.duplicate_inserts)
            || self.working.records.iter().any(|r| r.jti == token.jti)
        {
            return Err(TokenError::DuplicateJti { jti: token.jti }.into());
        }
        if self.working.records.iter().any(|r| r.token == token.token) {
            return Err(DomainError::Validation {
                message: "Token already exists".to_string(),
            });
        }

        self.working.next_id += 1;
        let record = token.into_record(self.working.next_id, Utc::now());
        self.working.records.push(record.clone());
        Ok(record)
    }

    async fn mark_revoked(&mut self, record: &RefreshTokenRecord) -> Result<(), DomainError> {
        if let Some(stored) = self.working.records.iter_mut().find(|r| r.id == record.id) {
            stored.revoke();
        }
        Ok(())
    }

    async fn commit(mut self) -> Result<(), DomainError> {
        *self.guard = std::mem::take(&mut self.working);
        Ok(())
    }
}
