//! Per-user mutual exclusion for token issuance

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

type LockMap = DashMap<Uuid, Arc<Mutex<()>>>;

/// Async locks keyed by user ID
///
/// Holders for different users never contend. Entries are dropped once the
/// last holder or waiter for a user is gone.
#[derive(Clone, Default)]
pub struct UserLocks {
    locks: Arc<LockMap>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other task holds the lock for `user_id`
    pub async fn acquire(&self, user_id: Uuid) -> UserLockGuard {
        // Clone the mutex out so no map shard stays locked across the await.
        let lock = self.locks.entry(user_id).or_default().clone();
        let guard = lock.lock_owned().await;

        UserLockGuard {
            user_id,
            guard: Some(guard),
            locks: Arc::clone(&self.locks),
        }
    }

    /// Number of users with a live lock entry
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

/// Held lock for one user; released on drop
pub struct UserLockGuard {
    user_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
    locks: Arc<LockMap>,
}

impl UserLockGuard {
    pub fn user_id(&self) -> Uuid {
        self.user_id
    }
}

impl Drop for UserLockGuard {
    fn drop(&mut self) {
        // Release first so the guard's own reference no longer counts.
        self.guard.take();
        self.locks
            .remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}
