//! User repository trait defining the read access login needs.
//!
//! User registration and profile updates are handled by the user
//! management side of the service; this trait only looks users up.

use async_trait::async_trait;

use crate::domain::entities::user::User;
use crate::errors::DomainError;

/// Repository trait for User lookups
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Find a user by username (exact match)
    ///
    /// # Returns
    /// * `Ok(Some(User))` - User found
    /// * `Ok(None)` - No such user
    /// * `Err(DomainError)` - Database error occurred
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError>;

    /// Find a user by email address (exact match)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError>;
}
