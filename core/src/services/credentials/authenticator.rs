//! bcrypt-backed credential verifier

use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

use crate::domain::entities::token::Identity;
use crate::domain::entities::user::User;
use crate::errors::{AuthError, DomainError};
use crate::repositories::UserRepository;

use super::CredentialVerifier;

/// Well-formed cost-12 hash matching no password in use
pub(crate) const DUMMY_PASSWORD_HASH: &str =
    "$2b$12$CCCCCCCCCCCCCCCCCCCCC.E5YPO9kmyuRGyh0XouQYb4YMJKvyOeW";

/// Verifies passwords of users held in a `UserRepository`
pub struct PasswordAuthenticator<U: UserRepository> {
    users: Arc<U>,
}

impl<U: UserRepository> PasswordAuthenticator<U> {
    pub fn new(users: Arc<U>) -> Self {
        Self { users }
    }

    /// Logins containing `@` are treated as email addresses
    async fn find_user(&self, login: &str) -> Result<Option<User>, DomainError> {
        if login.contains('@') {
            self.users.find_by_email(login).await
        } else {
            self.users.find_by_username(login).await
        }
    }
}

#[async_trait]
impl<U: UserRepository> CredentialVerifier for PasswordAuthenticator<U> {
    async fn authenticate(&self, login: &str, password: &str) -> Result<Identity, DomainError> {
        let Some(user) = self.find_user(login).await? else {
            // Same bcrypt work as a real check, so both failures take as long.
            let _ = verify_password(password, DUMMY_PASSWORD_HASH).await;
            debug!("Login attempt for unknown user");
            return Err(AuthError::InvalidCredentials.into());
        };

        if !verify_password(password, &user.hashed_password).await? {
            debug!(user_id = %user.id, "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        Ok(Identity::new(user.id.to_string(), user.username))
    }
}

/// Runs bcrypt on the blocking pool, off the async workers
async fn verify_password(password: &str, hashed_password: &str) -> Result<bool, DomainError> {
    let password = password.to_owned();
    let hashed_password = hashed_password.to_owned();

    tokio::task::spawn_blocking(move || bcrypt::verify(password, &hashed_password))
        .await
        .map_err(|e| DomainError::internal(format!("Password check task failed: {}", e)))?
        .map_err(|e| DomainError::internal(format!("Stored password hash is unusable: {}", e)))
}
