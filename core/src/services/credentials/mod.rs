//! Login credential verification
//!
//! Resolves a login (username or email) to a user and checks the password
//! against the stored bcrypt hash.

mod authenticator;


use async_trait::async_trait;

use crate::domain::entities::token::Identity;
use crate::errors::DomainError;

pub use authenticator::PasswordAuthenticator;

/// Turns login credentials into the identity tokens are issued for
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Verify a login/password pair
    ///
    /// # Returns
    /// * `Ok(Identity)` - Credentials match a user
    /// * `Err(DomainError::Auth(AuthError::InvalidCredentials))` - Unknown login or wrong password
    /// * `Err(DomainError)` - Lookup or hashing failure
    async fn authenticate(&self, login: &str, password: &str) -> Result<Identity, DomainError>;
}
