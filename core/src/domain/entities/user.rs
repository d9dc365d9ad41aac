//! User entity as seen by the authentication subsystem.
//!
//! Registration and profile management live elsewhere; login only reads.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User entity representing a registered user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: Uuid,

    /// Unique username
    pub username: String,

    /// Unique email address
    pub email: String,

    /// bcrypt hash of the user's password
    #[serde(skip_serializing)]
    pub hashed_password: String,

    /// Whether the account is active
    pub is_active: bool,
}

impl User {
    /// Creates a new active user with an already hashed password
    pub fn new(username: impl Into<String>, email: impl Into<String>, hashed_password: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
            email: email.into(),
            hashed_password: hashed_password.into(),
            is_active: true,
        }
    }
}
