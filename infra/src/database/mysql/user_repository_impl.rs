//! MySQL implementation of the UserRepository trait.

use async_trait::async_trait;
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};
use uuid::Uuid;

use sl_core::domain::entities::user::User;
use sl_core::errors::DomainError;
use sl_core::repositories::UserRepository;

use super::errors::storage_error;

/// MySQL implementation of UserRepository
#[derive(Clone)]
pub struct MySqlUserRepository {
    pool: MySqlPool,
}

impl MySqlUserRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: String) -> Result<Option<User>, DomainError> {
        let query = format!(
            "SELECT id, username, email, hashed_password, is_active FROM users WHERE {} = ?",
            column
        );

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| storage_error("find user", e))?;

        row.as_ref().map(row_to_user).transpose()
    }
}

fn row_to_user(row: &MySqlRow) -> Result<User, DomainError> {
    let column = |name: &str, e: sqlx::Error| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    };

    let id: String = row.try_get("id").map_err(|e| column("id", e))?;

    Ok(User {
        id: Uuid::parse_str(&id).map_err(|e| DomainError::Internal {
            message: format!("Invalid user UUID: {}", e),
        })?,
        username: row.try_get("username").map_err(|e| column("username", e))?,
        email: row.try_get("email").map_err(|e| column("email", e))?,
        hashed_password: row
            .try_get("hashed_password")
            .map_err(|e| column("hashed_password", e))?,
        is_active: row.try_get("is_active").map_err(|e| column("is_active", e))?,
    })
}

#[async_trait]
impl UserRepository for MySqlUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, DomainError> {
        self.find_one("username", username.to_string()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, DomainError> {
        self.find_one("email", email.to_string()).await
    }
}
