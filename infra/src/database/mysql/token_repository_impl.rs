//! MySQL implementation of the TokenRepository trait.
//!
//! Every operation runs on one SQLx transaction. The active record of a user
//! is read with `SELECT ... FOR UPDATE`, and the unique index on the
//! generated `active_user_id` column rejects a second non-revoked record for
//! the same user even when writers in other processes race.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Row, Transaction};
use uuid::Uuid;

use sl_core::domain::entities::token::{NewRefreshToken, RefreshTokenRecord};
use sl_core::errors::DomainError;
use sl_core::repositories::{TokenRepository, TokenTransaction};

use super::errors::{map_insert_error, storage_error};

const RECORD_COLUMNS: &str = "id, jti, token, user_id, created_at, expires_at, revoked";

/// MySQL implementation of TokenRepository
#[derive(Clone)]
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    ///
    /// # Arguments
    /// * `pool` - MySQL connection pool from SQLx
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    type Transaction = MySqlTokenTransaction;

    async fn begin(&self) -> Result<Self::Transaction, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| storage_error("begin transaction", e))?;

        Ok(MySqlTokenTransaction { tx })
    }
}

/// Open MySQL transaction; rolled back by SQLx when dropped uncommitted
pub struct MySqlTokenTransaction {
    tx: Transaction<'static, MySql>,
}

/// Convert database row to RefreshTokenRecord entity
fn row_to_record(row: &MySqlRow) -> Result<RefreshTokenRecord, DomainError> {
    let column = |name: &str, e: sqlx::Error| DomainError::Internal {
        message: format!("Failed to get {}: {}", name, e),
    };

    let user_id: String = row.try_get("user_id").map_err(|e| column("user_id", e))?;

    Ok(RefreshTokenRecord {
        id: row.try_get("id").map_err(|e| column("id", e))?,
        jti: row.try_get("jti").map_err(|e| column("jti", e))?,
        token: row.try_get("token").map_err(|e| column("token", e))?,
        user_id: Uuid::parse_str(&user_id).map_err(|e| DomainError::Internal {
            message: format!("Invalid user UUID: {}", e),
        })?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(|e| column("created_at", e))?,
        expires_at: row
            .try_get::<DateTime<Utc>, _>("expires_at")
            .map_err(|e| column("expires_at", e))?,
        revoked: row.try_get("revoked").map_err(|e| column("revoked", e))?,
    })
}

#[async_trait]
impl TokenTransaction for MySqlTokenTransaction {
    async fn find_active_for_user(
        &mut self,
        user_id: Uuid,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens \
             WHERE user_id = ? AND revoked = FALSE \
             ORDER BY id DESC LIMIT 1 FOR UPDATE",
            RECORD_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(user_id.to_string())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| storage_error("find active refresh token", e))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn find_by_jti_and_user(
        &mut self,
        jti: &str,
        user_id: Uuid,
    ) -> Result<Option<RefreshTokenRecord>, DomainError> {
        let query = format!(
            "SELECT {} FROM refresh_tokens WHERE jti = ? AND user_id = ? FOR UPDATE",
            RECORD_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(jti)
            .bind(user_id.to_string())
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| storage_error("find refresh token", e))?;

        row.as_ref().map(row_to_record).transpose()
    }

    async fn insert(&mut self, token: NewRefreshToken) -> Result<RefreshTokenRecord, DomainError> {
        let created_at = Utc::now();

        let query = r#"
            INSERT INTO refresh_tokens (
                jti, token, user_id, created_at, expires_at, revoked
            ) VALUES (?, ?, ?, ?, ?, FALSE)
        "#;

        let result = sqlx::query(query)
            .bind(&token.jti)
            .bind(&token.token)
            .bind(token.user_id.to_string())
            .bind(created_at)
            .bind(token.expires_at)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| map_insert_error(e, &token.jti))?;

        let id = i64::try_from(result.last_insert_id()).map_err(|_| DomainError::Internal {
            message: "Refresh token id out of range".to_string(),
        })?;

        Ok(token.into_record(id, created_at))
    }

    async fn mark_revoked(&mut self, record: &RefreshTokenRecord) -> Result<(), DomainError> {
        sqlx::query("UPDATE refresh_tokens SET revoked = TRUE WHERE id = ?")
            .bind(record.id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| storage_error("revoke refresh token", e))?;

        Ok(())
    }

    async fn commit(self) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| storage_error("commit refresh token changes", e))
    }
}
