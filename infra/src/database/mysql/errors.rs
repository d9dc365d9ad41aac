//! Mapping of SQLx failures onto domain errors

use sl_core::errors::{DomainError, TokenError};

/// Unique index on `refresh_tokens.jti`
pub(crate) const JTI_INDEX: &str = "uq_refresh_tokens_jti";
/// Unique index on `refresh_tokens.token`
pub(crate) const TOKEN_INDEX: &str = "uq_refresh_tokens_token";
/// Unique index on the generated `active_user_id` column
pub(crate) const ACTIVE_USER_INDEX: &str = "uq_refresh_tokens_active_user";

/// Which unique index a duplicate-key error hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DuplicateKey {
    Jti,
    Token,
    ActiveUser,
    Other,
}

/// Reads the index name out of a MySQL "Duplicate entry ... for key ..." message
///
/// MySQL 8 prefixes the key with the table name, older servers do not.
pub(crate) fn classify_duplicate_key(message: &str) -> DuplicateKey {
    let Some((_, key)) = message.rsplit_once("for key") else {
        return DuplicateKey::Other;
    };
    let key = key.trim().trim_matches(|c| c == '\'' || c == '`');
    let index = key.rsplit('.').next().unwrap_or(key);

    match index {
        JTI_INDEX => DuplicateKey::Jti,
        TOKEN_INDEX => DuplicateKey::Token,
        ACTIVE_USER_INDEX => DuplicateKey::ActiveUser,
        _ => DuplicateKey::Other,
    }
}

/// Converts an insert failure, keeping uniqueness violations distinguishable
pub(crate) fn map_insert_error(error: sqlx::Error, jti: &str) -> DomainError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.is_unique_violation() {
            match classify_duplicate_key(db_error.message()) {
                DuplicateKey::Jti => {
                    return TokenError::DuplicateJti {
                        jti: jti.to_string(),
                    }
                    .into()
                }
                DuplicateKey::ActiveUser => return TokenError::ActiveTokenConflict.into(),
                DuplicateKey::Token => {
                    return DomainError::Validation {
                        message: "Token already exists".to_string(),
                    }
                }
                DuplicateKey::Other => {}
            }
        }
    }
    storage_error("save refresh token", error)
}

pub(crate) fn storage_error(action: &str, error: sqlx::Error) -> DomainError {
    DomainError::Internal {
        message: format!("Failed to {}: {}", action, error),
    }
}
