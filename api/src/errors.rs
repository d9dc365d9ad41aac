//! API error type and its HTTP rendering
//!
//! Domain errors are translated per operation: the same `TokenExpired`
//! means "refresh token expired" on the refresh endpoint and "access token
//! expired" behind the access-token middleware.

use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use sl_core::errors::{AuthError, DomainError, TokenError};
use sl_shared::{error_codes, ErrorResponse};
use tracing::error;
use validator::ValidationErrors;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid login or password")]
    InvalidCredentials,

    #[error("Refresh token expired")]
    RefreshTokenExpired,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Invalid or revoked refresh token")]
    RevokedRefreshToken,

    #[error("Access token expired")]
    AccessTokenExpired,

    #[error("Invalid access token")]
    InvalidAccessToken,

    #[error("Validation failed")]
    Validation(#[from] ValidationErrors),

    /// Unparsable request body
    #[error("{0}")]
    BadRequest(String),

    #[error("An internal error occurred")]
    Internal,
}

impl ApiError {
    /// Outcome of a failed login
    pub fn from_login_error(error: DomainError) -> Self {
        match error {
            DomainError::Auth(AuthError::InvalidCredentials) => ApiError::InvalidCredentials,
            other => Self::internal(other),
        }
    }

    /// Outcome of a failed refresh
    pub fn from_refresh_error(error: DomainError) -> Self {
        match error {
            DomainError::Token(TokenError::TokenExpired) => ApiError::RefreshTokenExpired,
            DomainError::Token(TokenError::TokenInvalid) => ApiError::InvalidRefreshToken,
            DomainError::Token(TokenError::InvalidOrRevokedToken) => ApiError::RevokedRefreshToken,
            other => Self::internal(other),
        }
    }

    /// Outcome of a rejected access token
    pub fn from_access_error(error: DomainError) -> Self {
        match error {
            DomainError::Token(TokenError::TokenExpired) => ApiError::AccessTokenExpired,
            DomainError::Token(_) => ApiError::InvalidAccessToken,
            other => Self::internal(other),
        }
    }

    fn internal(error: DomainError) -> Self {
        error!(error = %error, "Request failed with an unexpected error");
        ApiError::Internal
    }

    /// Error code placed in the response body
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidCredentials => error_codes::INVALID_CREDENTIALS,
            ApiError::RefreshTokenExpired => error_codes::REFRESH_TOKEN_EXPIRED,
            ApiError::InvalidRefreshToken | ApiError::RevokedRefreshToken => {
                error_codes::INVALID_REFRESH_TOKEN
            }
            ApiError::AccessTokenExpired => error_codes::ACCESS_TOKEN_EXPIRED,
            ApiError::InvalidAccessToken => error_codes::INVALID_ACCESS_TOKEN,
            ApiError::Validation(_) | ApiError::BadRequest(_) => error_codes::VALIDATION_ERROR,
            ApiError::Internal => error_codes::INTERNAL_ERROR,
        }
    }

    fn is_access_token_error(&self) -> bool {
        matches!(self, ApiError::AccessTokenExpired | ApiError::InvalidAccessToken)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::UNAUTHORIZED,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut body = ErrorResponse::new(self.code(), self.to_string());

        if let ApiError::Validation(errors) = self {
            for (field, field_errors) in errors.field_errors() {
                let codes: Vec<String> = field_errors.iter().map(|e| e.code.to_string()).collect();
                body = body.add_detail(field.to_string(), codes);
            }
        }

        let mut response = HttpResponse::build(self.status_code());
        if self.is_access_token_error() {
            response.insert_header((WWW_AUTHENTICATE, "Bearer"));
        }
        response.json(body)
    }
}
