//! Boundary operations behind the auth endpoints
//!
//! The gateway validates requests, calls into the core services and turns
//! every failure into an [`ApiError`] with a fixed status and message.

use sl_core::domain::entities::token::Claims;
use sl_core::repositories::TokenRepository;
use sl_core::services::{AuthService, CredentialVerifier};
use tracing::info;
use validator::Validate;

use crate::dto::{LoginRequest, RefreshRequest, TokenResponse};
use crate::errors::ApiError;

/// Auth gateway over a credential verifier and the token-pair service
pub struct AuthGateway<C, R>
where
    C: CredentialVerifier,
    R: TokenRepository,
{
    credentials: C,
    auth_service: AuthService<R>,
}

impl<C, R> AuthGateway<C, R>
where
    C: CredentialVerifier,
    R: TokenRepository,
{
    pub fn new(credentials: C, auth_service: AuthService<R>) -> Self {
        Self {
            credentials,
            auth_service,
        }
    }

    pub fn auth_service(&self) -> &AuthService<R> {
        &self.auth_service
    }

    /// Verifies credentials and issues a fresh token pair
    ///
    /// Unknown user and wrong password produce the same `InvalidCredentials`.
    pub async fn login(&self, request: LoginRequest) -> Result<TokenResponse, ApiError> {
        request.validate()?;

        let identity = self
            .credentials
            .authenticate(&request.login, &request.password)
            .await
            .map_err(ApiError::from_login_error)?;

        let pair = self
            .auth_service
            .issue(&identity)
            .await
            .map_err(ApiError::from_login_error)?;

        info!(user_id = %identity.sub, "User logged in");
        Ok(pair.into())
    }

    /// Exchanges a refresh token for a new pair
    pub async fn refresh(&self, request: RefreshRequest) -> Result<TokenResponse, ApiError> {
        request.validate()?;

        let pair = self
            .auth_service
            .refresh(&request.refresh_token)
            .await
            .map_err(ApiError::from_refresh_error)?;

        Ok(pair.into())
    }

    /// Validates an access token presented to a protected endpoint
    pub fn authenticate(&self, access_token: &str) -> Result<Claims, ApiError> {
        self.auth_service
            .verify_access_token(access_token)
            .map_err(ApiError::from_access_error)
    }
}
