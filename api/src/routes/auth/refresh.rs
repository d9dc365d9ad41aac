use actix_web::{web, HttpResponse};

use sl_core::repositories::TokenRepository;
use sl_core::services::CredentialVerifier;

use crate::dto::RefreshRequest;
use crate::errors::ApiError;
use crate::routes::AppState;

/// Handler for POST /api/auth/token/refresh
///
/// Exchanges a refresh token for a new pair. The presented token is
/// revoked; presenting it again fails.
///
/// # Request Body
///
/// ```json
/// {
///     "refresh_token": "eyJ..."
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Empty refresh token
/// - 401 Unauthorized: "Refresh token expired", "Invalid refresh token"
///   or "Invalid or revoked refresh token"
pub async fn refresh<C, R>(
    state: web::Data<AppState<C, R>>,
    request: web::Json<RefreshRequest>,
) -> Result<HttpResponse, ApiError>
where
    C: CredentialVerifier + 'static,
    R: TokenRepository + 'static,
{
    let response = state.gateway.refresh(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
