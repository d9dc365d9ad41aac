use actix_web::{web, HttpResponse};

use sl_core::repositories::TokenRepository;
use sl_core::services::CredentialVerifier;

use crate::dto::LoginRequest;
use crate::errors::ApiError;
use crate::routes::AppState;

/// Handler for POST /api/auth/login
///
/// # Request Body
///
/// ```json
/// {
///     "login": "alice or alice@example.com",
///     "password": "string"
/// }
/// ```
///
/// # Response
///
/// ## Success (200 OK)
/// ```json
/// {
///     "access_token": "eyJ...",
///     "refresh_token": "eyJ...",
///     "token_type": "bearer"
/// }
/// ```
///
/// ## Errors
/// - 400 Bad Request: Empty login or password
/// - 401 Unauthorized: Invalid login or password
pub async fn login<C, R>(
    state: web::Data<AppState<C, R>>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError>
where
    C: CredentialVerifier + 'static,
    R: TokenRepository + 'static,
{
    let response = state.gateway.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
