//! Endpoints for the authenticated user

use actix_web::HttpResponse;

use crate::dto::auth::CurrentUserResponse;
use crate::middleware::AuthContext;

/// Handler for GET /api/users/me
///
/// Answers from the access-token claims alone.
pub async fn me(auth: AuthContext) -> HttpResponse {
    HttpResponse::Ok().json(CurrentUserResponse {
        id: auth.user_id.to_string(),
        username: auth.username,
    })
}
