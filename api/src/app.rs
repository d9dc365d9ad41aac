//! Application factory
//!
//! Builds the Actix-web application around an `AppState`.

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    error::JsonPayloadError,
    web, App, Error, HttpRequest, HttpResponse,
};
use sl_core::repositories::TokenRepository;
use sl_core::services::CredentialVerifier;
use sl_shared::{error_codes, ErrorResponse};
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

use crate::errors::ApiError;
use crate::middleware::{AccessTokenVerifier, JwtAuth};
use crate::routes::{auth, users, AppState};

/// Create and configure the application with all dependencies
pub fn create_app<C, R>(
    app_state: web::Data<AppState<C, R>>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
>
where
    C: CredentialVerifier + 'static,
    R: TokenRepository + 'static,
{
    let verifier: Arc<dyn AccessTokenVerifier> = app_state.gateway.clone();

    App::new()
        .app_data(app_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(TracingLogger::default())
        .route("/health", web::get().to(health_check))
        .service(
            web::scope("/api")
                .service(
                    web::scope("/auth")
                        .route("/login", web::post().to(auth::login::<C, R>))
                        .route("/token/refresh", web::post().to(auth::refresh::<C, R>)),
                )
                .service(
                    web::scope("/users")
                        .wrap(JwtAuth::new(verifier))
                        .route("/me", web::get().to(users::me)),
                ),
        )
        .default_service(web::route().to(not_found))
}

fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    ApiError::BadRequest(format!("Invalid request body: {}", err)).into()
}

/// Health check endpoint handler
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": "shortlinks-auth",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::new(
        error_codes::NOT_FOUND,
        "The requested resource was not found",
    ))
}
