//! Access-token middleware for protecting API endpoints.
//!
//! Extracts the bearer token from the Authorization header, verifies it and
//! injects an [`AuthContext`] into the request extensions. Rejected requests
//! never reach the wrapped service; they are answered with the `ApiError`
//! response, which carries `WWW-Authenticate: Bearer`.

use actix_web::{
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header::AUTHORIZATION,
    Error, FromRequest, HttpMessage, HttpRequest, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use sl_core::domain::entities::token::Claims;
use sl_core::repositories::TokenRepository;
use sl_core::services::CredentialVerifier;
use std::{
    future::{ready, Ready},
    rc::Rc,
    sync::Arc,
    task::{Context, Poll},
};
use uuid::Uuid;

use crate::errors::ApiError;
use crate::gateway::AuthGateway;

/// Authenticated caller, taken from access-token claims
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub username: String,
}

impl AuthContext {
    pub fn from_claims(claims: Claims) -> Result<Self, ApiError> {
        let user_id = claims.user_id().map_err(|_| ApiError::InvalidAccessToken)?;
        Ok(Self {
            user_id,
            username: claims.username,
        })
    }
}

/// Anything able to check an access token
pub trait AccessTokenVerifier: Send + Sync {
    fn authenticate(&self, access_token: &str) -> Result<Claims, ApiError>;
}

impl<C, R> AccessTokenVerifier for AuthGateway<C, R>
where
    C: CredentialVerifier,
    R: TokenRepository,
{
    fn authenticate(&self, access_token: &str) -> Result<Claims, ApiError> {
        AuthGateway::authenticate(self, access_token)
    }
}

/// Access-token middleware factory
#[derive(Clone)]
pub struct JwtAuth {
    verifier: Arc<dyn AccessTokenVerifier>,
}

impl JwtAuth {
    pub fn new(verifier: Arc<dyn AccessTokenVerifier>) -> Self {
        Self { verifier }
    }
}

impl<S, B> Transform<S, ServiceRequest> for JwtAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = JwtAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(JwtAuthMiddleware {
            service: Rc::new(service),
            verifier: Arc::clone(&self.verifier),
        }))
    }
}

/// Access-token middleware service
pub struct JwtAuthMiddleware<S> {
    service: Rc<S>,
    verifier: Arc<dyn AccessTokenVerifier>,
}

impl<S, B> Service<ServiceRequest> for JwtAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let verifier = Arc::clone(&self.verifier);

        Box::pin(async move {
            let context = match authenticate_request(&req, verifier.as_ref()) {
                Ok(context) => context,
                Err(error) => {
                    let response = error.error_response();
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(context);
            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

fn authenticate_request(
    req: &ServiceRequest,
    verifier: &dyn AccessTokenVerifier,
) -> Result<AuthContext, ApiError> {
    // A missing token is reported exactly like a bad one.
    let token = extract_bearer_token(req).ok_or(ApiError::InvalidAccessToken)?;
    let claims = verifier.authenticate(&token)?;
    AuthContext::from_claims(claims)
}

/// Extracts Bearer token from Authorization header
fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
    req.headers()
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|s| s.to_string())
}

/// Extractor for required authentication
impl FromRequest for AuthContext {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut actix_web::dev::Payload) -> Self::Future {
        let result = req
            .extensions()
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| ApiError::InvalidAccessToken.into());

        ready(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        use actix_web::test;

        let req = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer test_token_123"))
            .to_srv_request();

        assert_eq!(extract_bearer_token(&req), Some("test_token_123".to_string()));

        let req_no_bearer = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "test_token_123"))
            .to_srv_request();

        assert_eq!(extract_bearer_token(&req_no_bearer), None);

        let req_empty = test::TestRequest::default()
            .insert_header((AUTHORIZATION, "Bearer "))
            .to_srv_request();

        assert_eq!(extract_bearer_token(&req_empty), None);

        let req_no_header = test::TestRequest::default().to_srv_request();
        assert_eq!(extract_bearer_token(&req_no_header), None);
    }

    #[test]
    fn test_context_requires_uuid_subject() {
        let claims = Claims {
            sub: "not-a-uuid".to_string(),
            username: "alice".to_string(),
            iat: 0,
            exp: 0,
            jti: None,
        };

        assert!(matches!(
            AuthContext::from_claims(claims),
            Err(ApiError::InvalidAccessToken)
        ));
    }
}
