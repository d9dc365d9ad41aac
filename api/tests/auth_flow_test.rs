//! Integration tests for the login, refresh and current-user endpoints

use actix_web::{http::header, http::StatusCode, test, web};
use chrono::Duration;
use serde_json::{json, Value};
use std::sync::Arc;

use sl_api::{create_app, AppState, AuthGateway};
use sl_core::domain::entities::user::User;
use sl_core::repositories::{MockTokenRepository, MockUserRepository};
use sl_core::services::{AuthService, AuthServiceConfig, PasswordAuthenticator};

type TestState = AppState<PasswordAuthenticator<MockUserRepository>, MockTokenRepository>;

const PASSWORD: &str = "correct horse";

struct TestContext {
    state: web::Data<TestState>,
    tokens: MockTokenRepository,
    user: User,
}

async fn setup_with(config: AuthServiceConfig) -> TestContext {
    let users = MockUserRepository::new();
    let user = User::new("alice", "alice@example.com", bcrypt::hash(PASSWORD, 4).unwrap());
    users.insert(user.clone()).await;

    let tokens = MockTokenRepository::new();
    let auth_service = AuthService::new(tokens.clone(), config).unwrap();
    let gateway = AuthGateway::new(PasswordAuthenticator::new(Arc::new(users)), auth_service);

    TestContext {
        state: web::Data::new(AppState::new(gateway)),
        tokens,
        user,
    }
}

async fn setup() -> TestContext {
    setup_with(AuthServiceConfig::new("access-secret", "refresh-secret")).await
}

fn login_request(login: &str, password: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "login": login, "password": password }))
}

fn refresh_request(refresh_token: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/auth/token/refresh")
        .set_json(json!({ "refresh_token": refresh_token }))
}

fn me_request(access_token: Option<&str>) -> test::TestRequest {
    let request = test::TestRequest::get().uri("/api/users/me");
    match access_token {
        Some(token) => request.insert_header((header::AUTHORIZATION, format!("Bearer {}", token))),
        None => request,
    }
}

#[actix_web::test]
async fn test_login_returns_token_pair() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, login_request("alice", PASSWORD).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "bearer");
    assert!(!body["access_token"].as_str().unwrap().is_empty());
    assert!(!body["refresh_token"].as_str().unwrap().is_empty());
    assert_eq!(ctx.tokens.active_count(ctx.user.id).await, 1);
}

#[actix_web::test]
async fn test_login_by_email() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, login_request("alice@example.com", PASSWORD).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_login_failures_are_indistinguishable() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let unknown = test::call_service(&app, login_request("mallory", PASSWORD).to_request()).await;
    assert_eq!(unknown.status(), StatusCode::UNAUTHORIZED);
    let unknown: Value = test::read_body_json(unknown).await;

    let wrong = test::call_service(&app, login_request("alice", "battery staple").to_request()).await;
    assert_eq!(wrong.status(), StatusCode::UNAUTHORIZED);
    let wrong: Value = test::read_body_json(wrong).await;

    assert_eq!(unknown["error"], "INVALID_CREDENTIALS");
    assert_eq!(unknown["message"], "Invalid login or password");
    assert_eq!(unknown["error"], wrong["error"]);
    assert_eq!(unknown["message"], wrong["message"]);
    assert!(ctx.tokens.records_for_user(ctx.user.id).await.is_empty());
}

#[actix_web::test]
async fn test_login_validation() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, login_request("alice", "").to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
    assert!(body["details"]["password"].is_array());

    let malformed = test::TestRequest::post()
        .uri("/api/auth/login")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{\"login\": ")
        .to_request();
    let resp = test::call_service(&app, malformed).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "VALIDATION_ERROR");
}

#[actix_web::test]
async fn test_refresh_rotates_tokens() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, login_request("alice", PASSWORD).to_request()).await;
    let login: Value = test::read_body_json(resp).await;
    let old_refresh = login["refresh_token"].as_str().unwrap();

    let resp = test::call_service(&app, refresh_request(old_refresh).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let refreshed: Value = test::read_body_json(resp).await;

    assert_eq!(refreshed["token_type"], "bearer");
    assert_ne!(refreshed["refresh_token"].as_str().unwrap(), old_refresh);
    assert_eq!(ctx.tokens.active_count(ctx.user.id).await, 1);
}

#[actix_web::test]
async fn test_refresh_token_replay_is_rejected() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, login_request("alice", PASSWORD).to_request()).await;
    let login: Value = test::read_body_json(resp).await;
    let old_refresh = login["refresh_token"].as_str().unwrap();

    let first = test::call_service(&app, refresh_request(old_refresh).to_request()).await;
    assert_eq!(first.status(), StatusCode::OK);
    let rotated: Value = test::read_body_json(first).await;

    let replay = test::call_service(&app, refresh_request(old_refresh).to_request()).await;
    assert_eq!(replay.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(replay).await;
    assert_eq!(body["error"], "INVALID_REFRESH_TOKEN");
    assert_eq!(body["message"], "Invalid or revoked refresh token");

    // The rotated token is unaffected by the replay attempt.
    let next = test::call_service(
        &app,
        refresh_request(rotated["refresh_token"].as_str().unwrap()).to_request(),
    )
    .await;
    assert_eq!(next.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_new_login_supersedes_previous_refresh_token() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, login_request("alice", PASSWORD).to_request()).await;
    let first: Value = test::read_body_json(resp).await;
    let resp = test::call_service(&app, login_request("alice@example.com", PASSWORD).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(&app, refresh_request(first["refresh_token"].as_str().unwrap()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Invalid or revoked refresh token");
    assert_eq!(ctx.tokens.active_count(ctx.user.id).await, 1);
}

#[actix_web::test]
async fn test_expired_refresh_token() {
    let config = AuthServiceConfig::new("access-secret", "refresh-secret")
        .with_refresh_token_ttl(Duration::seconds(-1));
    let ctx = setup_with(config).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, login_request("alice", PASSWORD).to_request()).await;
    let login: Value = test::read_body_json(resp).await;

    let resp = test::call_service(&app, refresh_request(login["refresh_token"].as_str().unwrap()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "REFRESH_TOKEN_EXPIRED");
    assert_eq!(body["message"], "Refresh token expired");
}

#[actix_web::test]
async fn test_invalid_refresh_token() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, login_request("alice", PASSWORD).to_request()).await;
    let login: Value = test::read_body_json(resp).await;

    for token in [
        "garbage".to_string(),
        // Signed with the access secret, not the refresh secret.
        login["access_token"].as_str().unwrap().to_string(),
    ] {
        let resp = test::call_service(&app, refresh_request(&token).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_REFRESH_TOKEN");
        assert_eq!(body["message"], "Invalid refresh token");
    }
}

#[actix_web::test]
async fn test_current_user_from_access_token() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, login_request("alice", PASSWORD).to_request()).await;
    let login: Value = test::read_body_json(resp).await;

    let resp = test::call_service(&app, me_request(login["access_token"].as_str()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["id"], ctx.user.id.to_string());
    assert_eq!(body["username"], "alice");
}

#[actix_web::test]
async fn test_current_user_rejects_bad_access_tokens() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, login_request("alice", PASSWORD).to_request()).await;
    let login: Value = test::read_body_json(resp).await;

    for token in [None, Some("garbage"), login["refresh_token"].as_str()] {
        let resp = test::call_service(&app, me_request(token).to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "INVALID_ACCESS_TOKEN");
        assert_eq!(body["message"], "Invalid access token");
    }
}

#[actix_web::test]
async fn test_expired_access_token() {
    let config = AuthServiceConfig::new("access-secret", "refresh-secret")
        .with_access_token_ttl(Duration::seconds(-1));
    let ctx = setup_with(config).await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, login_request("alice", PASSWORD).to_request()).await;
    let login: Value = test::read_body_json(resp).await;

    let resp = test::call_service(&app, me_request(login["access_token"].as_str()).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(resp.headers().get(header::WWW_AUTHENTICATE).unwrap(), "Bearer");
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "ACCESS_TOKEN_EXPIRED");
    assert_eq!(body["message"], "Access token expired");
}

#[actix_web::test]
async fn test_health_and_not_found() {
    let ctx = setup().await;
    let app = test::init_service(create_app(ctx.state.clone())).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "healthy");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/links").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "NOT_FOUND");
}
