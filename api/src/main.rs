use actix_web::{web, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sl_api::{create_app, AppState, AuthGateway};
use sl_core::repositories::TokenRepository;
use sl_core::services::{AuthService, AuthServiceConfig, CredentialVerifier, PasswordAuthenticator};
use sl_infra::{DatabasePool, MySqlTokenRepository, MySqlUserRepository};
use sl_shared::{AppConfig, ServerConfig};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting Shortlinks auth API");

    let config = AppConfig::from_env().context("Invalid configuration")?;
    let auth_config = AuthServiceConfig::from_auth_config(&config.auth)
        .context("Invalid token signing configuration")?;

    let pool = DatabasePool::new(&config.database)
        .await
        .context("Failed to connect to the database")?;

    let users = MySqlUserRepository::new(pool.get_pool().clone());
    let tokens = MySqlTokenRepository::new(pool.get_pool().clone());
    let result = serve(&config.server, PasswordAuthenticator::new(Arc::new(users)), tokens, auth_config).await;

    pool.close().await;
    result
}

async fn serve<C, R>(
    server: &ServerConfig,
    credentials: C,
    tokens: R,
    auth_config: AuthServiceConfig,
) -> anyhow::Result<()>
where
    C: CredentialVerifier + 'static,
    R: TokenRepository + 'static,
{
    let auth_service = AuthService::new(tokens, auth_config)?;
    let app_state = web::Data::new(AppState::new(AuthGateway::new(credentials, auth_service)));

    let bind_address = server.bind_address();
    info!("Server will bind to: {}", bind_address);

    HttpServer::new(move || create_app(app_state.clone()))
        .bind(&bind_address)
        .with_context(|| format!("Failed to bind {}", bind_address))?
        .run()
        .await?;

    Ok(())
}
