//! Route handlers

pub mod auth;
pub mod users;

use sl_core::repositories::TokenRepository;
use sl_core::services::CredentialVerifier;
use std::sync::Arc;

use crate::gateway::AuthGateway;

/// Application state shared by all handlers
pub struct AppState<C, R>
where
    C: CredentialVerifier,
    R: TokenRepository,
{
    pub gateway: Arc<AuthGateway<C, R>>,
}

impl<C, R> AppState<C, R>
where
    C: CredentialVerifier,
    R: TokenRepository,
{
    pub fn new(gateway: AuthGateway<C, R>) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}
