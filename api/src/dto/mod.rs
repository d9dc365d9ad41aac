pub mod auth;

pub use auth::{LoginRequest, RefreshRequest, TokenResponse};
