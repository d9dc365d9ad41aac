//! HTTP surface of the Shortlinks authentication subsystem
//!
//! Library exports for the binary and for integration tests.

pub mod app;
pub mod dto;
pub mod errors;
pub mod gateway;
pub mod middleware;
pub mod routes;

pub use app::create_app;
pub use errors::ApiError;
pub use gateway::AuthGateway;
pub use routes::AppState;
