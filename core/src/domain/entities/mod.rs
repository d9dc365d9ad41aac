//! Domain entities representing core business objects.

pub mod token;
pub mod user;

// Re-export commonly used types
pub use token::{Claims, Identity, NewRefreshToken, RefreshTokenRecord, TokenPair, TOKEN_TYPE_BEARER};
pub use user::User;
