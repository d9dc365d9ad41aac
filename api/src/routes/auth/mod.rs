//! Authentication route handlers
//!
//! - Login with username or email and password
//! - Refresh token rotation

pub mod login;
pub mod refresh;

pub use login::login;
pub use refresh::refresh;
