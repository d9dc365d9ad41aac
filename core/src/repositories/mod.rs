pub mod token;
pub mod user;

pub use token::{TokenRepository, TokenTransaction};
pub use user::UserRepository;

#[cfg(any(test, feature = "mock"))]
pub use token::{MockTokenRepository, MockTokenTransaction};
#[cfg(any(test, feature = "mock"))]
pub use user::MockUserRepository;
