//! MySQL repository implementations

mod errors;
mod token_repository_impl;
mod user_repository_impl;

pub use token_repository_impl::{MySqlTokenRepository, MySqlTokenTransaction};
pub use user_repository_impl::MySqlUserRepository;
