//! Core business logic

pub mod input_validator;
pub mod password_service;
pub mod token_service;
pub mod user_service;

pub use password_service::PasswordService;
pub use token_service::TokenService;
pub use user_service::UserService;

use std::future::Future;
use std::time::Duration;

use crate::auth::errors::AuthError;

/// Run `fut` with an upper bound; expiry becomes `AuthError::Timeout`.
pub(crate) async fn bounded<T, F>(
    limit: Duration,
    operation: &'static str,
    fut: F,
) -> Result<T, AuthError>
where
    F: Future<Output = Result<T, AuthError>>,
{
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| AuthError::Timeout(operation))?
}
