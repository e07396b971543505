//! Storage contract

use async_trait::async_trait;

use crate::auth::{
    errors::AuthError,
    types::{NewUser, User},
};

/// Persistence boundary for accounts.
///
/// `insert_user` is the authority on email uniqueness: it must fail with
/// `AuthError::EmailExists` when the email is taken, whatever any earlier
/// lookup returned.
#[async_trait]
pub trait UserStorage: Send + Sync {
    /// Exact-match lookup
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// Insert and return the stored row with its assigned id
    async fn insert_user(&self, user: NewUser) -> Result<User, AuthError>;

    /// All accounts with `role`, ordered by id
    async fn find_all_with_role(&self, role: &str) -> Result<Vec<User>, AuthError>;

    /// Set or clear the blocked flag; `false` when no account has `id`
    async fn set_blocked(&self, id: i64, blocked: bool) -> Result<bool, AuthError>;
}
