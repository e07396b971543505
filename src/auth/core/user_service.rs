//! Account persistence service

use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::bounded;
use crate::auth::{
    errors::AuthError,
    storage::UserStorage,
    types::{NewUser, User},
};

/// Storage access with a timeout around every call
pub struct UserService {
    storage: Arc<dyn UserStorage>,
    timeout: Duration,
}

impl UserService {
    pub fn new(storage: Arc<dyn UserStorage>, timeout: Duration) -> Self {
        Self { storage, timeout }
    }

    /// Insert relying on the store's uniqueness constraint. Callers do the
    /// cheap existence check; a conflict here means a concurrent signup won.
    pub async fn create_user(&self, new_user: NewUser) -> Result<User, AuthError> {
        match bounded(self.timeout, "user insert", self.storage.insert_user(new_user)).await {
            Ok(user) => {
                info!("User created: id={}, role={}", user.id, user.role);
                Ok(user)
            }
            Err(AuthError::EmailExists) => {
                warn!("Concurrent registration lost the uniqueness race");
                Err(AuthError::EmailExists)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        bounded(self.timeout, "user lookup", self.storage.find_by_email(email)).await
    }

    pub async fn users_with_role(&self, role: &str) -> Result<Vec<User>, AuthError> {
        bounded(self.timeout, "user listing", self.storage.find_all_with_role(role)).await
    }

    pub async fn set_blocked(&self, id: i64, blocked: bool) -> Result<bool, AuthError> {
        bounded(self.timeout, "user update", self.storage.set_blocked(id, blocked)).await
    }
}
