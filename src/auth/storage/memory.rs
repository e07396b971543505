//! In-memory storage (development and tests)

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::r#trait::UserStorage;
use crate::auth::{
    errors::AuthError,
    types::{NewUser, User},
};

#[derive(Default)]
struct Tables {
    /// email -> user
    users: HashMap<String, User>,
    /// id -> email
    ids: HashMap<i64, String>,
    next_id: i64,
}

/// Accounts held in process memory. Clones share the same tables.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    tables: Arc<RwLock<Tables>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStorage for MemoryStorage {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(email).cloned())
    }

    async fn insert_user(&self, new_user: NewUser) -> Result<User, AuthError> {
        // check and insert under one write lock
        let mut tables = self.tables.write().await;

        if tables.users.contains_key(&new_user.email) {
            return Err(AuthError::EmailExists);
        }

        tables.next_id += 1;
        let user = User {
            id: tables.next_id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            blocked: false,
            created_at: chrono::Utc::now(),
        };

        tables.ids.insert(user.id, user.email.clone());
        tables.users.insert(user.email.clone(), user.clone());

        info!("User stored in memory: id={}", user.id);
        Ok(user)
    }

    async fn find_all_with_role(&self, role: &str) -> Result<Vec<User>, AuthError> {
        let tables = self.tables.read().await;
        let mut users: Vec<User> =
            tables.users.values().filter(|u| u.role == role).cloned().collect();
        users.sort_by_key(|u| u.id);
        Ok(users)
    }

    async fn set_blocked(&self, id: i64, blocked: bool) -> Result<bool, AuthError> {
        let mut tables = self.tables.write().await;

        let Some(email) = tables.ids.get(&id).cloned() else {
            return Ok(false);
        };

        match tables.users.get_mut(&email) {
            Some(user) => {
                user.blocked = blocked;
                info!("User blocked flag updated: id={}, blocked={}", id, blocked);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
