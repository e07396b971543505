//! Types shared by the auth layers

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Role given to every account unless the signup role is honored.
pub const DEFAULT_ROLE: &str = "user";

/// bcrypt digest of a password. Never serialized, redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    pub fn new(digest: String) -> Self {
        Self(digest)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(<redacted>)")
    }
}

/// Stored account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    /// Assigned by the store
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: PasswordDigest,
    pub role: String,
    /// Login is refused while set
    pub blocked: bool,
    pub created_at: DateTime<Utc>,
}

/// Row handed to the store on registration
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: PasswordDigest,
    pub role: String,
}

/// Identity carried by a session token and injected by the auth gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: i64,
    pub role: String,
    pub username: String,
    pub email: String,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            role: user.role.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Signup body
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Only honored when the service is configured to accept it
    #[serde(default)]
    pub role: Option<String>,
}

/// Login body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Issued token plus the account it was issued for
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    pub token: String,
}
