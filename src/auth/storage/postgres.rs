//! PostgreSQL storage
//!
//! Email uniqueness is enforced by the `UNIQUE` constraint on `users.email`;
//! a violation surfaces as `AuthError::EmailExists`.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tracing::info;

use super::r#trait::UserStorage;
use crate::auth::{
    errors::AuthError,
    types::{NewUser, PasswordDigest, User},
};

const USER_COLUMNS: &str = "id, username, email, password_hash, role, blocked, created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    username: String,
    email: String,
    password_hash: String,
    role: String,
    blocked: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            username: row.username,
            email: row.email,
            password_hash: PasswordDigest::new(row.password_hash),
            role: row.role,
            blocked: row.blocked,
            created_at: row.created_at,
        }
    }
}

pub struct PostgresStorage {
    pool: PgPool,
}

impl PostgresStorage {
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect and apply the schema
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        info!("Connecting to user database");

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(5))
            .connect(database_url)
            .await
            .context("Failed to connect to users database")?;

        let storage = Self::from_pool(pool);
        storage.migrate().await?;

        info!("User database ready");
        Ok(storage)
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::raw_sql(include_str!("../../../migrations/001_create_users_table.sql"))
            .execute(&self.pool)
            .await
            .context("Failed to run users database migrations")?;
        Ok(())
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStorage for PostgresStorage {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(User::from))
    }

    async fn insert_user(&self, user: NewUser) -> Result<User, AuthError> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.password_hash.as_str())
        .bind(&user.role)
        .fetch_one(&self.pool)
        .await?;

        info!("User stored: id={}", row.id);
        Ok(row.into())
    }

    async fn find_all_with_role(&self, role: &str) -> Result<Vec<User>, AuthError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE role = $1 ORDER BY id ASC"
        ))
        .bind(role)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn set_blocked(&self, id: i64, blocked: bool) -> Result<bool, AuthError> {
        let result = sqlx::query("UPDATE users SET blocked = $1 WHERE id = $2")
            .bind(blocked)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
