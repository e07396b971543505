//! Auth service (facade)
//!
//! Registration: validate, check email, hash, persist, issue token.
//! Login: look up, verify password, check blocked flag, issue token.

use std::sync::Arc;
use tracing::{debug, info};

use crate::auth::{
    config::AuthConfig,
    core::{bounded, input_validator, PasswordService, TokenService, UserService},
    errors::AuthError,
    storage::UserStorage,
    types::*,
};

pub struct AuthService {
    users: UserService,
    tokens: TokenService,
    passwords: PasswordService,
    config: AuthConfig,
}

impl AuthService {
    /// # Errors
    /// Fails if the token service rejects the configured secret.
    pub fn new(storage: Arc<dyn UserStorage>, config: AuthConfig) -> Result<Self, AuthError> {
        let users = UserService::new(storage, config.operation_timeout);
        let tokens = TokenService::new(config.token_secret.clone(), config.token_expiry)?;
        let passwords = PasswordService::new(config.password.clone());

        Ok(Self { users, tokens, passwords, config })
    }

    pub async fn register(&self, req: SignupRequest) -> Result<Session, AuthError> {
        let requested_role = req.role.as_deref().filter(|_| self.config.allow_requested_role);

        // no hashing or storage work for bad input
        input_validator::validate_signup(&req.username, &req.email, &req.password, requested_role)?;
        debug!("Registration input validated");

        if self.users.find_by_email(&req.email).await?.is_some() {
            debug!("Registration rejected: email already registered");
            return Err(AuthError::EmailExists);
        }

        let password_hash = bounded(
            self.config.operation_timeout,
            "password hashing",
            self.passwords.hash_password(&req.password),
        )
        .await?;

        let role = requested_role.unwrap_or(DEFAULT_ROLE).to_string();
        let user = self
            .users
            .create_user(NewUser { username: req.username, email: req.email, password_hash, role })
            .await?;

        let token = self.tokens.issue(&Identity::from(&user))?;
        info!("Registration complete: id={}", user.id);

        Ok(Session { user, token })
    }

    /// Unknown email and wrong password fail identically. The blocked flag
    /// is only reported to callers who proved the password.
    pub async fn login(&self, req: LoginRequest) -> Result<Session, AuthError> {
        let Some(user) = self.users.find_by_email(&req.email).await? else {
            bounded(
                self.config.operation_timeout,
                "password verification",
                self.passwords.verify_against_dummy(&req.password),
            )
            .await?;
            return Err(AuthError::InvalidCredentials);
        };

        let matched = bounded(
            self.config.operation_timeout,
            "password verification",
            self.passwords.verify_password(&req.password, &user.password_hash),
        )
        .await?;

        if !matched {
            return Err(AuthError::InvalidCredentials);
        }

        if user.blocked {
            info!("Login refused for blocked account: id={}", user.id);
            return Err(AuthError::AccountBlocked);
        }

        let token = self.tokens.issue(&Identity::from(&user))?;
        info!("Login complete: id={}", user.id);

        Ok(Session { user, token })
    }

    /// Token check used by the auth gate
    pub fn authenticate(&self, token: Option<&str>) -> Result<Identity, AuthError> {
        self.tokens.verify(token)
    }

    pub async fn users_with_role(&self, role: &str) -> Result<Vec<User>, AuthError> {
        self.users.users_with_role(role).await
    }

    pub async fn set_blocked(&self, id: i64, blocked: bool) -> Result<bool, AuthError> {
        self.users.set_blocked(id, blocked).await
    }
}
