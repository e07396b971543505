//! Auth configuration

use anyhow::{bail, Context, Result};
use std::time::Duration;

/// Default bcrypt work factor
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Bounds accepted by bcrypt
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

/// Default session token lifetime (seconds)
pub const DEFAULT_TOKEN_EXPIRY_SECS: u64 = 86_400;

#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret used to sign session tokens
    pub token_secret: String,

    /// Token lifetime; `None` issues tokens without an `exp` claim
    pub token_expiry: Option<Duration>,

    pub password: PasswordConfig,

    /// Upper bound on each storage or hashing call
    pub operation_timeout: Duration,

    /// Honor the `role` field of signup bodies
    pub allow_requested_role: bool,
}

#[derive(Debug, Clone)]
pub struct PasswordConfig {
    /// bcrypt cost
    pub bcrypt_cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self { bcrypt_cost: DEFAULT_BCRYPT_COST }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"<redacted>")
            .field("token_expiry", &self.token_expiry)
            .field("password", &self.password)
            .field("operation_timeout", &self.operation_timeout)
            .field("allow_requested_role", &self.allow_requested_role)
            .finish()
    }
}

impl AuthConfig {
    /// Config with defaults around an explicit secret
    pub fn new(token_secret: impl Into<String>) -> Self {
        Self {
            token_secret: token_secret.into(),
            token_expiry: Some(Duration::from_secs(DEFAULT_TOKEN_EXPIRY_SECS)),
            password: PasswordConfig::default(),
            operation_timeout: Duration::from_secs(10),
            allow_requested_role: false,
        }
    }

    /// Load from the process environment.
    ///
    /// A missing `ACCESS_TOKEN_SECRET` is a startup error.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("ACCESS_TOKEN_SECRET")
            .filter(|s| !s.trim().is_empty())
            .context("ACCESS_TOKEN_SECRET must be set to a non-empty value")?;

        let mut config = Self::new(secret);

        if let Some(raw) = lookup("TOKEN_EXPIRY_SECS") {
            let secs: u64 = raw.parse().context("TOKEN_EXPIRY_SECS must be an integer")?;
            config.token_expiry = (secs > 0).then(|| Duration::from_secs(secs));
        }

        if let Some(raw) = lookup("BCRYPT_COST") {
            let cost: u32 = raw.parse().context("BCRYPT_COST must be an integer")?;
            if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
                bail!("BCRYPT_COST must be between {} and {}", MIN_BCRYPT_COST, MAX_BCRYPT_COST);
            }
            config.password.bcrypt_cost = cost;
        }

        if let Some(raw) = lookup("AUTH_OPERATION_TIMEOUT_SECS") {
            let secs: u64 = raw.parse().context("AUTH_OPERATION_TIMEOUT_SECS must be an integer")?;
            config.operation_timeout = Duration::from_secs(secs.max(1));
        }

        if let Some(raw) = lookup("ALLOW_REQUESTED_ROLE") {
            config.allow_requested_role =
                raw.parse().context("ALLOW_REQUESTED_ROLE must be true or false")?;
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AuthConfig::from_lookup(lookup(&[("ACCESS_TOKEN_SECRET", "s3cret")])).unwrap();
        assert_eq!(config.token_secret, "s3cret");
        assert_eq!(config.password.bcrypt_cost, 10);
        assert_eq!(config.token_expiry, Some(Duration::from_secs(86_400)));
        assert!(!config.allow_requested_role);
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        assert!(AuthConfig::from_lookup(lookup(&[])).is_err());
        assert!(AuthConfig::from_lookup(lookup(&[("ACCESS_TOKEN_SECRET", "   ")])).is_err());
    }

    #[test]
    fn test_zero_expiry_disables_exp() {
        let config = AuthConfig::from_lookup(lookup(&[
            ("ACCESS_TOKEN_SECRET", "s3cret"),
            ("TOKEN_EXPIRY_SECS", "0"),
        ]))
        .unwrap();
        assert!(config.token_expiry.is_none());
    }

    #[test]
    fn test_bcrypt_cost_bounds() {
        let result = AuthConfig::from_lookup(lookup(&[
            ("ACCESS_TOKEN_SECRET", "s3cret"),
            ("BCRYPT_COST", "2"),
        ]));
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::new("very-private-signing-key");
        assert!(!format!("{:?}", config).contains("very-private"));
    }
}
