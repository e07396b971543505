//! Signup input rules
//!
//! Pure predicates. Checks run username, email, password (then role, when
//! one is requested) and stop at the first rejected field.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::auth::errors::{AuthError, Field};

static USERNAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").expect("valid username pattern"));

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email pattern"));

static ROLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_]{1,32}$").expect("valid role pattern"));

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// bcrypt only reads this many bytes of input
pub const MAX_PASSWORD_BYTES: usize = 72;

pub fn validate_username(username: &str) -> Result<(), AuthError> {
    if USERNAME_RE.is_match(username) {
        Ok(())
    } else {
        Err(AuthError::InvalidField(Field::Username))
    }
}

/// `local@domain.tld` shape with no whitespace anywhere
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    if EMAIL_RE.is_match(email) {
        Ok(())
    } else {
        Err(AuthError::InvalidField(Field::Email))
    }
}

/// At least 8 characters with a digit, a lowercase and an uppercase ASCII
/// letter; at most 72 bytes.
pub fn validate_password(password: &str) -> Result<(), AuthError> {
    let strong = password.chars().count() >= MIN_PASSWORD_LENGTH
        && password.len() <= MAX_PASSWORD_BYTES
        && password.chars().any(|c| c.is_ascii_digit())
        && password.chars().any(|c| c.is_ascii_lowercase())
        && password.chars().any(|c| c.is_ascii_uppercase());

    if strong {
        Ok(())
    } else {
        Err(AuthError::InvalidField(Field::Password))
    }
}

pub fn validate_role(role: &str) -> Result<(), AuthError> {
    if ROLE_RE.is_match(role) {
        Ok(())
    } else {
        Err(AuthError::InvalidField(Field::Role))
    }
}

pub fn validate_signup(
    username: &str,
    email: &str,
    password: &str,
    role: Option<&str>,
) -> Result<(), AuthError> {
    validate_username(username)?;
    validate_email(email)?;
    validate_password(password)?;
    if let Some(role) = role {
        validate_role(role)?;
    }
    Ok(())
}
