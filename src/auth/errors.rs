//! Auth error types

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::i18n::{self, Locale};

/// Coarse error taxonomy exposed to clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidInput,
    Conflict,
    Unauthorized,
    Unavailable,
    Internal,
}

/// Input field that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Username,
    Email,
    Password,
    Role,
}

impl Field {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Username => "username",
            Self::Email => "email",
            Self::Password => "password",
            Self::Role => "role",
        }
    }
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid {}", .0.as_str())]
    InvalidField(Field),

    #[error("Malformed request body: {0}")]
    MalformedBody(String),

    #[error("Email already exists")]
    EmailExists,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is blocked")]
    AccountBlocked,

    #[error("Missing token")]
    MissingToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Request timed out")]
    RequestTimeout,

    #[error("Service overloaded")]
    Overloaded,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Timed out during {0}")]
    Timeout(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidField(_) | Self::MalformedBody(_) => ErrorKind::InvalidInput,

            Self::EmailExists => ErrorKind::Conflict,

            Self::InvalidCredentials
            | Self::AccountBlocked
            | Self::MissingToken
            | Self::InvalidToken => ErrorKind::Unauthorized,

            Self::RequestTimeout | Self::Overloaded => ErrorKind::Unavailable,

            Self::Storage(_) | Self::Hashing(_) | Self::Timeout(_) | Self::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            Self::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
            _ => match self.kind() {
                ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
                ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    /// Stable code for clients to branch on
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidField(Field::Username) => "invalid_username",
            Self::InvalidField(Field::Email) => "invalid_email",
            Self::InvalidField(Field::Password) => "weak_password",
            Self::InvalidField(Field::Role) => "invalid_role",
            Self::MalformedBody(_) => "malformed_body",
            Self::EmailExists => "email_exists",
            Self::InvalidCredentials => "invalid_credentials",
            Self::AccountBlocked => "account_blocked",
            Self::MissingToken => "missing_token",
            Self::InvalidToken => "invalid_token",
            Self::RequestTimeout => "request_timeout",
            Self::Overloaded => "service_unavailable",
            Self::Storage(_) | Self::Hashing(_) | Self::Timeout(_) | Self::Internal(_) => {
                "server_error"
            }
        }
    }

    /// Catalog key of the client-facing message
    pub fn message_key(&self) -> &'static str {
        match self {
            Self::InvalidField(Field::Username) => "invalid-username",
            Self::InvalidField(Field::Email) => "invalid-email",
            Self::InvalidField(Field::Password) => "invalid-password",
            Self::InvalidField(Field::Role) => "invalid-role",
            Self::MalformedBody(_) => "malformed-body",
            Self::EmailExists => "email-exists",
            Self::InvalidCredentials => "invalid-credentials",
            Self::AccountBlocked => "account-blocked",
            Self::MissingToken => "missing-token",
            Self::InvalidToken => "invalid-token",
            Self::RequestTimeout => "request-timeout",
            Self::Overloaded => "service-unavailable",
            Self::Storage(_) | Self::Hashing(_) | Self::Timeout(_) | Self::Internal(_) => {
                "internal-error"
            }
        }
    }

    pub fn localized(self, locale: Locale) -> ApiError {
        ApiError { error: self, locale }
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => Self::EmailExists,
            _ => Self::Storage(e.to_string()),
        }
    }
}

/// An `AuthError` rendered in the caller's language
#[derive(Debug)]
pub struct ApiError {
    pub error: AuthError,
    pub locale: Locale,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.error.status_code();

        if self.error.kind() == ErrorKind::Internal {
            // detail stays in the log
            error!("Request failed: {}", self.error);
        }

        let body = Json(json!({
            "success": false,
            "code": self.error.error_code(),
            "message": i18n::message(self.error.message_key(), self.locale),
        }));

        (status, body).into_response()
    }
}
