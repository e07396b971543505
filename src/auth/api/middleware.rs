//! Auth gate
//!
//! Verifies the bearer token and injects the caller's `Identity` into the
//! request extensions. Requests without a valid token never reach the
//! handler.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::warn;

use crate::auth::{errors::ApiError, AuthService};
use crate::i18n::Locale;

/// Token from an `Authorization: Bearer <token>` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token.trim())
}

pub async fn require_auth(
    State(service): State<Arc<AuthService>>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let locale = Locale::from_headers(request.headers());

    let identity = service.authenticate(bearer_token(request.headers())).map_err(|e| {
        warn!("Auth gate rejected request to {}: {}", request.uri().path(), e);
        e.localized(locale)
    })?;

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_extract_token() {
        assert_eq!(bearer_token(&headers("Bearer abc.def.ghi")), Some("abc.def.ghi"));
        assert_eq!(bearer_token(&headers("bearer abc")), Some("abc"));
    }

    #[test]
    fn test_extract_token_missing() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
        assert_eq!(bearer_token(&headers("Bearer")), None);
        assert_eq!(bearer_token(&headers("Basic dXNlcjpwYXNz")), None);
    }

    #[test]
    fn test_null_token_passes_through_as_text() {
        // the token service treats it as absent
        assert_eq!(bearer_token(&headers("Bearer null")), Some("null"));
    }
}
