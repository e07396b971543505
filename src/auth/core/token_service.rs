//! Session token service
//!
//! HS256 JWTs carrying `{id, role, username, email}`. Nothing is stored
//! server side, so an issued token stays valid until it expires.

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::auth::{errors::AuthError, types::Identity};

/// Secrets shorter than this are accepted with a warning
const RECOMMENDED_SECRET_LEN: usize = 32;

/// JWT payload
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    #[serde(flatten)]
    identity: Identity,
    /// Issued-at timestamp
    iat: u64,
    /// Expiry timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    exp: Option<u64>,
}

pub struct TokenService {
    /// Signing secret (zeroized on drop)
    secret: zeroize::Zeroizing<String>,

    /// `None` issues tokens without expiry
    expiry: Option<Duration>,
}

impl TokenService {
    /// # Errors
    /// Rejects a blank secret.
    pub fn new(secret: String, expiry: Option<Duration>) -> Result<Self, AuthError> {
        if secret.trim().is_empty() {
            return Err(AuthError::Internal("token secret must not be empty".to_string()));
        }

        if secret.len() < RECOMMENDED_SECRET_LEN {
            warn!(
                "Token secret is shorter than {} characters; consider a longer one",
                RECOMMENDED_SECRET_LEN
            );
        }

        if expiry.is_none() {
            warn!("Session tokens are issued without expiry");
        }

        Ok(Self { secret: zeroize::Zeroizing::new(secret), expiry })
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, AuthError> {
        let now = chrono::Utc::now().timestamp().max(0) as u64;

        let claims = Claims {
            identity: identity.clone(),
            iat: now,
            exp: self.expiry.map(|ttl| now + ttl.as_secs()),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &EncodingKey::from_secret(self.secret.as_bytes()))
            .map_err(|e| AuthError::Internal(format!("token signing failed: {}", e)))
    }

    /// Missing, empty and literal `"null"` tokens count as absent.
    pub fn verify(&self, token: Option<&str>) -> Result<Identity, AuthError> {
        let token = match token.map(str::trim) {
            None | Some("") | Some("null") => return Err(AuthError::MissingToken),
            Some(token) => token,
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        if self.expiry.is_none() {
            validation.required_spec_claims.clear();
        }

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            debug!("Token rejected: {}", e);
            AuthError::InvalidToken
        })?;

        Ok(data.claims.identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SECRET: &str = "mY$uP3r$tr0nG_jWt_k3Y_f0r_t3sting!@#";

    fn identity() -> Identity {
        Identity {
            id: 42,
            role: "user".to_string(),
            username: "alice_01".to_string(),
            email: "a@b.com".to_string(),
        }
    }

    fn service(expiry: Option<Duration>) -> TokenService {
        TokenService::new(SECRET.to_string(), expiry).unwrap()
    }

    #[test]
    fn test_issue_then_verify_returns_same_identity() {
        let service = service(Some(Duration::from_secs(3600)));
        let token = service.issue(&identity()).unwrap();
        assert_eq!(service.verify(Some(&token)).unwrap(), identity());
    }

    #[test]
    fn test_tokens_without_expiry_verify() {
        let service = service(None);
        let token = service.issue(&identity()).unwrap();
        assert_eq!(service.verify(Some(&token)).unwrap(), identity());
    }

    #[test]
    fn test_missing_and_null_tokens() {
        let service = service(None);
        assert!(matches!(service.verify(None), Err(AuthError::MissingToken)));
        assert!(matches!(service.verify(Some("")), Err(AuthError::MissingToken)));
        assert!(matches!(service.verify(Some("null")), Err(AuthError::MissingToken)));
    }

    #[test]
    fn test_malformed_token_rejected() {
        let service = service(None);
        assert!(matches!(service.verify(Some("invalid")), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_foreign_signature_rejected() {
        let ours = service(None);
        let theirs = TokenService::new("another-secret-of-reasonable-length!!".to_string(), None).unwrap();

        let token = theirs.issue(&identity()).unwrap();
        assert!(matches!(ours.verify(Some(&token)), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_tampered_payload_rejected() {
        let service = service(None);
        let token = service.issue(&identity()).unwrap();

        let mut parts: Vec<&str> = token.split('.').collect();
        let other = service
            .issue(&Identity { role: "admin".to_string(), ..identity() })
            .unwrap();
        let other_payload = other.split('.').nth(1).unwrap().to_string();
        parts[1] = &other_payload;

        let forged = parts.join(".");
        assert_ne!(forged, token);
        // signature of the first token does not cover the second payload
        assert!(service.verify(Some(&forged)).is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let service = service(Some(Duration::from_secs(3600)));
        let now = chrono::Utc::now().timestamp() as u64;
        let stale = Claims { identity: identity(), iat: now - 7200, exp: Some(now - 3600) };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &stale,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();

        assert!(matches!(service.verify(Some(&token)), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_blank_secret_rejected() {
        assert!(TokenService::new("  ".to_string(), None).is_err());
    }

    proptest! {
        #[test]
        fn prop_verify_returns_issued_identity(
            id in any::<i64>(),
            role in "[a-z_]{1,32}",
            username in "\\PC{0,40}",
            email in "\\PC{1,60}",
            with_expiry in any::<bool>(),
        ) {
            let service = service(with_expiry.then(|| Duration::from_secs(3600)));
            let identity = Identity { id, role, username, email };

            let token = service.issue(&identity).unwrap();
            prop_assert_eq!(service.verify(Some(&token)).unwrap(), identity);
        }
    }
}
