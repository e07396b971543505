//! Password hashing service
//!
//! bcrypt with a fresh random salt per call. Both directions run on the
//! blocking pool so a slow hash never stalls the async workers.
//!
//! bcrypt ignores input past 72 bytes, so longer passwords are refused
//! when hashing and never match when verifying.

use tokio::sync::OnceCell;
use tracing::debug;

use super::input_validator::MAX_PASSWORD_BYTES;
use crate::auth::{
    config::PasswordConfig,
    errors::{AuthError, Field},
    types::PasswordDigest,
};

/// Plaintext used to build the digest checked when an email is unknown
const DUMMY_PASSWORD: &str = "credential-gate-unknown-account";

pub struct PasswordService {
    config: PasswordConfig,
    dummy_digest: OnceCell<PasswordDigest>,
}

impl PasswordService {
    pub fn new(config: PasswordConfig) -> Self {
        Self { config, dummy_digest: OnceCell::new() }
    }

    pub async fn hash_password(&self, password: &str) -> Result<PasswordDigest, AuthError> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(AuthError::InvalidField(Field::Password));
        }

        let password = password.to_owned();
        let cost = self.config.bcrypt_cost;

        let digest = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| AuthError::Hashing(format!("hashing task failed: {}", e)))?
            .map_err(|e| AuthError::Hashing(e.to_string()))?;

        Ok(PasswordDigest::new(digest))
    }

    /// bcrypt verification; a digest that fails to parse never matches.
    pub async fn verify_password(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, AuthError> {
        if password.len() > MAX_PASSWORD_BYTES {
            debug!("Password longer than bcrypt input limit; treated as mismatch");
            return Ok(false);
        }

        let password = password.to_owned();
        let digest = digest.as_str().to_owned();

        let outcome = tokio::task::spawn_blocking(move || bcrypt::verify(password, &digest))
            .await
            .map_err(|e| AuthError::Hashing(format!("verification task failed: {}", e)))?;

        match outcome {
            Ok(matched) => Ok(matched),
            Err(e) => {
                debug!("Stored digest could not be verified: {}", e);
                Ok(false)
            }
        }
    }

    /// Burn one verification for a login whose email matched no account.
    pub async fn verify_against_dummy(&self, password: &str) -> Result<(), AuthError> {
        let dummy = self
            .dummy_digest
            .get_or_try_init(|| self.hash_password(DUMMY_PASSWORD))
            .await?;
        self.verify_password(password, dummy).await?;
        Ok(())
    }
}

impl Default for PasswordService {
    fn default() -> Self {
        Self::new(PasswordConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::config::MIN_BCRYPT_COST;
    use proptest::prelude::*;

    fn fast_service() -> PasswordService {
        PasswordService::new(PasswordConfig { bcrypt_cost: MIN_BCRYPT_COST })
    }

    #[tokio::test]
    async fn test_password_hashing() {
        let service = fast_service();

        let digest = service.hash_password("Passw0rd").await.unwrap();
        assert_ne!(digest.as_str(), "Passw0rd");

        assert!(service.verify_password("Passw0rd", &digest).await.unwrap());
        assert!(!service.verify_password("Passw0rd!", &digest).await.unwrap());
    }

    #[tokio::test]
    async fn test_salt_is_fresh_per_hash() {
        let service = fast_service();

        let first = service.hash_password("Passw0rd").await.unwrap();
        let second = service.hash_password("Passw0rd").await.unwrap();
        assert_ne!(first, second);

        assert!(service.verify_password("Passw0rd", &first).await.unwrap());
        assert!(service.verify_password("Passw0rd", &second).await.unwrap());
    }

    #[tokio::test]
    async fn test_configured_cost_is_used() {
        let service = fast_service();
        let digest = service.hash_password("Passw0rd").await.unwrap();
        assert!(digest.as_str().starts_with("$2b$04$"));
    }

    #[tokio::test]
    async fn test_garbage_digest_never_matches() {
        let service = fast_service();
        let garbage = PasswordDigest::new("not-a-bcrypt-digest".to_string());
        assert!(!service.verify_password("Passw0rd", &garbage).await.unwrap());
    }

    #[tokio::test]
    async fn test_dummy_verification_succeeds() {
        let service = fast_service();
        service.verify_against_dummy("anything").await.unwrap();
        service.verify_against_dummy("again").await.unwrap();
    }

    #[tokio::test]
    async fn test_shared_72_byte_prefix_does_not_match() {
        let service = fast_service();
        let prefix = format!("Aa1{}", "x".repeat(69));
        assert_eq!(prefix.len(), MAX_PASSWORD_BYTES);

        let stored = service.hash_password(&prefix).await.unwrap();
        let longer = format!("{}totally-different", prefix);
        assert!(!service.verify_password(&longer, &stored).await.unwrap());

        let overlong = format!("{}SECRET-TAIL", prefix);
        assert!(matches!(
            service.hash_password(&overlong).await,
            Err(AuthError::InvalidField(Field::Password))
        ));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(16))]

        #[test]
        fn prop_distinct_passwords_never_verify(
            prefix in "[a-zA-Z0-9]{60,90}",
            a in "[a-z]{1,8}",
            b in "[a-z]{1,8}",
        ) {
            prop_assume!(a != b);
            let stored_password = format!("{prefix}{a}");
            let attempt = format!("{prefix}{b}");

            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let outcome = rt.block_on(async {
                let service = fast_service();
                match service.hash_password(&stored_password).await {
                    Ok(digest) => Some(service.verify_password(&attempt, &digest).await.unwrap()),
                    Err(AuthError::InvalidField(Field::Password)) => None,
                    Err(e) => panic!("unexpected hashing error: {e}"),
                }
            });

            match outcome {
                Some(matched) => prop_assert!(!matched),
                None => prop_assert!(stored_password.len() > MAX_PASSWORD_BYTES),
            }
        }
    }
}
