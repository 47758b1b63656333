use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::error;

/// Salted one-way hash of a password, as a PHC string.
pub fn hash_password(plain: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map_err(|e| {
            error!(error = %e, "argon2 hash_password error");
            anyhow::anyhow!(e.to_string())
        })?
        .to_string();
    Ok(hash)
}

/// Compare a candidate password against a stored hash. Errors only on a
/// malformed hash; a mismatch is `Ok(false)`.
pub fn verify_password(plain: &str, hash: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash).map_err(|e| {
        error!(error = %e, "argon2 parse hash error");
        anyhow::anyhow!(e.to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_against_original_password() {
        let hash = hash_password("pw123").expect("hashing should succeed");
        assert!(verify_password("pw123", &hash).expect("verify should succeed"));
    }

    #[test]
    fn hash_is_not_the_plaintext_and_is_salted() {
        let first = hash_password("pw123").expect("hash");
        let second = hash_password("pw123").expect("hash");
        assert_ne!(first, "pw123");
        assert!(first.starts_with("$argon2"));
        // Fresh salt per call, so equal passwords hash differently.
        assert_ne!(first, second);
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hash_password("pw123").expect("hash");
        assert!(!verify_password("wrong", &hash).expect("verify should not error"));
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(verify_password("pw123", "not-a-phc-string").is_err());
    }
}
