//! Argon2id password hashing, verification, and strength validation.
//!
//! Hashes are produced with the library defaults (Argon2id, v=19,
//! m=19456, t=2, p=1) and a random salt from [`OsRng`]. The parameter
//! prefix shared by every default hash is stripped before storage, leaving
//! only `salt$hash`. Stored values that still carry a full PHC string (a
//! leading `$`) are used as-is, so hashes made with other parameters keep
//! verifying.

use std::borrow::Cow;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// PHC prefix of every hash produced by `Argon2::default()`.
pub const HASH_PREFIX: &str = "$argon2id$v=19$m=19456,t=2,p=1$";

#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Stored password hash is malformed: {0}")]
    Verification(String),
}

/// Hash a plaintext password with a random salt.
///
/// Returns the compact stored form (`salt$hash`) when the default
/// parameters were used, otherwise the full PHC string.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::Hash(e.to_string()))?
        .to_string();

    Ok(match hash.strip_prefix(HASH_PREFIX) {
        Some(compact) => compact.to_string(),
        None => hash,
    })
}

/// Verify a plaintext password against a stored hash.
///
/// Returns `Ok(true)` on match and `Ok(false)` on mismatch. A stored value
/// that cannot be parsed is an error.
pub fn verify_password(stored: &str, password: &str) -> Result<bool, PasswordError> {
    let full: Cow<'_, str> = if stored.starts_with('$') {
        Cow::Borrowed(stored)
    } else {
        Cow::Owned(format!("{HASH_PREFIX}{stored}"))
    };

    let parsed =
        PasswordHash::new(&full).map_err(|e| PasswordError::Verification(e.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::Verification(e.to_string())),
    }
}

/// Validate that a password meets the minimum length.
///
/// Returns `Err` with a human-readable explanation when it does not.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), String> {
    if password.chars().count() < min_length {
        return Err(format!(
            "Password must be at least {min_length} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use argon2::{Algorithm, Params, Version};
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "correct-horse-battery-staple";
        let stored = hash_password(password).expect("hashing should succeed");

        assert!(!stored.starts_with('$'), "default prefix should be stripped");
        assert_eq!(stored.split('$').count(), 2, "expected salt$hash");

        assert!(verify_password(&stored, password).expect("verify should succeed"));
    }

    #[test]
    fn test_wrong_password_fails() {
        let stored = hash_password("real-password").expect("hashing should succeed");
        let verified = verify_password(&stored, "wrong-password").expect("verify should succeed");
        assert!(!verified);
    }

    #[test]
    fn test_same_password_hashes_differently() {
        let a = hash_password("repeat").unwrap();
        let b = hash_password("repeat").unwrap();
        assert_ne!(a, b, "salts must differ");
    }

    #[test]
    fn test_full_phc_with_other_params_still_verifies() {
        let params = Params::new(8 * 1024, 1, 1, None).unwrap();
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
        let salt = SaltString::generate(&mut OsRng);
        let full = argon2
            .hash_password(b"legacy-secret", &salt)
            .unwrap()
            .to_string();
        assert!(!full.starts_with(HASH_PREFIX));

        assert!(verify_password(&full, "legacy-secret").unwrap());
        assert!(!verify_password(&full, "other").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert_matches!(
            verify_password("not-a-hash", "anything"),
            Err(PasswordError::Verification(_))
        );
        assert_matches!(
            verify_password("$garbage$", "anything"),
            Err(PasswordError::Verification(_))
        );
    }

    #[test]
    fn test_password_too_short() {
        let msg = validate_password_strength("ab", 3).unwrap_err();
        assert!(msg.contains("at least 3 characters"));
    }

    #[test]
    fn test_password_meets_minimum() {
        assert!(validate_password_strength("abc", 3).is_ok());
        assert!(validate_password_strength("a longer password", 3).is_ok());
    }
}
