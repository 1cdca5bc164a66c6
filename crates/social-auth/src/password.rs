//! Password hashing

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

use crate::error::AuthError;

/// Hash a password with Argon2id and a fresh random salt
///
/// Returns the PHC string (algorithm, parameters, salt and digest).
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::PasswordHash(e.to_string()))
}

/// Verify a password against a stored PHC string
///
/// A malformed digest never matches.
pub fn verify_password(password: &str, digest: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(digest) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("password123").unwrap();
        assert!(verify_password("password123", &hash));
        assert!(!verify_password("password124", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let first = hash_password("password123").unwrap();
        let second = hash_password("password123").unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("$argon2id$"));
        assert!(!first.contains("password123"));
    }

    #[test]
    fn test_malformed_digest_does_not_match() {
        assert!(!verify_password("password123", ""));
        assert!(!verify_password("password123", "password123"));
        assert!(!verify_password("password123", "$argon2id$v=19$garbage"));
    }
}
