//! Argon2id password hashes, stored in PHC string format.
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::error::RecordsError;

/// Hashes a password with a fresh random salt
///
/// # Errors
/// Fails only if argon2 rejects its own parameters.
pub fn hash_password(password: &str) -> Result<String, RecordsError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| RecordsError::PasswordHash(e.to_string()))?;
    Ok(hash.to_string())
}

/// Checks a password against a stored hash. A malformed hash never matches.
#[must_use]
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            log::warn!("Stored password hash is malformed: {e}");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() -> Result<(), RecordsError> {
        let hash = hash_password("secret1")?;
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
        Ok(())
    }

    #[test]
    fn same_password_gets_different_salts() -> Result<(), RecordsError> {
        assert_ne!(hash_password("secret1")?, hash_password("secret1")?);
        Ok(())
    }

    #[test]
    fn garbage_hash_does_not_verify() {
        assert!(!verify_password("secret1", "not-a-hash"));
    }
}
