use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand_core::OsRng;

use super::error::{AuthError, Result};

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Hash a password using Argon2 with a fresh random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::HashingError(e.to_string()))
}

/// Verify a password against a stored hash. A stored value that is not a
/// valid PHC string never matches.
pub fn verify_password(password: &str, hash: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "123456";
        let hash = hash_password(password).unwrap();

        assert_ne!(hash, password);
        assert!(verify_password(password, &hash));
        assert!(!verify_password("1234567", &hash));
    }

    #[test]
    fn test_different_salts() {
        let hash1 = hash_password("same_password").unwrap();
        let hash2 = hash_password("same_password").unwrap();

        assert_ne!(hash1, hash2);
        assert!(verify_password("same_password", &hash1));
        assert!(verify_password("same_password", &hash2));
    }

    #[test]
    fn test_phc_shaped_password_is_still_hashed() {
        let hash = hash_password("$secret1").unwrap();
        assert_ne!(hash, "$secret1");
        assert!(verify_password("$secret1", &hash));

        // A submitted value that is itself a PHC string is a password like any other
        let nested = hash_password(&hash).unwrap();
        assert_ne!(nested, hash);
        assert!(verify_password(&hash, &nested));
        assert!(!verify_password("$secret1", &nested));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        assert!(!verify_password("secret1", "not-a-hash"));
    }
}
