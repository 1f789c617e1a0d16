//! Password hashing.
//!
//! Salted adaptive hashing via bcrypt at a fixed cost. Verification is a
//! boolean check: a mismatch or an unparsable digest is `false`, never an
//! error surfaced to the caller.

use anyhow::{Context, Result};
use bcrypt::{hash, verify, DEFAULT_COST};

pub fn hash_password(plain: &str) -> Result<String> {
    hash(plain, DEFAULT_COST).context("Failed to hash password")
}

pub fn verify_password(plain: &str, hashed: &str) -> bool {
    verify(plain, hashed).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let digest = hash_password("correct horse battery staple").unwrap();
        assert_ne!(digest, "correct horse battery staple");
        assert!(verify_password("correct horse battery staple", &digest));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let digest = hash_password("secret").unwrap();
        assert!(!verify_password("not-the-secret", &digest));
    }

    #[test]
    fn test_malformed_digest_is_false_not_error() {
        assert!(!verify_password("secret", "not-a-bcrypt-digest"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-input").unwrap();
        let b = hash_password("same-input").unwrap();
        assert_ne!(a, b);
    }
}
