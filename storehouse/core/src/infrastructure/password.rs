// Copyright (c) 2026 Storehouse contributors
// SPDX-License-Identifier: AGPL-3.0
//! # Credential Hashing
//!
//! User passwords are stored as Argon2id PHC strings (algorithm, parameters
//! and salt embedded in the string). Verification goes through the argon2
//! crate, which compares digests in constant time.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("failed to hash credential: {0}")]
    Hash(String),

    #[error("stored credential is malformed: {0}")]
    MalformedHash(String),
}

/// Hashes and verifies login credentials.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, CredentialError>;

    /// `Ok(false)` for a wrong password; `Err` only when the stored hash
    /// cannot be parsed.
    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialError>;
}

#[derive(Debug, Clone, Default)]
pub struct Argon2CredentialHasher;

impl Argon2CredentialHasher {
    pub fn new() -> Self {
        Self
    }
}

impl CredentialHasher for Argon2CredentialHasher {
    fn hash(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Hash(e.to_string()))
    }

    fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(stored_hash)
            .map_err(|e| CredentialError::MalformedHash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hasher = Argon2CredentialHasher::new();
        let hash = hasher.hash("Offering2024").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify("Offering2024", &hash).unwrap());
        assert!(!hasher.verify("offering2024", &hash).unwrap());
    }

    #[test]
    fn test_salts_differ() {
        let hasher = Argon2CredentialHasher::new();
        let a = hasher.hash("Offering2024").unwrap();
        let b = hasher.hash("Offering2024").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let hasher = Argon2CredentialHasher::new();
        assert!(matches!(
            hasher.verify("Offering2024", "plaintext"),
            Err(CredentialError::MalformedHash(_))
        ));
    }
}
