//! Password hashing.
//!
//! One-way hashing and verification behind a trait so the expensive
//! Argon2 implementation can be swapped for a cheap fake in tests.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::auth::{AuthError, AuthResult};

/// One-way credential hashing contract.
///
/// `verify` answers with a bool: a mismatch and an unparseable stored
/// hash are indistinguishable to the caller, which keeps login failures
/// generic.
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password for storage
    fn hash(&self, password: &str) -> AuthResult<String>;

    /// Verify a plaintext password against a stored hash
    fn verify(&self, password: &str, hash: &str) -> bool;
}

/// Argon2id hasher with a server-side pepper.
///
/// The pepper is appended to the password before hashing so a leaked
/// database alone is not enough to mount an offline attack.
pub struct Argon2Hasher {
    pepper: String,
}

impl Argon2Hasher {
    pub fn new(pepper: String) -> Self {
        Self { pepper }
    }

    fn peppered(&self, password: &str) -> String {
        format!("{}{}", password, self.pepper)
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, password: &str) -> AuthResult<String> {
        let peppered = self.peppered(password);
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        Ok(argon2
            .hash_password(peppered.as_bytes(), &salt)
            .map_err(|_| AuthError::HashingFailed)?
            .to_string())
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        let peppered = self.peppered(password);
        let Ok(parsed_hash) = PasswordHash::new(hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(peppered.as_bytes(), &parsed_hash)
            .is_ok()
    }
}
