//! Password hashing and verification (Argon2id, PHC string format).
//!
//! Plaintext passwords exist only between request deserialization and the
//! hash call; everything downstream (pending verifications, accounts)
//! carries the PHC-encoded hash.

use anyhow::{anyhow, Result};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, PasswordHash,
};

/// Minimum accepted password length, enforced before hashing.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String> {
    // ---
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash string.
///
/// Returns `false` for unparseable hashes instead of erroring; a corrupt
/// hash means the credential cannot match.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    // ---
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}
