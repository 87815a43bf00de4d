//! Password hashing and verification.
//!
//! Argon2id (hybrid mode) with OsRng salts, stored in PHC string format.
//! Verification goes through the argon2 primitive, never a comparison of
//! hashes, so its work factor does not depend on attacker-controlled input.

use std::sync::OnceLock;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::AuthResult;

/// Hash a password for storage using Argon2id.
///
/// Uses a cryptographically secure random salt and the default parameters
/// (memory cost, time cost, parallelism). Two hashes of the same password
/// therefore never compare equal.
///
/// # Errors
///
/// Returns `AuthError::Hash` if hashing fails (rare).
pub fn hash_password(password: &str) -> AuthResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Verify a password against a stored Argon2 PHC hash.
///
/// Returns `Ok(true)` on a match, `Ok(false)` on a mismatch. Errors only if
/// the stored hash string itself is malformed.
pub fn verify_password(password: &str, hash: &str) -> AuthResult<bool> {
    let parsed_hash = PasswordHash::new(hash)?;
    let result = Argon2::default().verify_password(password.as_bytes(), &parsed_hash);
    Ok(result.is_ok())
}

/// Burn the same verification work as a real check, discarding the result.
///
/// Called on the unknown-email login path so that "no such account" and
/// "wrong password" take comparable time; without it the missing-account
/// branch would short-circuit before any hashing work and leak which check
/// failed through response timing.
pub fn dummy_verify(password: &str) {
    static DUMMY_HASH: OnceLock<String> = OnceLock::new();
    let hash = DUMMY_HASH.get_or_init(|| {
        hash_password("roster-dummy-password").expect("hashing a fixed string cannot fail")
    });
    let _ = verify_password(password, hash);
}
