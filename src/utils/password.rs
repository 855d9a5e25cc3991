//! Argon2id password hashing.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use serde_json::json;

use crate::error::AppError;

const SALT_LENGTH: usize = 16;

/// Hashes `password` into a PHC string (`$argon2id$v=19$...`).
///
/// # Errors
///
/// Returns [`AppError::Internal`] if salt generation or hashing fails.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let mut salt = [0u8; SALT_LENGTH];
    getrandom::fill(&mut salt).map_err(|e| {
        tracing::error!(error = %e, "system RNG failure");
        AppError::internal("Failed to hash password", json!({}))
    })?;

    let salt = SaltString::encode_b64(&salt).map_err(|e| {
        tracing::error!(error = %e, "salt encoding failure");
        AppError::internal("Failed to hash password", json!({}))
    })?;

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!(error = %e, "password hashing failure");
            AppError::internal("Failed to hash password", json!({}))
        })
}

/// Checks `password` against a stored PHC hash.
///
/// A malformed stored hash is treated as a mismatch.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        tracing::warn!("stored password hash is not a valid PHC string");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
