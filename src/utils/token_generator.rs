//! Random token generation and plaintext format validation.
//!
//! Tokens are 16 random bytes encoded as unpadded RFC 4648 base32, which
//! always yields 26 characters from `A-Z` and `2-7`.

use data_encoding::BASE32_NOPAD;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;

use crate::error::AppError;

/// Length of a plaintext token.
pub const TOKEN_LENGTH: usize = 26;

/// Random bytes behind each token.
const TOKEN_BYTES: usize = 16;

static TOKEN_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z2-7]{26}$").expect("token regex is valid"));

/// Generates a cryptographically secure random plaintext token.
///
/// # Errors
///
/// Returns [`AppError::Internal`] if the system random number generator fails.
///
/// # Examples
///
/// ```ignore
/// let token = generate_token()?;
/// assert_eq!(token.len(), 26);
/// assert!(is_valid_token_plaintext(&token));
/// ```
pub fn generate_token() -> Result<String, AppError> {
    let mut buffer = [0u8; TOKEN_BYTES];

    getrandom::fill(&mut buffer).map_err(|e| {
        tracing::error!(error = %e, "system RNG failure");
        AppError::internal("Failed to generate token", json!({}))
    })?;

    Ok(BASE32_NOPAD.encode(&buffer))
}

/// Returns true if `token` has the shape of a token this service issues.
///
/// Used to reject malformed credentials before any database lookup.
pub fn is_valid_token_plaintext(token: &str) -> bool {
    TOKEN_REGEX.is_match(token)
}
