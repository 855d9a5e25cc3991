//! Data Transfer Objects for API requests and responses.
//!
//! DTOs decouple the API contract from domain entities and carry the
//! `validator` rules applied at the HTTP boundary.

use std::borrow::Cow;

use validator::ValidationError;

pub mod debug_vars;
pub mod health;
pub mod pagination;
pub mod quote;
pub mod token;
pub mod user;

/// Checks `value` is `min..=max` UTF-8 bytes long.
///
/// `validator`'s `length` rule counts characters, so byte limits go through
/// `custom` functions built on this.
pub(crate) fn byte_length(value: &str, min: usize, max: usize) -> Result<(), ValidationError> {
    if (min..=max).contains(&value.len()) {
        return Ok(());
    }
    Err(ValidationError::new("length")
        .with_message(Cow::Owned(format!("must be between {min} and {max} bytes long"))))
}

pub(crate) fn validate_password(password: &str) -> Result<(), ValidationError> {
    byte_length(password, 8, 72)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_length_bounds_are_inclusive() {
        assert!(byte_length("a", 1, 3).is_ok());
        assert!(byte_length("abc", 1, 3).is_ok());
        assert!(byte_length("", 1, 3).is_err());
        assert!(byte_length("abcd", 1, 3).is_err());
    }

    #[test]
    fn test_byte_length_counts_bytes_not_chars() {
        // two characters, four bytes
        assert!(byte_length("éé", 1, 3).is_err());
        assert!(byte_length("éé", 1, 4).is_ok());
    }

    #[test]
    fn test_password_limit_is_seventy_two_bytes() {
        assert!(validate_password(&"a".repeat(72)).is_ok());
        assert!(validate_password(&"ä".repeat(37)).is_err());
        assert!(validate_password("short").is_err());
    }
}
