//! Utility functions for token generation, password hashing, and request handling.
//!
//! - [`token_generator`] - Random token generation and plaintext format validation
//! - [`password`] - Argon2id password hashing
//! - [`client_ip`] - Client identifier extraction for rate limiting

pub mod client_ip;
pub mod password;
pub mod token_generator;
