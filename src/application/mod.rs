//! Application layer services implementing business logic.
//!
//! This layer orchestrates domain operations by coordinating repository calls,
//! validation, and business rules. Services consume repository traits and provide
//! a clean API for HTTP handlers and the gatekeeper middleware.
//!
//! # Available Services
//!
//! - [`services::auth_service::AuthService`] - Token issuing, hashing and token-to-user resolution
//! - [`services::user_service::UserService`] - Registration and activation
//! - [`services::quote_service::QuoteService`] - Quote CRUD and listing

pub mod services;
