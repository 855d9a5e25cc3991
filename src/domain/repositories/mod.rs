//! Repository trait definitions for the domain layer.
//!
//! These traits are the Store as seen by the rest of the service. The
//! gatekeeper pipeline only depends on two of their operations:
//! [`UserRepository::get_for_token`] and [`PermissionRepository::get_all_for_user`].
//!
//! # Architecture
//!
//! - Traits define the contract for data operations
//! - Implementations live in `crate::infrastructure::persistence`
//! - Mock implementations are auto-generated via `mockall` for testing
//!
//! # Available Repositories
//!
//! - [`QuoteRepository`] - Quote CRUD and listing
//! - [`UserRepository`] - Accounts and token-to-user resolution
//! - [`TokenRepository`] - Activation and authentication tokens
//! - [`PermissionRepository`] - Per-user permission codes

pub mod permission_repository;
pub mod quote_repository;
pub mod token_repository;
pub mod user_repository;

pub use permission_repository::PermissionRepository;
pub use quote_repository::QuoteRepository;
pub use token_repository::TokenRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use permission_repository::MockPermissionRepository;
#[cfg(test)]
pub use quote_repository::MockQuoteRepository;
#[cfg(test)]
pub use token_repository::MockTokenRepository;
#[cfg(test)]
pub use user_repository::MockUserRepository;
