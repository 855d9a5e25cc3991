//! PostgreSQL repository implementations.
//!
//! Concrete implementations of domain repository traits using SQLx with
//! bound parameters for every user-supplied value.
//!
//! # Repositories
//!
//! - [`PgQuoteRepository`] - Quote storage and listing
//! - [`PgUserRepository`] - Accounts and token-to-user resolution
//! - [`PgTokenRepository`] - Token hash storage
//! - [`PgPermissionRepository`] - Per-user permission codes

pub mod pg_permission_repository;
pub mod pg_quote_repository;
pub mod pg_token_repository;
pub mod pg_user_repository;

pub use pg_permission_repository::PgPermissionRepository;
pub use pg_quote_repository::PgQuoteRepository;
pub use pg_token_repository::PgTokenRepository;
pub use pg_user_repository::PgUserRepository;
