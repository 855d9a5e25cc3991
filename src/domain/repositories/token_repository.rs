//! Repository trait for activation and authentication tokens.

use crate::domain::entities::{NewToken, TokenScope};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for token storage.
///
/// Only hashes are stored; plaintext tokens never reach this layer.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgTokenRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Stores a token hash.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, token: NewToken) -> Result<(), AppError>;

    /// Deletes every token of `scope` belonging to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete_all_for_user(&self, scope: TokenScope, user_id: i64) -> Result<(), AppError>;
}
