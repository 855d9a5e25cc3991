//! Repository trait for user accounts.

use crate::domain::entities::{NewUser, TokenScope, User};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for user accounts.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgUserRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new, not yet activated user.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the email is already registered.
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_user: NewUser) -> Result<User, AppError>;

    /// Finds a user by email address.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn get_by_email(&self, email: &str) -> Result<Option<User>, AppError>;

    /// Resolves a token hash of the given scope to its owner.
    ///
    /// Expired tokens resolve to `Ok(None)`, the same as unknown ones.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn get_for_token(
        &self,
        scope: TokenScope,
        token_hash: &str,
    ) -> Result<Option<User>, AppError>;

    /// Writes `user` back if its `version` still matches the stored one.
    ///
    /// Returns `Ok(None)` on a version mismatch.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] if the new email is already taken.
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, user: &User) -> Result<Option<User>, AppError>;
}
