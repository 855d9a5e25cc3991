//! Repository trait for permission codes.

use crate::domain::entities::Permissions;
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for per-user permissions.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgPermissionRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PermissionRepository: Send + Sync {
    /// Fetches every permission code granted to `user_id`.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn get_all_for_user(&self, user_id: i64) -> Result<Permissions, AppError>;

    /// Grants `code` to `user_id`. Granting an already held code is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if `code` is not a known permission.
    /// Returns [`AppError::Internal`] on database errors.
    async fn add_for_user(&self, user_id: i64, code: &str) -> Result<(), AppError>;

    /// Revokes `code` from `user_id`. Returns `false` if it was not held.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn remove_for_user(&self, user_id: i64, code: &str) -> Result<bool, AppError>;
}
