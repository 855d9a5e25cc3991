//! Repository trait for quote data access.

use crate::domain::entities::{NewQuote, Quote, QuoteFilter};
use crate::error::AppError;
use async_trait::async_trait;

/// Repository interface for managing quotes.
///
/// # Implementations
///
/// - [`crate::infrastructure::persistence::PgQuoteRepository`] - PostgreSQL implementation
/// - Test mocks available with `cfg(test)`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteRepository: Send + Sync {
    /// Inserts a new quote and returns the stored record (`version = 1`).
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn insert(&self, new_quote: NewQuote) -> Result<Quote, AppError>;

    /// Finds a quote by id.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn get(&self, id: i64) -> Result<Option<Quote>, AppError>;

    /// Writes `quote` back if its `version` still matches the stored one.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(quote))` with the bumped version on success
    /// - `Ok(None)` if the row was changed or deleted concurrently
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn update(&self, quote: &Quote) -> Result<Option<Quote>, AppError>;

    /// Deletes a quote. Returns `false` if it did not exist.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn delete(&self, id: i64) -> Result<bool, AppError>;

    /// Lists one page of quotes matching `filter`, plus the total match count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    async fn list(&self, filter: &QuoteFilter) -> Result<(Vec<Quote>, i64), AppError>;
}
