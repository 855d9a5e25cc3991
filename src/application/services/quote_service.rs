//! Quote CRUD and listing.

use serde_json::json;
use std::sync::Arc;

use crate::domain::entities::{NewQuote, Quote, QuoteFilter, QuotePatch};
use crate::domain::repositories::QuoteRepository;
use crate::error::AppError;

/// Service for creating, reading, updating, deleting and listing quotes.
pub struct QuoteService {
    repository: Arc<dyn QuoteRepository>,
}

impl QuoteService {
    pub fn new(repository: Arc<dyn QuoteRepository>) -> Self {
        Self { repository }
    }

    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn create(&self, new_quote: NewQuote) -> Result<Quote, AppError> {
        let quote = self.repository.insert(new_quote).await?;
        tracing::debug!(quote_id = quote.id, "Quote created");
        Ok(quote)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no quote has this id.
    pub async fn get(&self, id: i64) -> Result<Quote, AppError> {
        self.repository
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))
    }

    /// Applies `patch` to the quote using optimistic concurrency.
    ///
    /// If `expected_version` is given and differs from the stored version, the
    /// update is refused before any write.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no quote has this id.
    /// Returns [`AppError::Conflict`] if the quote changed since it was read.
    pub async fn update(
        &self,
        id: i64,
        patch: QuotePatch,
        expected_version: Option<i32>,
    ) -> Result<Quote, AppError> {
        let current = self.get(id).await?;

        if let Some(expected) = expected_version
            && expected != current.version
        {
            return Err(edit_conflict());
        }

        let updated = patch.apply(current);

        self.repository
            .update(&updated)
            .await?
            .ok_or_else(edit_conflict)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if no quote has this id.
    pub async fn delete(&self, id: i64) -> Result<(), AppError> {
        if self.repository.delete(id).await? {
            Ok(())
        } else {
            Err(not_found(id))
        }
    }

    /// Returns one page of quotes and the total match count.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Internal`] on database errors.
    pub async fn list(&self, filter: &QuoteFilter) -> Result<(Vec<Quote>, i64), AppError> {
        self.repository.list(filter).await
    }
}

fn not_found(id: i64) -> AppError {
    AppError::not_found(
        "the requested resource could not be found",
        json!({ "id": id }),
    )
}

fn edit_conflict() -> AppError {
    AppError::conflict(
        "unable to update the record due to an edit conflict, please try again",
        json!({}),
    )
}
