//! DTOs for quote endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::byte_length;
use super::pagination::PageMetadata;
use crate::domain::entities::{NewQuote, Quote, QuotePatch};

/// Request body for `POST /v1/quotes`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CreateQuoteRequest {
    #[validate(custom(function = "validate_content"))]
    pub content: String,

    #[validate(custom(function = "validate_author"))]
    pub author: String,
}

impl From<CreateQuoteRequest> for NewQuote {
    fn from(req: CreateQuoteRequest) -> Self {
        NewQuote {
            content: req.content,
            author: req.author,
        }
    }
}

/// Request body for `PATCH /v1/quotes/{id}`.
///
/// `version`, when present, must match the stored version or the update is
/// refused with `409 Conflict`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct UpdateQuoteRequest {
    #[validate(custom(function = "validate_content"))]
    pub content: Option<String>,

    #[validate(custom(function = "validate_author"))]
    pub author: Option<String>,

    pub version: Option<i32>,
}

impl UpdateQuoteRequest {
    pub fn into_parts(self) -> (QuotePatch, Option<i32>) {
        (
            QuotePatch {
                content: self.content,
                author: self.author,
            },
            self.version,
        )
    }
}

fn validate_content(content: &str) -> Result<(), ValidationError> {
    byte_length(content, 1, 100)
}

fn validate_author(author: &str) -> Result<(), ValidationError> {
    byte_length(author, 1, 25)
}

/// `{"quote": {...}}`
#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    pub quote: Quote,
}

/// `{"quotes": [...], "metadata": {...}}`
#[derive(Debug, Serialize)]
pub struct QuoteListResponse {
    pub quotes: Vec<Quote>,
    pub metadata: PageMetadata,
}
