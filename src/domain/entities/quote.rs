//! Quote entity and its listing filter.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A stored quote.
///
/// `version` starts at 1 and is bumped on every update; updates are rejected
/// when the caller's version no longer matches the stored one.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Quote {
    pub id: i64,
    pub content: String,
    pub author: String,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    pub version: i32,
}

/// Input data for creating a new quote.
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub content: String,
    pub author: String,
}

/// Partial update for an existing quote.
///
/// `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct QuotePatch {
    pub content: Option<String>,
    pub author: Option<String>,
}

impl QuotePatch {
    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.author.is_none()
    }

    /// Applies the patch on top of `quote`, leaving `version` untouched.
    pub fn apply(self, mut quote: Quote) -> Quote {
        if let Some(content) = self.content {
            quote.content = content;
        }
        if let Some(author) = self.author {
            quote.author = author;
        }
        quote
    }
}

/// Sort column accepted by the quote listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteSort {
    #[default]
    IdAsc,
    IdDesc,
    AuthorAsc,
    AuthorDesc,
    ContentAsc,
    ContentDesc,
}

impl QuoteSort {
    /// Values accepted in the `sort` query parameter.
    pub const SAFE_LIST: &'static [&'static str] =
        &["id", "author", "content", "-id", "-author", "-content"];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "id" => Some(Self::IdAsc),
            "-id" => Some(Self::IdDesc),
            "author" => Some(Self::AuthorAsc),
            "-author" => Some(Self::AuthorDesc),
            "content" => Some(Self::ContentAsc),
            "-content" => Some(Self::ContentDesc),
            _ => None,
        }
    }

    /// `ORDER BY` clause; `id` is always the tie-breaker so pages are stable.
    pub fn order_by(self) -> &'static str {
        match self {
            Self::IdAsc => "id ASC",
            Self::IdDesc => "id DESC",
            Self::AuthorAsc => "author ASC, id ASC",
            Self::AuthorDesc => "author DESC, id ASC",
            Self::ContentAsc => "content ASC, id ASC",
            Self::ContentDesc => "content DESC, id ASC",
        }
    }
}

/// Filter, sort and window for listing quotes.
#[derive(Debug, Clone)]
pub struct QuoteFilter {
    pub author: Option<String>,
    pub content: Option<String>,
    pub sort: QuoteSort,
    pub offset: i64,
    pub limit: i64,
}

impl Default for QuoteFilter {
    fn default() -> Self {
        Self {
            author: None,
            content: None,
            sort: QuoteSort::default(),
            offset: 0,
            limit: 20,
        }
    }
}
