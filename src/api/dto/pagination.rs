//! Pagination, filtering and sorting query parameters for quote listing.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::{QuoteFilter, QuoteSort};
use crate::error::AppError;

const DEFAULT_PAGE_SIZE: u32 = 20;
const MAX_PAGE: u32 = 10_000_000;
const MAX_PAGE_SIZE: u32 = 100;

/// Query parameters of `GET /v1/quotes`.
///
/// Uses `serde_with` to parse page numbers from query strings as integers.
#[serde_as]
#[derive(Debug, Default, Deserialize)]
pub struct QuoteListParams {
    #[serde(default)]
    pub author: Option<String>,

    #[serde(default)]
    pub content: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page: Option<u32>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub page_size: Option<u32>,

    #[serde(default)]
    pub sort: Option<String>,
}

impl QuoteListParams {
    /// Validates the parameters and converts them into a repository filter.
    ///
    /// # Defaults
    ///
    /// - `page`: 1
    /// - `page_size`: 20
    /// - `sort`: `id`
    ///
    /// Empty `author` / `content` values are treated as absent.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] listing every offending field.
    pub fn into_filter(self) -> Result<(QuoteFilter, u32, u32), AppError> {
        let page = self.page.unwrap_or(1);
        let page_size = self.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
        let mut errors = Map::new();

        if !(1..=MAX_PAGE).contains(&page) {
            errors.insert(
                "page".into(),
                json!("must be between 1 and 10000000"),
            );
        }

        if !(1..=MAX_PAGE_SIZE).contains(&page_size) {
            errors.insert("page_size".into(), json!("must be between 1 and 100"));
        }

        let sort = match self.sort.as_deref() {
            None | Some("") => Some(QuoteSort::default()),
            Some(value) => QuoteSort::parse(value),
        };
        if sort.is_none() {
            errors.insert("sort".into(), json!("invalid sort value"));
        }

        let Some(sort) = sort.filter(|_| errors.is_empty()) else {
            return Err(AppError::validation(
                "Validation failed",
                Value::Object(errors),
            ));
        };

        let filter = QuoteFilter {
            author: self.author.filter(|a| !a.is_empty()),
            content: self.content.filter(|c| !c.is_empty()),
            sort,
            offset: i64::from(page - 1) * i64::from(page_size),
            limit: i64::from(page_size),
        };

        Ok((filter, page, page_size))
    }
}

/// Pagination metadata returned alongside a page of results.
///
/// Serializes as `{}` when there are no matching records.
#[derive(Debug, Default, PartialEq, Serialize)]
pub struct PageMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_records: Option<i64>,
}

impl PageMetadata {
    pub fn new(total_records: i64, page: u32, page_size: u32) -> Self {
        if total_records == 0 {
            return Self::default();
        }

        let page_size_i64 = i64::from(page_size);

        Self {
            current_page: Some(page),
            page_size: Some(page_size),
            first_page: Some(1),
            last_page: Some((total_records + page_size_i64 - 1) / page_size_i64),
            total_records: Some(total_records),
        }
    }
}
