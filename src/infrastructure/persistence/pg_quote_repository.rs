//! PostgreSQL implementation of quote repository.

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{NewQuote, Quote, QuoteFilter};
use crate::domain::repositories::QuoteRepository;
use crate::error::AppError;

/// PostgreSQL repository for quote storage and retrieval.
pub struct PgQuoteRepository {
    pool: Arc<PgPool>,
}

impl PgQuoteRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

/// A listed quote together with the total number of matches.
#[derive(FromRow)]
struct CountedQuote {
    total: i64,
    #[sqlx(flatten)]
    quote: Quote,
}

#[async_trait]
impl QuoteRepository for PgQuoteRepository {
    async fn insert(&self, new_quote: NewQuote) -> Result<Quote, AppError> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            INSERT INTO quotes (content, author)
            VALUES ($1, $2)
            RETURNING id, content, author, created_at, version
            "#,
        )
        .bind(&new_quote.content)
        .bind(&new_quote.author)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(quote)
    }

    async fn get(&self, id: i64) -> Result<Option<Quote>, AppError> {
        let quote = sqlx::query_as::<_, Quote>(
            r#"
            SELECT id, content, author, created_at, version
            FROM quotes
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(quote)
    }

    async fn update(&self, quote: &Quote) -> Result<Option<Quote>, AppError> {
        let updated = sqlx::query_as::<_, Quote>(
            r#"
            UPDATE quotes
            SET content = $1, author = $2, version = version + 1
            WHERE id = $3 AND version = $4
            RETURNING id, content, author, created_at, version
            "#,
        )
        .bind(&quote.content)
        .bind(&quote.author)
        .bind(quote.id)
        .bind(quote.version)
        .fetch_optional(self.pool.as_ref())
        .await?;

        Ok(updated)
    }

    async fn delete(&self, id: i64) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM quotes WHERE id = $1")
            .bind(id)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, filter: &QuoteFilter) -> Result<(Vec<Quote>, i64), AppError> {
        // ORDER BY comes from a closed enum, never from raw input.
        let sql = format!(
            r#"
            SELECT COUNT(*) OVER() AS total, id, content, author, created_at, version
            FROM quotes
            WHERE ($1::TEXT IS NULL OR author ILIKE $1 ESCAPE '\')
              AND ($2::TEXT IS NULL OR content ILIKE $2 ESCAPE '\')
            ORDER BY {}
            LIMIT $3 OFFSET $4
            "#,
            filter.sort.order_by()
        );

        let rows = sqlx::query_as::<_, CountedQuote>(&sql)
            .bind(filter.author.as_deref().map(contains_pattern))
            .bind(filter.content.as_deref().map(contains_pattern))
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(self.pool.as_ref())
            .await?;

        let total = rows.first().map_or(0, |row| row.total);
        let quotes = rows.into_iter().map(|row| row.quote).collect();

        Ok((quotes, total))
    }
}

/// `ILIKE` pattern matching `needle` literally anywhere in the column.
///
/// `%`, `_` and the escape character itself lose their wildcard meaning.
fn contains_pattern(needle: &str) -> String {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
