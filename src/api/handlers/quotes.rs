//! Handlers for quote endpoints.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderMap, HeaderValue, StatusCode, header},
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::pagination::{PageMetadata, QuoteListParams};
use crate::api::dto::quote::{
    CreateQuoteRequest, QuoteListResponse, QuoteResponse, UpdateQuoteRequest,
};
use crate::error::AppError;
use crate::state::AppState;

/// Lists quotes with filtering, sorting and pagination.
///
/// # Endpoint
///
/// `GET /v1/quotes?author=knuth&content=code&page=1&page_size=20&sort=-id`
///
/// Requires the `quotes:read` permission.
///
/// # Query Parameters
///
/// - `author`, `content` - case-insensitive substring filters
/// - `page` - page number, starting at 1
/// - `page_size` - 1 to 100 (default: 20)
/// - `sort` - one of `id`, `author`, `content`, prefixed with `-` for descending
///
/// # Response
///
/// ```json
/// {
///   "quotes": [{ "id": 1, "content": "...", "author": "...", "version": 1 }],
///   "metadata": { "current_page": 1, "page_size": 20, "first_page": 1, "last_page": 1, "total_records": 1 }
/// }
/// ```
pub async fn list_quotes_handler(
    State(state): State<AppState>,
    params: Result<Query<QuoteListParams>, QueryRejection>,
) -> Result<Json<QuoteListResponse>, AppError> {
    let Query(params) = params?;
    let (filter, page, page_size) = params.into_filter()?;

    let (quotes, total) = state.quote_service.list(&filter).await?;

    Ok(Json(QuoteListResponse {
        quotes,
        metadata: PageMetadata::new(total, page, page_size),
    }))
}

/// Creates a quote.
///
/// # Endpoint
///
/// `POST /v1/quotes`
///
/// Requires the `quotes:write` permission.
///
/// # Request Body
///
/// ```json
/// { "content": "Talk is cheap. Show me the code.", "author": "Linus Torvalds" }
/// ```
///
/// # Response
///
/// `201 Created` with `Location: /v1/quotes/{id}`.
///
/// # Errors
///
/// - `400 Bad Request` for malformed JSON
/// - `422 Unprocessable Entity` if validation fails
pub async fn create_quote_handler(
    State(state): State<AppState>,
    payload: Result<Json<CreateQuoteRequest>, JsonRejection>,
) -> Result<(StatusCode, HeaderMap, Json<QuoteResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let quote = state.quote_service.create(payload.into()).await?;

    let mut headers = HeaderMap::new();
    let location = HeaderValue::from_str(&format!("/v1/quotes/{}", quote.id))
        .map_err(|e| AppError::internal(e.to_string(), json!({})))?;
    headers.insert(header::LOCATION, location);

    Ok((StatusCode::CREATED, headers, Json(QuoteResponse { quote })))
}

/// Returns a single quote.
///
/// # Endpoint
///
/// `GET /v1/quotes/{id}`
///
/// Requires the `quotes:read` permission.
///
/// # Errors
///
/// Returns `404 Not Found` if the id is not a positive integer or no quote has it.
pub async fn show_quote_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<QuoteResponse>, AppError> {
    let id = quote_id(id)?;
    let quote = state.quote_service.get(id).await?;

    Ok(Json(QuoteResponse { quote }))
}

/// Partially updates a quote.
///
/// # Endpoint
///
/// `PATCH /v1/quotes/{id}`
///
/// Requires the `quotes:write` permission.
///
/// # Request Body
///
/// All fields are optional, but at least one of `content` / `author` must be set.
///
/// ```json
/// { "author": "Linus", "version": 3 }
/// ```
///
/// # Errors
///
/// - `404 Not Found` if the quote doesn't exist
/// - `409 Conflict` if `version` is stale or a concurrent update won
/// - `422 Unprocessable Entity` if validation fails
pub async fn update_quote_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateQuoteRequest>, JsonRejection>,
) -> Result<Json<QuoteResponse>, AppError> {
    let id = quote_id(id)?;
    let Json(payload) = payload?;
    payload.validate()?;

    let (patch, expected_version) = payload.into_parts();
    if patch.is_empty() {
        return Err(AppError::validation(
            "Validation failed",
            json!({ "body": "must contain content or author" }),
        ));
    }

    let quote = state
        .quote_service
        .update(id, patch, expected_version)
        .await?;

    Ok(Json(QuoteResponse { quote }))
}

/// Deletes a quote.
///
/// # Endpoint
///
/// `DELETE /v1/quotes/{id}`
///
/// Requires the `quotes:write` permission.
///
/// # Response
///
/// ```json
/// { "message": "quote successfully deleted" }
/// ```
pub async fn delete_quote_handler(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> Result<Json<serde_json::Value>, AppError> {
    let id = quote_id(id)?;
    state.quote_service.delete(id).await?;

    Ok(Json(json!({ "message": "quote successfully deleted" })))
}

fn quote_id(id: Result<Path<i64>, PathRejection>) -> Result<i64, AppError> {
    let Path(id) = id?;

    if id < 1 {
        return Err(AppError::not_found(
            "the requested resource could not be found",
            json!({ "id": id }),
        ));
    }

    Ok(id)
}
