//! Fallback for unmatched routes.

use serde_json::json;

use crate::error::AppError;

/// Renders unknown paths as a `404` error envelope.
pub async fn not_found_handler() -> AppError {
    AppError::not_found("the requested resource could not be found", json!({}))
}

/// Renders a known path with an unsupported method as a `405` error envelope.
pub async fn method_not_allowed_handler() -> AppError {
    AppError::method_not_allowed()
}
