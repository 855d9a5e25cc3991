//! Handler for the metrics snapshot endpoint.

use axum::{Json, extract::State};

use crate::api::dto::debug_vars::DebugVarsResponse;
use crate::state::AppState;

/// Returns the process-wide request counters.
///
/// # Endpoint
///
/// `GET /debug/vars`
///
/// # Response
///
/// ```json
/// {
///   "version": "0.1.0",
///   "total_requests_received": 12,
///   "total_responses_sent": 11,
///   "total_processing_time_us": 5310,
///   "total_responses_sent_by_status": { "200": 9, "429": 2 }
/// }
/// ```
///
/// The request being served is counted as received but not yet as sent.
pub async fn debug_vars_handler(State(state): State<AppState>) -> Json<DebugVarsResponse> {
    Json(DebugVarsResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        metrics: state.metrics.snapshot(),
    })
}
