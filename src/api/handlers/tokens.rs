//! Handler for issuing authentication tokens.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use validator::Validate;

use crate::api::dto::token::{AuthenticationTokenResponse, CredentialsRequest};
use crate::error::AppError;
use crate::state::AppState;

/// Exchanges an email/password pair for a 24-hour authentication token.
///
/// # Endpoint
///
/// `POST /v1/tokens/authentication`
///
/// # Response
///
/// ```json
/// { "authentication_token": { "token": "IEYZQUBEMPPAKPOAWTPV6YJ6RM", "expiry": "2026-01-02T10:00:00Z" } }
/// ```
///
/// # Errors
///
/// - `401 Unauthorized` if the credentials don't match a user
/// - `422 Unprocessable Entity` if validation fails
pub async fn create_authentication_token_handler(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthenticationTokenResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let token = state
        .auth_service
        .create_authentication_token(&payload.email, &payload.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthenticationTokenResponse {
            authentication_token: token,
        }),
    ))
}
