//! Handlers for user registration and activation.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use serde_json::json;
use validator::Validate;

use crate::api::dto::user::{ActivateUserRequest, RegisterUserRequest, UserResponse};
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::token_generator::is_valid_token_plaintext;

/// Registers a new user.
///
/// # Endpoint
///
/// `POST /v1/users`
///
/// The account starts inactive with the `quotes:read` permission. An
/// activation token is emailed in the background.
///
/// # Request Body
///
/// ```json
/// { "username": "alice", "email": "alice@example.com", "password": "pa55word123" }
/// ```
///
/// # Errors
///
/// - `400 Bad Request` for malformed JSON
/// - `422 Unprocessable Entity` if validation fails or the email is taken
pub async fn register_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<RegisterUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    let user = state
        .user_service
        .register(payload.username, payload.email, &payload.password)
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse { user })))
}

/// Activates the user owning an activation token.
///
/// # Endpoint
///
/// `PUT /v1/users/activated`
///
/// # Request Body
///
/// ```json
/// { "token": "IEYZQUBEMPPAKPOAWTPV6YJ6RM" }
/// ```
///
/// # Errors
///
/// - `409 Conflict` on a concurrent update of the same user
/// - `422 Unprocessable Entity` for a malformed, unknown or expired token
pub async fn activate_user_handler(
    State(state): State<AppState>,
    payload: Result<Json<ActivateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Json(payload) = payload?;

    if !is_valid_token_plaintext(&payload.token) {
        return Err(AppError::validation(
            "Validation failed",
            json!({ "token": "must be 26 characters from A-Z and 2-7" }),
        ));
    }

    let user = state.user_service.activate(&payload.token).await?;

    Ok(Json(UserResponse { user }))
}
