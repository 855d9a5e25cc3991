//! DTOs for user endpoints.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::{byte_length, validate_password};

use crate::domain::entities::User;

/// Request body for `POST /v1/users`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterUserRequest {
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

fn validate_username(username: &str) -> Result<(), ValidationError> {
    byte_length(username, 1, 200)
}

/// Request body for `PUT /v1/users/activated`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ActivateUserRequest {
    pub token: String,
}

/// `{"user": {...}}`
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}
