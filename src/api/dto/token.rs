//! DTOs for token endpoints.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_password;

use crate::domain::entities::Token;

/// Request body for `POST /v1/tokens/authentication`.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct CredentialsRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(custom(function = "validate_password"))]
    pub password: String,
}

/// `{"authentication_token": {"token": "...", "expiry": "..."}}`
#[derive(Debug, Serialize)]
pub struct AuthenticationTokenResponse {
    pub authentication_token: Token,
}
