//! Application error type and its JSON envelope.
//!
//! Every failure that reaches the client is rendered as:
//!
//! ```json
//! { "error": { "code": "not_permitted", "message": "...", "details": {} } }
//! ```

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Serializable error payload, also embedded in batch-style responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed request body or query string.
    #[error("{message}")]
    BadRequest { message: String, details: Value },

    /// Well-formed input that failed field validation.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Missing, malformed, unknown or expired bearer token.
    #[error("{message}")]
    InvalidToken { message: String, details: Value },

    /// Anonymous identity on a route that needs an authenticated one.
    #[error("{message}")]
    AuthenticationRequired { message: String, details: Value },

    /// Email/password pair that does not match a user.
    #[error("{message}")]
    InvalidCredentials { message: String, details: Value },

    #[error("{message}")]
    InactiveAccount { message: String, details: Value },

    #[error("{message}")]
    NotPermitted { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    #[error("{message}")]
    MethodNotAllowed { message: String, details: Value },

    #[error("{message}")]
    Conflict { message: String, details: Value },

    #[error("{message}")]
    RateLimited { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::BadRequest {
            message: message.into(),
            details,
        }
    }

    pub fn validation(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn invalid_token() -> Self {
        Self::InvalidToken {
            message: "invalid or missing authentication token".to_string(),
            details: json!({}),
        }
    }

    pub fn authentication_required() -> Self {
        Self::AuthenticationRequired {
            message: "you must be authenticated to access this resource".to_string(),
            details: json!({}),
        }
    }

    pub fn invalid_credentials() -> Self {
        Self::InvalidCredentials {
            message: "invalid authentication credentials".to_string(),
            details: json!({}),
        }
    }

    pub fn inactive_account() -> Self {
        Self::InactiveAccount {
            message: "your user account must be activated to access this resource".to_string(),
            details: json!({}),
        }
    }

    pub fn not_permitted(permission: &str) -> Self {
        Self::NotPermitted {
            message: "your user account doesn't have the necessary permissions to access this resource"
                .to_string(),
            details: json!({ "required": permission }),
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn method_not_allowed() -> Self {
        Self::MethodNotAllowed {
            message: "the method is not supported for this resource".to_string(),
            details: json!({}),
        }
    }

    pub fn conflict(message: impl Into<String>, details: Value) -> Self {
        Self::Conflict {
            message: message.into(),
            details,
        }
    }

    pub fn rate_limited() -> Self {
        Self::RateLimited {
            message: "rate limit exceeded".to_string(),
            details: json!({}),
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// HTTP status this error is rendered with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidToken { .. }
            | AppError::AuthenticationRequired { .. }
            | AppError::InvalidCredentials { .. } => StatusCode::UNAUTHORIZED,
            AppError::InactiveAccount { .. } | AppError::NotPermitted { .. } => {
                StatusCode::FORBIDDEN
            }
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for the `error.code` field.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::BadRequest { .. } => "bad_request",
            AppError::Validation { .. } => "validation_error",
            AppError::InvalidToken { .. } => "invalid_token",
            AppError::AuthenticationRequired { .. } => "authentication_required",
            AppError::InvalidCredentials { .. } => "invalid_credentials",
            AppError::InactiveAccount { .. } => "inactive_account",
            AppError::NotPermitted { .. } => "not_permitted",
            AppError::NotFound { .. } => "not_found",
            AppError::MethodNotAllowed { .. } => "method_not_allowed",
            AppError::Conflict { .. } => "conflict",
            AppError::RateLimited { .. } => "rate_limited",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn to_error_info(&self) -> ErrorInfo {
        let (message, details) = match self {
            AppError::BadRequest { message, details }
            | AppError::Validation { message, details }
            | AppError::InvalidToken { message, details }
            | AppError::AuthenticationRequired { message, details }
            | AppError::InvalidCredentials { message, details }
            | AppError::InactiveAccount { message, details }
            | AppError::NotPermitted { message, details }
            | AppError::NotFound { message, details }
            | AppError::MethodNotAllowed { message, details }
            | AppError::Conflict { message, details }
            | AppError::RateLimited { message, details }
            | AppError::Internal { message, details } => (message.clone(), details.clone()),
        };

        ErrorInfo {
            code: self.code(),
            message,
            details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let bearer_challenge = status == StatusCode::UNAUTHORIZED;

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        let mut response = (status, Json(body)).into_response();

        // RFC 6750
        if bearer_challenge {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }

        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).unwrap_or_else(|_| json!({}));
        AppError::validation("Validation failed", details)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(
            "body contains badly-formed JSON",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::bad_request(
            "invalid query string",
            json!({ "reason": rejection.body_text() }),
        )
    }
}

// A non-numeric id can never match a record.
impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::not_found("the requested resource could not be found", json!({}))
    }
}

/// Maps a database error to an [`AppError`], logging anything that is not a
/// client-caused constraint violation.
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::conflict(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    tracing::error!(error = %e, "database error");
    AppError::internal("the server encountered a problem and could not process your request", json!({}))
}
