//! Bearer token to identity resolution.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::metrics::ResponseSink;
use crate::application::services::AuthService;
use crate::domain::entities::{Identity, TokenScope};
use crate::error::AppError;
use crate::utils::token_generator::is_valid_token_plaintext;

/// Resolves the `Authorization` header of a request into an [`Identity`].
#[derive(Clone)]
pub struct IdentityResolver {
    auth_service: Arc<AuthService>,
}

impl IdentityResolver {
    pub fn new(auth_service: Arc<AuthService>) -> Self {
        Self { auth_service }
    }

    /// Resolves the request headers into an identity.
    ///
    /// # Header Format
    ///
    /// ```text
    /// Authorization: Bearer <token>
    /// ```
    ///
    /// A missing header yields [`Identity::Anonymous`] without touching the
    /// store. A malformed header or token is rejected before any lookup.
    ///
    /// # Errors
    ///
    /// - [`AppError::InvalidToken`] for a malformed, unknown or expired token
    /// - [`AppError::Internal`] when the lookup fails
    pub async fn resolve(&self, headers: &HeaderMap) -> Result<Identity, AppError> {
        let Some(value) = headers.get(header::AUTHORIZATION) else {
            return Ok(Identity::Anonymous);
        };

        let token = parse_bearer(value).ok_or_else(AppError::invalid_token)?;

        if !is_valid_token_plaintext(token) {
            return Err(AppError::invalid_token());
        }

        match self
            .auth_service
            .user_for_token(TokenScope::Authentication, token)
            .await?
        {
            Some(user) => Ok(Identity::from(&user)),
            None => Err(AppError::invalid_token()),
        }
    }
}

/// Splits `Bearer <token>` into its token. Any other shape is rejected.
fn parse_bearer(value: &HeaderValue) -> Option<&str> {
    let mut parts = value.to_str().ok()?.split(' ');

    match (parts.next(), parts.next(), parts.next()) {
        (Some("Bearer"), Some(token), None) => Some(token),
        _ => None,
    }
}

/// Identity resolution middleware.
///
/// Inserts the resolved [`Identity`] into request extensions for the
/// authorization gates and handlers downstream. Every response, including
/// rejections, carries `Vary: Authorization`.
pub async fn layer(State(resolver): State<IdentityResolver>, mut req: Request, next: Next) -> Response {
    let mut response = match resolver.resolve(req.headers()).await {
        Ok(identity) => {
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        Err(e) => {
            tracing::debug!(error = %e, "Rejected bearer credential");
            ResponseSink::commit(req.extensions(), e)
        }
    };

    response
        .headers_mut()
        .append(header::VARY, HeaderValue::from_static("Authorization"));

    response
}
