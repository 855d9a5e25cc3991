//! Per-client rate limiting backed by [`ClientRegistry`].

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use serde_json::json;
use std::sync::Arc;

use super::metrics::ResponseSink;
use crate::domain::client_registry::ClientRegistry;
use crate::error::AppError;
use crate::utils::client_ip::client_identifier;

/// Admits or rejects requests using one `governor` limiter per client.
///
/// # Client Identification
///
/// The peer socket address is used by default. With `trust_proxy` enabled the
/// first `X-Forwarded-For` hop (then `X-Real-IP`) takes precedence; enable it
/// only when the service runs behind a trusted reverse proxy.
#[derive(Clone)]
pub struct RateLimitGate {
    registry: Arc<ClientRegistry>,
    enabled: bool,
    trust_proxy: bool,
}

impl RateLimitGate {
    pub fn new(registry: Arc<ClientRegistry>, enabled: bool, trust_proxy: bool) -> Self {
        Self {
            registry,
            enabled,
            trust_proxy,
        }
    }

    pub fn registry(&self) -> &Arc<ClientRegistry> {
        &self.registry
    }
}

/// Rate limiting middleware.
///
/// # Errors
///
/// - `429 Too Many Requests` when the client's bucket is empty
/// - `500 Internal Server Error` when no client address is attached to the
///   request (the router was served without connect info)
///
/// # Example
///
/// ```rust,ignore
/// let app = Router::new()
///     .route("/v1/quotes", get(list_quotes_handler))
///     .layer(middleware::from_fn_with_state(gate, rate_limit::layer));
/// ```
pub async fn layer(State(gate): State<RateLimitGate>, req: Request, next: Next) -> Response {
    if !gate.enabled {
        return next.run(req).await;
    }

    let Some(client) = client_identifier(&req, gate.trust_proxy) else {
        tracing::error!("Rate limiter could not determine the client address");
        let error = AppError::internal(
            "the server encountered a problem and could not process your request",
            json!({}),
        );
        return ResponseSink::commit(req.extensions(), error);
    };

    if !gate.registry.admit(&client) {
        tracing::debug!(client = %client, "Rate limit exceeded");
        return ResponseSink::commit(req.extensions(), AppError::rate_limited());
    }

    next.run(req).await
}
