//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `/v1/*`          - REST API, see [`crate::api::routes`]
//! - `GET /debug/vars` - Request metrics snapshot (public)
//!
//! # Middleware
//!
//! Outermost first: tracing, metrics, panic recovery, CORS, rate limiting,
//! identity resolution. Authorization gates are attached per route.
//! Trailing slashes are trimmed before routing.

use crate::api;
use crate::api::handlers::{debug_vars_handler, method_not_allowed_handler, not_found_handler};
use crate::api::middleware::{
    CorsPolicy, IdentityResolver, RateLimitGate, authenticate, cors, metrics, panic, rate_limit,
    tracing,
};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the application router with all routes and middleware.
///
/// # Arguments
///
/// - `state` - shared application state injected into all handlers
/// - `limiter` - per-client rate limiter; its registry is shared with the evictor
/// - `cors_policy` - trusted origins for CORS responses
pub fn app_router(
    state: AppState,
    limiter: RateLimitGate,
    cors_policy: CorsPolicy,
) -> NormalizePath<Router> {
    let resolver = IdentityResolver::new(state.auth_service.clone());
    let request_metrics = state.metrics.clone();

    let router = api::routes::v1_routes(state.permissions.clone())
        .route("/debug/vars", get(debug_vars_handler))
        .fallback(not_found_handler)
        .method_not_allowed_fallback(method_not_allowed_handler)
        .with_state(state)
        .layer(middleware::from_fn_with_state(resolver, authenticate::layer))
        .layer(middleware::from_fn_with_state(limiter, rate_limit::layer))
        .layer(middleware::from_fn_with_state(cors_policy, cors::layer))
        .layer(panic::layer())
        .layer(middleware::from_fn_with_state(request_metrics, metrics::layer))
        .layer(tracing::layer());

    NormalizePathLayer::trim_trailing_slash().layer(router)
}
