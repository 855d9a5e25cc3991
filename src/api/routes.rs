//! API route configuration.
//!
//! Quote routes are gated per method with [`AuthorizationGate`]; account and
//! token routes are public.

use crate::api::handlers::{
    activate_user_handler, create_authentication_token_handler, create_quote_handler,
    delete_quote_handler, health_handler, list_quotes_handler, register_user_handler,
    show_quote_handler, update_quote_handler,
};
use crate::api::middleware::{AuthorizationGate, authorize};
use crate::domain::entities::{QUOTES_READ, QUOTES_WRITE};
use crate::domain::repositories::PermissionRepository;
use crate::state::AppState;
use axum::{
    Router, middleware,
    routing::{MethodRouter, get, patch, post, put},
};
use std::sync::Arc;

/// Versioned API routes.
///
/// # Endpoints
///
/// - `GET    /v1/healthcheck`            - Health check (public)
/// - `GET    /v1/quotes`                 - List quotes (`quotes:read`)
/// - `POST   /v1/quotes`                 - Create a quote (`quotes:write`)
/// - `GET    /v1/quotes/{id}`            - Show a quote (`quotes:read`)
/// - `PATCH  /v1/quotes/{id}`            - Update a quote (`quotes:write`)
/// - `DELETE /v1/quotes/{id}`            - Delete a quote (`quotes:write`)
/// - `POST   /v1/users`                  - Register (public)
/// - `PUT    /v1/users/activated`        - Activate an account (public)
/// - `POST   /v1/tokens/authentication`  - Issue an authentication token (public)
pub fn v1_routes(permissions: Arc<dyn PermissionRepository>) -> Router<AppState> {
    let read = AuthorizationGate::permission(QUOTES_READ, permissions.clone());
    let write = AuthorizationGate::permission(QUOTES_WRITE, permissions);

    Router::new()
        .route("/v1/healthcheck", get(health_handler))
        .route(
            "/v1/quotes",
            gated(get(list_quotes_handler), &read).merge(gated(post(create_quote_handler), &write)),
        )
        .route(
            "/v1/quotes/{id}",
            gated(get(show_quote_handler), &read).merge(gated(
                patch(update_quote_handler).delete(delete_quote_handler),
                &write,
            )),
        )
        .route("/v1/users", post(register_user_handler))
        .route("/v1/users/activated", put(activate_user_handler))
        .route(
            "/v1/tokens/authentication",
            post(create_authentication_token_handler),
        )
}

fn gated(route: MethodRouter<AppState>, gate: &AuthorizationGate) -> MethodRouter<AppState> {
    route.route_layer(middleware::from_fn_with_state(gate.clone(), authorize::layer))
}
