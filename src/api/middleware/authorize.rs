//! Per-route authorization gates.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::metrics::ResponseSink;
use crate::domain::entities::Identity;
use crate::domain::repositories::PermissionRepository;
use crate::error::AppError;

/// What a route demands of the request identity.
///
/// Requirements nest: [`Requirement::Permission`] implies
/// [`Requirement::Activated`], which implies [`Requirement::Authenticated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    Authenticated,
    Activated,
    Permission(&'static str),
}

/// Enforces a [`Requirement`] on the identity resolved earlier in the chain.
#[derive(Clone)]
pub struct AuthorizationGate {
    requirement: Requirement,
    permissions: Arc<dyn PermissionRepository>,
}

impl AuthorizationGate {
    pub fn new(requirement: Requirement, permissions: Arc<dyn PermissionRepository>) -> Self {
        Self {
            requirement,
            permissions,
        }
    }

    pub fn authenticated(permissions: Arc<dyn PermissionRepository>) -> Self {
        Self::new(Requirement::Authenticated, permissions)
    }

    pub fn activated(permissions: Arc<dyn PermissionRepository>) -> Self {
        Self::new(Requirement::Activated, permissions)
    }

    pub fn permission(code: &'static str, permissions: Arc<dyn PermissionRepository>) -> Self {
        Self::new(Requirement::Permission(code), permissions)
    }

    pub fn requirement(&self) -> Requirement {
        self.requirement
    }

    /// Runs the checks in order: authenticated, activated, permitted.
    ///
    /// The first failing check decides the rejection, so an inactive user
    /// without the permission is told about the inactive account.
    ///
    /// # Errors
    ///
    /// - [`AppError::AuthenticationRequired`] for the anonymous identity
    /// - [`AppError::InactiveAccount`] for a user not yet activated
    /// - [`AppError::NotPermitted`] when the permission set lacks the code
    /// - [`AppError::Internal`] when the permission lookup fails
    pub async fn check(&self, identity: &Identity) -> Result<(), AppError> {
        let Identity::User { id, activated } = *identity else {
            return Err(AppError::authentication_required());
        };

        if self.requirement == Requirement::Authenticated {
            return Ok(());
        }

        if !activated {
            return Err(AppError::inactive_account());
        }

        if let Requirement::Permission(code) = self.requirement {
            let permissions = self.permissions.get_all_for_user(id).await?;
            if !permissions.includes(code) {
                tracing::debug!(user_id = id, required = code, "Permission denied");
                return Err(AppError::not_permitted(code));
            }
        }

        Ok(())
    }
}

/// Authorization middleware, applied per route with `route_layer`.
///
/// Requests that never passed the identity resolver are treated as anonymous.
///
/// # Example
///
/// ```rust,ignore
/// let gate = AuthorizationGate::permission("quotes:write", permissions);
/// let route = post(create_quote_handler)
///     .route_layer(middleware::from_fn_with_state(gate, authorize::layer));
/// ```
pub async fn layer(State(gate): State<AuthorizationGate>, req: Request, next: Next) -> Response {
    let identity = req
        .extensions()
        .get::<Identity>()
        .copied()
        .unwrap_or_default();

    match gate.check(&identity).await {
        Ok(()) => next.run(req).await,
        Err(e) => ResponseSink::commit(req.extensions(), e),
    }
}
