//! Shared application state injected into handlers.

use std::sync::Arc;

use crate::api::middleware::RequestMetrics;
use crate::application::services::{AuthService, QuoteService, UserService};
use crate::domain::repositories::PermissionRepository;

/// Services and shared handles available to every handler.
///
/// Cheap to clone: every field is reference counted.
#[derive(Clone)]
pub struct AppState {
    pub quote_service: Arc<QuoteService>,
    pub user_service: Arc<UserService>,
    pub auth_service: Arc<AuthService>,
    pub permissions: Arc<dyn PermissionRepository>,
    pub metrics: Arc<RequestMetrics>,
    /// Deployment environment reported by the health check.
    pub environment: String,
}
