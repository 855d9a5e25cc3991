//! HTTP middleware forming the request-gatekeeper pipeline.
//!
//! Each stage is a small struct holding only its injected dependencies and is
//! wired with [`axum::middleware::from_fn_with_state`]. Outermost first:
//!
//! 1. [`metrics`] - request and response counters
//! 2. [`panic`] - converts handler panics into a 500 envelope
//! 3. [`cors`] - trusted-origin headers and preflight short-circuit
//! 4. [`rate_limit`] - per-client token bucket
//! 5. [`authenticate`] - bearer token to [`Identity`](crate::domain::entities::Identity)
//! 6. [`authorize`] - per-route authenticated / activated / permission checks
//!
//! [`tracing`] wraps all of them with request spans.

pub mod authenticate;
pub mod authorize;
pub mod cors;
pub mod metrics;
pub mod panic;
pub mod rate_limit;
pub mod tracing;

pub use authenticate::IdentityResolver;
pub use authorize::{AuthorizationGate, Requirement};
pub use cors::CorsPolicy;
pub use metrics::{MetricsSnapshot, RequestMetrics, ResponseSink};
pub use rate_limit::RateLimitGate;
