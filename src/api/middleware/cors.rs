//! CORS headers for a fixed list of trusted origins.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use super::metrics::ResponseSink;

const PREFLIGHT_METHODS: &str = "OPTIONS, PUT, PATCH, DELETE";
const PREFLIGHT_HEADERS: &str = "Authorization, Content-Type";

/// Trusted origins, read once at startup.
#[derive(Debug, Clone, Default)]
pub struct CorsPolicy {
    trusted_origins: Arc<[String]>,
}

impl CorsPolicy {
    pub fn new(trusted_origins: Vec<String>) -> Self {
        Self {
            trusted_origins: trusted_origins.into(),
        }
    }

    pub fn is_trusted(&self, origin: &str) -> bool {
        self.trusted_origins.iter().any(|o| o == origin)
    }

    fn trusted_origin<'a>(&self, headers: &'a HeaderMap) -> Option<&'a HeaderValue> {
        headers
            .get(header::ORIGIN)
            .filter(|v| v.to_str().is_ok_and(|o| self.is_trusted(o)))
    }
}

/// CORS middleware.
///
/// - `Vary: Origin` and `Vary: Access-Control-Request-Method` on every response
/// - `Access-Control-Allow-Origin` echoed only for trusted origins
/// - Preflight (`OPTIONS` with `Access-Control-Request-Method`) from a trusted
///   origin is answered here with `200 OK`
pub async fn layer(State(policy): State<CorsPolicy>, req: Request, next: Next) -> Response {
    let origin = policy.trusted_origin(req.headers()).cloned();

    let is_preflight = origin.is_some()
        && req.method() == Method::OPTIONS
        && req
            .headers()
            .contains_key(header::ACCESS_CONTROL_REQUEST_METHOD);

    let mut response = if is_preflight {
        let mut preflight = ResponseSink::commit(req.extensions(), StatusCode::OK);
        let headers = preflight.headers_mut();
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(PREFLIGHT_METHODS),
        );
        headers.insert(
            header::ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(PREFLIGHT_HEADERS),
        );
        preflight
    } else {
        next.run(req).await
    };

    let headers = response.headers_mut();
    headers.append(header::VARY, HeaderValue::from_static("Origin"));
    headers.append(
        header::VARY,
        HeaderValue::from_static("Access-Control-Request-Method"),
    );
    if let Some(origin) = origin {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    }

    response
}
