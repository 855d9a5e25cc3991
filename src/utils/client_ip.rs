//! Client identifier extraction for rate limiting.

use axum::extract::{ConnectInfo, Request};
use std::net::SocketAddr;

/// Returns the identifier a request is rate limited under.
///
/// The peer socket address is used unless `trust_proxy` is set, in which case
/// the first `X-Forwarded-For` hop, then `X-Real-IP`, take precedence. Only
/// enable `trust_proxy` behind a reverse proxy that overwrites those headers.
///
/// Returns `None` when no peer address is attached to the request, which
/// happens when the router is served without connect info.
pub fn client_identifier(req: &Request, trust_proxy: bool) -> Option<String> {
    if trust_proxy && let Some(forwarded) = forwarded_ip(req) {
        return Some(forwarded);
    }

    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

fn forwarded_ip(req: &Request) -> Option<String> {
    let headers = req.headers();

    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        })
        .map(str::to_owned)
}
