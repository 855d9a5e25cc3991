//! HTTP surface of the service.
//!
//! - [`dto`] - request and response bodies
//! - [`handlers`] - quote, account, token, health and metrics endpoints
//! - [`middleware`] - the gatekeeper stages every request passes through
//! - [`routes`] - the `/v1` route table and its per-route permission gates

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
