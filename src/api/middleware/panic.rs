//! Converts handler panics into a `500` error envelope.

use axum::{
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::any::Any;
use tower_http::catch_panic::CatchPanicLayer;

use crate::error::AppError;

type PanicHandler = fn(Box<dyn Any + Send + 'static>) -> Response;

/// Creates the panic recovery layer.
///
/// The response carries `Connection: close` so the connection that saw the
/// panic is not reused.
pub fn layer() -> CatchPanicLayer<PanicHandler> {
    CatchPanicLayer::custom(recover as PanicHandler)
}

fn recover(payload: Box<dyn Any + Send + 'static>) -> Response {
    let message = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic payload".to_string());

    tracing::error!(panic = %message, "Recovered from panic in request handler");

    let mut response = AppError::internal(
        "the server encountered a problem and could not process your request",
        json!({}),
    )
    .into_response();

    response
        .headers_mut()
        .insert(header::CONNECTION, HeaderValue::from_static("close"));

    response
}
