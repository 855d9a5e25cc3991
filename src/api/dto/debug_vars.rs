//! DTO for the `/debug/vars` metrics endpoint.

use serde::Serialize;

use crate::api::middleware::MetricsSnapshot;

#[derive(Debug, Serialize)]
pub struct DebugVarsResponse {
    pub version: String,

    #[serde(flatten)]
    pub metrics: MetricsSnapshot,
}
