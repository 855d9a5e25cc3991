//! Process-wide request metrics.
//!
//! Counters are kept in atomics for the `/debug/vars` snapshot and mirrored
//! to the [`metrics`] facade so an installed exporter sees the same values.

use axum::{
    extract::{Request, State},
    http::{Extensions, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use metrics::{counter, histogram};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

/// Aggregated counters shared by every request. Never reset.
#[derive(Debug, Default)]
pub struct RequestMetrics {
    requests_received: AtomicU64,
    responses_sent: AtomicU64,
    processing_time_us: AtomicU64,
    responses_by_status: Mutex<HashMap<u16, u64>>,
}

/// Point-in-time copy of [`RequestMetrics`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests_received: u64,
    pub total_responses_sent: u64,
    pub total_processing_time_us: u64,
    pub total_responses_sent_by_status: BTreeMap<String, u64>,
}

impl RequestMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_received(&self) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
        counter!("http_requests_received_total").increment(1);
    }

    pub fn record_sent(&self, status: StatusCode, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);

        self.responses_sent.fetch_add(1, Ordering::Relaxed);
        self.processing_time_us.fetch_add(micros, Ordering::Relaxed);
        *self
            .responses_by_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(status.as_u16())
            .or_default() += 1;

        counter!("http_responses_sent_total", "status" => status.as_u16().to_string()).increment(1);
        histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let by_status = self
            .responses_by_status
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(status, count)| (status.to_string(), *count))
            .collect();

        MetricsSnapshot {
            total_requests_received: self.requests_received.load(Ordering::Relaxed),
            total_responses_sent: self.responses_sent.load(Ordering::Relaxed),
            total_processing_time_us: self.processing_time_us.load(Ordering::Relaxed),
            total_responses_sent_by_status: by_status,
        }
    }
}

/// Captures the status of a response exactly once.
///
/// The metrics stage places one sink in the request extensions. A stage that
/// terminates the chain commits its status through [`ResponseSink::commit`];
/// the metrics stage writes the final response status on the way out. The
/// first [`ResponseSink::write_status`] wins and later writes are reported
/// back as ignored. A sink nobody wrote to reports `200 OK`.
#[derive(Debug, Clone, Default)]
pub struct ResponseSink {
    status: Arc<OnceLock<StatusCode>>,
}

impl ResponseSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if this call recorded `status`.
    pub fn write_status(&self, status: StatusCode) -> bool {
        self.status.set(status).is_ok()
    }

    pub fn header_written(&self) -> bool {
        self.status.get().is_some()
    }

    pub fn status(&self) -> StatusCode {
        self.status.get().copied().unwrap_or(StatusCode::OK)
    }

    /// Turns `response` into the terminal response of the chain and commits
    /// its status to the sink carried in `extensions`, if there is one.
    pub fn commit(extensions: &Extensions, response: impl IntoResponse) -> Response {
        let response = response.into_response();
        if let Some(sink) = extensions.get::<ResponseSink>() {
            sink.write_status(response.status());
        }
        response
    }
}

/// Metrics middleware. Must be the outermost gatekeeper stage so rejections
/// from every inner stage are counted.
///
/// Records the status held by the request's [`ResponseSink`]: the one an
/// inner stage committed, otherwise the status of the returned response.
pub async fn layer(
    State(metrics): State<Arc<RequestMetrics>>,
    mut req: Request,
    next: Next,
) -> Response {
    let started = Instant::now();
    metrics.record_received();

    let sink = ResponseSink::new();
    req.extensions_mut().insert(sink.clone());

    let response = next.run(req).await;

    if !sink.write_status(response.status()) && sink.status() != response.status() {
        tracing::debug!(
            committed = sink.status().as_u16(),
            returned = response.status().as_u16(),
            "Response status changed after it was committed"
        );
    }
    metrics.record_sent(sink.status(), started.elapsed());

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_status_write_wins() {
        let sink = ResponseSink::new();
        assert!(!sink.header_written());
        assert_eq!(sink.status(), StatusCode::OK);

        assert!(sink.write_status(StatusCode::TOO_MANY_REQUESTS));
        assert!(!sink.write_status(StatusCode::INTERNAL_SERVER_ERROR));

        assert!(sink.header_written());
        assert_eq!(sink.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_clones_share_one_status() {
        let sink = ResponseSink::new();
        let inner = sink.clone();

        inner.write_status(StatusCode::FORBIDDEN);

        assert!(!sink.write_status(StatusCode::OK));
        assert_eq!(sink.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_commit_writes_to_sink_in_extensions() {
        let sink = ResponseSink::new();
        let mut extensions = Extensions::new();
        extensions.insert(sink.clone());

        let response = ResponseSink::commit(&extensions, StatusCode::TOO_MANY_REQUESTS);

        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(sink.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(!sink.write_status(StatusCode::OK));
    }

    #[test]
    fn test_commit_without_sink_still_responds() {
        let response = ResponseSink::commit(&Extensions::new(), StatusCode::FORBIDDEN);

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_snapshot_aggregates_by_status() {
        let metrics = RequestMetrics::new();

        for _ in 0..3 {
            metrics.record_received();
        }
        metrics.record_sent(StatusCode::OK, Duration::from_micros(100));
        metrics.record_sent(StatusCode::OK, Duration::from_micros(50));
        metrics.record_sent(StatusCode::TOO_MANY_REQUESTS, Duration::from_micros(5));

        let snapshot = metrics.snapshot();

        assert_eq!(snapshot.total_requests_received, 3);
        assert_eq!(snapshot.total_responses_sent, 3);
        assert_eq!(snapshot.total_processing_time_us, 155);
        assert_eq!(snapshot.total_responses_sent_by_status["200"], 2);
        assert_eq!(snapshot.total_responses_sent_by_status["429"], 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_increments_are_not_lost() {
        let metrics = Arc::new(RequestMetrics::new());

        let handles: Vec<_> = (0..16)
            .map(|_| {
                let metrics = metrics.clone();
                tokio::spawn(async move {
                    for _ in 0..250 {
                        metrics.record_received();
                        metrics.record_sent(StatusCode::OK, Duration::from_micros(1));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap();
        }

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_requests_received, 4000);
        assert_eq!(snapshot.total_responses_sent, 4000);
        assert_eq!(snapshot.total_processing_time_us, 4000);
        assert_eq!(snapshot.total_responses_sent_by_status["200"], 4000);
    }
}
