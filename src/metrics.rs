//! Prometheus metrics.

use axum::{body::Body, http::Request, response::Response};
use lazy_static::lazy_static;
use prometheus::core::Collector;
use prometheus::{self, Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry};
use tracing::Span;

lazy_static! {
    /// Registry holding every summarist collector.
    pub static ref REGISTRY: Registry = Registry::new();
    /// Requests received, labelled by HTTP method.
    pub static ref INCOMING_REQUESTS: IntCounterVec = IntCounterVec::new(
        Opts::new("incoming_requests", "The number of HTTP requests received"),
        &["http_method"]
    ).unwrap();
    /// Responses sent, labelled by status code.
    pub static ref RESPONSE_CODES: IntCounterVec = IntCounterVec::new(
        Opts::new("outgoing_response", "The number of responses sent."),
        &["status_code"]
    ).unwrap();
    /// Time taken to respond to each request.
    pub static ref RESPONSE_TIMES: HistogramVec = HistogramVec::new(
        HistogramOpts {
            common_opts: Opts::new("response_time", "The time taken to respond to each request"),
            buckets: prometheus::DEFAULT_BUCKETS.to_vec(),
        },
        &[],
    ).unwrap();
    /// CSV rows decoded, labelled by dataset.
    pub static ref ROWS_PROCESSED: IntCounterVec = IntCounterVec::new(
        Opts::new("rows_processed", "The number of CSV rows decoded"),
        &["dataset"]
    ).unwrap();
}

/// Register every collector with the registry. Called once at startup.
pub fn register_metrics() {
    let collectors: [Box<dyn Collector>; 4] = [
        Box::new(INCOMING_REQUESTS.clone()),
        Box::new(RESPONSE_CODES.clone()),
        Box::new(RESPONSE_TIMES.clone()),
        Box::new(ROWS_PROCESSED.clone()),
    ];
    for collector in collectors {
        REGISTRY.register(collector).unwrap();
    }
}

/// Handler for the Prometheus text exposition endpoint.
pub async fn metrics_handler() -> String {
    let encoder = prometheus::TextEncoder::new();
    let mut buffer = Vec::new();
    encoder.encode(&REGISTRY.gather(), &mut buffer).unwrap();
    String::from_utf8(buffer).unwrap()
}

/// Increments the request counter on all incoming requests, labelled by HTTP method
pub fn request_counter(request: &Request<Body>, _span: &Span) {
    INCOMING_REQUESTS
        .with_label_values(&[request.method().as_str()])
        .inc();
}

/// Increment the response counter on all outgoing responses, labelled by status code, and
/// record the response time
pub fn record_response_metrics<B>(
    response: &Response<B>,
    latency: std::time::Duration,
    _span: &Span,
) {
    RESPONSE_CODES
        .with_label_values(&[response.status().as_str()])
        .inc();

    RESPONSE_TIMES
        .with_label_values(&[])
        .observe(latency.as_secs_f64());
}
