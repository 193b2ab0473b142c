use lazy_static::lazy_static;
use prometheus::{register_histogram_vec, HistogramVec};

lazy_static! {
    /// Request latency by method, matched route pattern and status.
    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "street_ink_http_request_duration_seconds",
        "HTTP request latency segmented by method, route and status",
        &["method", "route", "status"]
    )
    .expect("failed to register street_ink_http_request_duration_seconds");
}
