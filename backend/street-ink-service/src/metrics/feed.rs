use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_histogram_vec, register_int_counter_vec, Histogram,
    HistogramVec, IntCounterVec,
};

lazy_static! {
    /// Duration of feed page assembly by outcome (ok, error).
    pub static ref FEED_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "street_ink_feed_request_duration_seconds",
        "Feed page assembly duration segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register street_ink_feed_request_duration_seconds");

    /// Feed pages served by outcome.
    pub static ref FEED_REQUEST_TOTAL: IntCounterVec = register_int_counter_vec!(
        "street_ink_feed_request_total",
        "Total feed page requests segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register street_ink_feed_request_total");

    /// Rows pulled from both sources to build one page.
    pub static ref FEED_WINDOW_ROWS: Histogram = register_histogram!(
        "street_ink_feed_window_rows",
        "Candidate rows merged to produce a feed page",
        vec![0.0, 10.0, 20.0, 50.0, 100.0, 200.0, 500.0, 1000.0, 5000.0]
    )
    .expect("failed to register street_ink_feed_window_rows");

    /// Feed items by kind (original, shared).
    pub static ref FEED_ITEMS_SERVED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "street_ink_feed_items_served_total",
        "Feed items served segmented by kind",
        &["kind"]
    )
    .expect("failed to register street_ink_feed_items_served_total");
}
