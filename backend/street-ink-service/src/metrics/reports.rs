use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, IntCounterVec};

lazy_static! {
    /// Report submissions by outcome (created, duplicate, invalid, post_not_found).
    pub static ref REPORT_SUBMISSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "street_ink_report_submissions_total",
        "Post report submissions segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register street_ink_report_submissions_total");

    /// Moderation status changes by target status.
    pub static ref REPORT_REVIEWS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "street_ink_report_reviews_total",
        "Report moderation transitions segmented by resulting status",
        &["status"]
    )
    .expect("failed to register street_ink_report_reviews_total");
}
