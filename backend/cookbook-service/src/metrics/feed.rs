use lazy_static::lazy_static;
use prometheus::{
    register_histogram, register_int_counter_vec, Histogram, IntCounterVec,
};

lazy_static! {
    /// Feed requests by outcome (ok, fail_open, error).
    pub static ref FEED_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "cookbook_feed_requests_total",
        "Total feed requests segmented by outcome",
        &["outcome"]
    )
    .expect("failed to register cookbook_feed_requests_total");

    /// Time spent fetching facts and assembling one feed page.
    pub static ref FEED_ASSEMBLY_SECONDS: Histogram = register_histogram!(
        "cookbook_feed_assembly_seconds",
        "Feed fetch and assembly duration",
        vec![0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .expect("failed to register cookbook_feed_assembly_seconds");

    /// Candidate pool size per feed request.
    pub static ref FEED_CANDIDATES: Histogram = register_histogram!(
        "cookbook_feed_candidates",
        "Number of candidates ranked per feed request",
        vec![0.0, 1.0, 5.0, 10.0, 20.0, 50.0, 100.0]
    )
    .expect("failed to register cookbook_feed_candidates");

    /// Like attempts by result (created, already_liked, not_found).
    pub static ref LIKES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "cookbook_likes_total",
        "Like requests segmented by result",
        &["result"]
    )
    .expect("failed to register cookbook_likes_total");
}
