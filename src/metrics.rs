use lazy_static::lazy_static;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

lazy_static! {
    // Business Metrics
    pub static ref SESSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quizlan_sessions_total",
        "Total number of exam sessions",
        &["status"]
    )
    .unwrap();

    pub static ref SUBMISSIONS_SCORED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quizlan_submissions_scored_total",
        "Total number of scored submissions",
        &["outcome"]
    )
    .unwrap();

    pub static ref ANTICHEAT_EVENTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "quizlan_anticheat_events_total",
        "Total number of recorded anti-cheat events",
        &["event"]
    )
    .unwrap();
}

pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8(buffer).unwrap_or_default())
}
