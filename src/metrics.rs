use once_cell::sync::Lazy;
use prometheus::{
    register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec,
    TextEncoder,
};

pub static POSTS_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("wire_posts_created_total", "Posts created through the API")
        .expect("Failed to register metric")
});

pub static CHAT_MESSAGES_CREATED: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "wire_chat_messages_created_total",
        "Chat messages created through the API"
    )
    .expect("Failed to register metric")
});

pub static NOTIFICATIONS_FIRED: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "wire_bot_notifications_fired_total",
        "Outbound bot webhook notifications fired",
        &["channel"]
    )
    .expect("Failed to register metric")
});

pub static NOTIFICATION_FAILURES: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "wire_bot_notification_failures_total",
        "Outbound bot webhook notifications that failed",
        &["channel"]
    )
    .expect("Failed to register metric")
});

pub static ROUTINE_RUNS: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "wire_daily_routine_runs_total",
        "Daily routine invocations"
    )
    .expect("Failed to register metric")
});

pub static SUMMARIES_WRITTEN: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "wire_chat_summaries_written_total",
        "Chat summaries stored as bot memories"
    )
    .expect("Failed to register metric")
});

/// Render all registered metrics in the Prometheus text format.
pub fn render() -> String {
    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        tracing::warn!("Failed to encode metrics: {}", e);
        return String::new();
    }
    String::from_utf8(buffer).unwrap_or_default()
}
