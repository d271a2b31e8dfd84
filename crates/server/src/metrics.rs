use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static PROVISION_ATTEMPTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "device_provision_attempts_total",
        "Device provisioning attempts by outcome",
        &["outcome"]
    )
    .expect("register provision_attempts_total")
});

pub static SYNC_STATUS_QUERIES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "device_sync_status_queries_total",
        "Total user sync status list and retrieve requests"
    )
    .expect("register sync_status_queries_total")
});

pub static DEVICE_INFO_REQUESTS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "device_info_requests_total",
        "Total device info requests"
    )
    .expect("register device_info_requests_total")
});

pub static AUTH_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "device_auth_failures_total",
        "Requests rejected by the token middleware or login"
    )
    .expect("register auth_failures_total")
});

/// Touch every metric so it shows up in the exposition before first use.
pub fn init() {
    Lazy::force(&PROVISION_ATTEMPTS_TOTAL);
    Lazy::force(&SYNC_STATUS_QUERIES_TOTAL);
    Lazy::force(&DEVICE_INFO_REQUESTS_TOTAL);
    Lazy::force(&AUTH_FAILURES_TOTAL);
}

pub fn encode_metrics() -> (axum::http::StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (
            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
            format!("metrics encode error: {e}"),
        );
    }
    (
        axum::http::StatusCode::OK,
        String::from_utf8(buffer).unwrap_or_default(),
    )
}
