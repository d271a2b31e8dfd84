use axum::Json;

use common::types::Health;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

#[utoipa::path(get, path = "/metrics", tag = "health", responses((status = 200, description = "Prometheus text exposition")))]
pub async fn metrics() -> (axum::http::StatusCode, String) {
    crate::metrics::encode_metrics()
}
