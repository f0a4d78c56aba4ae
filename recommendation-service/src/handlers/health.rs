use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;

/// Liveness probe for Docker/K8s.
pub async fn health_check() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "recommendation-service",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// Readiness probe. There are no backing stores to check.
pub async fn readiness_check() -> StatusCode {
    StatusCode::OK
}
