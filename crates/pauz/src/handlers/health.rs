use axum::http::StatusCode;

/// GET /healthz - Liveness check.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
