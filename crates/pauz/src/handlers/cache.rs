//! Operational cache endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use uuid::Uuid;

use pauz_core::cache::CacheDiagnostics;

use crate::{handlers::AppError, state::AppState};

#[derive(Debug, Serialize)]
pub struct InvalidatedResponse {
    pub evicted: usize,
}

/// Cache entry count and hit rate (GET /api/cache/diagnostics).
pub async fn diagnostics(State(state): State<AppState>) -> Result<Json<CacheDiagnostics>, AppError> {
    Ok(Json(state.cache_diagnostics().await?))
}

/// Flush one user's cached values (POST /api/cache/users/{user_id}/invalidate).
pub async fn invalidate_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<InvalidatedResponse>, AppError> {
    let evicted = state.invalidate_user(user_id).await?;

    tracing::info!(user_id = %user_id, evicted, "Flushed user cache");

    Ok(Json(InvalidatedResponse { evicted }))
}

/// Flush the whole cache (DELETE /api/cache).
pub async fn clear(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state.bus.invalidate_all().await?;

    tracing::info!("Flushed cache");

    Ok(StatusCode::NO_CONTENT)
}
