use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use pauz_core::stats::StatsSummary;

use crate::{handlers::AppError, state::AppState};

/// Get a user's aggregate counts (GET /api/users/{user_id}/stats).
pub async fn get_user_stats(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<StatsSummary>, AppError> {
    let stats = state.stats.get_user_stats(user_id).await?;
    Ok(Json(stats))
}
