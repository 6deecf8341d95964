use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use pauz_core::journal::GardenEntry;

use crate::{handlers::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateGardenEntry {
    pub mood: String,
    pub flower_type: String,
    pub note: Option<String>,
}

/// Plant a flower (POST /api/users/{user_id}/garden).
pub async fn create_garden_entry(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CreateGardenEntry>,
) -> Result<(StatusCode, Json<GardenEntry>), AppError> {
    let mut entry = GardenEntry::new(user_id, payload.mood, payload.flower_type)?;
    if let Some(note) = payload.note {
        entry = entry.with_note(note);
    }

    state.garden.create_garden_entry(&entry).await?;

    tracing::info!(user_id = %user_id, entry_id = %entry.id, flower = %entry.flower_type, "Planted garden entry");

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Remove a flower (DELETE /api/users/{user_id}/garden/{id}).
pub async fn delete_garden_entry(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.garden.delete_garden_entry(user_id, id).await?;

    tracing::info!(user_id = %user_id, entry_id = %id, "Deleted garden entry");

    Ok(StatusCode::NO_CONTENT)
}
