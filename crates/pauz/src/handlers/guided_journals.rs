use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use pauz_core::journal::GuidedJournal;
use pauz_core::storage::RepositoryError;

use crate::{handlers::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateGuidedJournal {
    pub topic: String,
}

#[derive(Debug, Deserialize)]
pub struct AddGuidedEntry {
    pub response: String,
}

/// Create a guided journal (POST /api/users/{user_id}/guided-journals).
pub async fn create_guided_journal(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CreateGuidedJournal>,
) -> Result<(StatusCode, Json<GuidedJournal>), AppError> {
    let journal = GuidedJournal::new(user_id, payload.topic)?;

    state.guided_journals.create_guided_journal(&journal).await?;

    tracing::info!(user_id = %user_id, journal_id = %journal.id, topic = %journal.topic, "Created guided journal");

    Ok((StatusCode::CREATED, Json(journal)))
}

/// Add a response (POST /api/users/{user_id}/guided-journals/{id}/entries).
pub async fn add_guided_entry(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AddGuidedEntry>,
) -> Result<Json<GuidedJournal>, AppError> {
    let mut journal = state
        .guided_journals
        .get_guided_journal(user_id, id)
        .await?
        .ok_or_else(|| AppError::from(RepositoryError::not_found("GuidedJournal", id)))?;
    journal.add_entry(payload.response)?;

    state.guided_journals.update_guided_journal(&journal).await?;

    tracing::info!(user_id = %user_id, journal_id = %id, entries = journal.entries.len(), "Added guided entry");

    Ok(Json(journal))
}

/// Delete a guided journal (DELETE /api/users/{user_id}/guided-journals/{id}).
pub async fn delete_guided_journal(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.guided_journals.delete_guided_journal(user_id, id).await?;

    tracing::info!(user_id = %user_id, journal_id = %id, "Deleted guided journal");

    Ok(StatusCode::NO_CONTENT)
}
