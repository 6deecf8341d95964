//! Free journal write handlers.
//!
//! The repository in `AppState` is the invalidating decorator, so every
//! successful write here evicts the user's stats and free journal previews.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use pauz_core::journal::FreeJournal;
use pauz_core::storage::RepositoryError;

use crate::{handlers::AppError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateFreeJournal {
    pub content: String,
    /// Writing session; a new one is started when absent
    pub session_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateFreeJournal {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct AppendTranscription {
    pub transcript: String,
}

async fn load(state: &AppState, user_id: Uuid, id: Uuid) -> Result<FreeJournal, AppError> {
    state
        .free_journals
        .get_free_journal(user_id, id)
        .await?
        .ok_or_else(|| AppError::from(RepositoryError::not_found("FreeJournal", id)))
}

/// Create a free journal (POST /api/users/{user_id}/free-journals).
pub async fn create_free_journal(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<CreateFreeJournal>,
) -> Result<(StatusCode, Json<FreeJournal>), AppError> {
    let mut journal = FreeJournal::new(user_id, payload.content);
    if let Some(session_id) = payload.session_id {
        journal = journal.with_session_id(session_id);
    }

    state.free_journals.create_free_journal(&journal).await?;

    tracing::info!(user_id = %user_id, journal_id = %journal.id, "Created free journal");

    Ok((StatusCode::CREATED, Json(journal)))
}

/// Replace a free journal's content (PUT /api/users/{user_id}/free-journals/{id}).
pub async fn update_free_journal(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<UpdateFreeJournal>,
) -> Result<Json<FreeJournal>, AppError> {
    let mut journal = load(&state, user_id, id).await?;
    journal.set_content(payload.content);

    state.free_journals.update_free_journal(&journal).await?;

    tracing::info!(user_id = %user_id, journal_id = %id, "Updated free journal");

    Ok(Json(journal))
}

/// Append a voice transcription
/// (POST /api/users/{user_id}/free-journals/{id}/transcriptions).
pub async fn append_transcription(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(Uuid, Uuid)>,
    Json(payload): Json<AppendTranscription>,
) -> Result<Json<FreeJournal>, AppError> {
    let mut journal = load(&state, user_id, id).await?;
    journal.append_transcription(&payload.transcript)?;

    state.free_journals.update_free_journal(&journal).await?;

    tracing::info!(user_id = %user_id, journal_id = %id, "Appended transcription");

    Ok(Json(journal))
}

/// Delete a free journal (DELETE /api/users/{user_id}/free-journals/{id}).
pub async fn delete_free_journal(
    State(state): State<AppState>,
    Path((user_id, id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AppError> {
    state.free_journals.delete_free_journal(user_id, id).await?;

    tracing::info!(user_id = %user_id, journal_id = %id, "Deleted free journal");

    Ok(StatusCode::NO_CONTENT)
}
