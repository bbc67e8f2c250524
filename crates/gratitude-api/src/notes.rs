use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use chrono::Local;

use gratitude_core::session::project;
use gratitude_types::api::{Intent, IntentOutcome, SubmitNoteRequest, SubmitNoteResponse};
use gratitude_types::models::{NoteId, NoteStatus};

use crate::error::ApiError;
use crate::intents::run_intent;
use crate::middleware::Viewer;
use crate::state::AppState;

/// Voice notes arrive as `data:<mime>;base64,<payload>` URLs. Anything else is
/// treated as an opaque reference and only length-checked.
pub fn validate_audio(audio: Option<&str>, max_bytes: usize) -> Result<(), ApiError> {
    let Some(audio) = audio.map(str::trim).filter(|a| !a.is_empty()) else {
        return Ok(());
    };

    let size = match audio.strip_prefix("data:") {
        Some(rest) => {
            let (meta, payload) = rest
                .split_once(',')
                .ok_or_else(|| ApiError::BadRequest("audio data URL has no payload".into()))?;
            if !meta.ends_with(";base64") {
                return Err(ApiError::BadRequest("audio data URL must be base64".into()));
            }
            B64.decode(payload)
                .map_err(|_| ApiError::BadRequest("audio payload is not valid base64".into()))?
                .len()
        }
        None => audio.len(),
    };

    if size > max_bytes {
        return Err(ApiError::BadRequest(format!(
            "audio is {size} bytes, limit is {max_bytes}"
        )));
    }
    Ok(())
}

pub async fn list_notes(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> impl IntoResponse {
    let snapshot = state.feed.current();
    Json(project(&snapshot.notes, viewer.is_admin, &Local::now()))
}

pub async fn submit_note(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(req): Json<SubmitNoteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let intent = Intent::Submit { draft: req.into() };

    match run_intent(&state, &viewer, intent).await? {
        IntentOutcome::Submitted { id } => Ok((
            StatusCode::CREATED,
            Json(SubmitNoteResponse {
                id,
                status: NoteStatus::Pending,
            }),
        )),
        _ => Err(ApiError::Internal),
    }
}

pub async fn approve_note(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = run_intent(&state, &viewer, Intent::Approve { id: NoteId(id) }).await?;
    Ok(Json(outcome))
}

/// Deletes a note. Rejecting a pending note uses the same route.
pub async fn delete_note(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = run_intent(&state, &viewer, Intent::Delete { id: NoteId(id) }).await?;
    Ok(Json(outcome))
}

pub async fn toggle_pin(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = run_intent(&state, &viewer, Intent::TogglePin { id: NoteId(id) }).await?;
    Ok(Json(outcome))
}
