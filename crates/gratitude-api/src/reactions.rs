use axum::{
    Extension, Json,
    extract::{Path, State},
    response::IntoResponse,
};
use tracing::error;

use gratitude_core::WallError;
use gratitude_types::api::{Intent, LedgerResponse, ReactRequest};
use gratitude_types::models::NoteId;

use crate::error::ApiError;
use crate::intents::run_intent;
use crate::middleware::Viewer;
use crate::state::AppState;

pub async fn react(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Path(id): Path<String>,
    Json(req): Json<ReactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let intent = Intent::React {
        id: NoteId(id),
        emoji: req.emoji,
    };

    let outcome = run_intent(&state, &viewer, intent).await?;
    Ok(Json(outcome))
}

/// The caller's ledger, so the UI can grey out notes it already reacted to.
pub async fn get_ledger(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
) -> Result<impl IntoResponse, ApiError> {
    let viewer_id = viewer.id.ok_or(ApiError::MissingViewer)?;

    let ledgers = state.ledgers.clone();
    let ledger = tokio::task::spawn_blocking(move || ledgers.load(&viewer_id))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(WallError::from)?;

    Ok(Json(LedgerResponse {
        reactions: ledger.entries().clone(),
    }))
}
