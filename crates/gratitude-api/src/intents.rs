use axum::{Extension, Json, extract::State, response::IntoResponse};
use tracing::{error, warn};

use gratitude_core::{ReactionLedger, Session, WallError};
use gratitude_types::api::{Intent, IntentOutcome};

use crate::error::ApiError;
use crate::middleware::Viewer;
use crate::notes::validate_audio;
use crate::state::AppState;

/// Resolves one intent against the store, then republishes the snapshot.
///
/// Every HTTP mutation funnels through here. Reactions hold the caller's
/// viewer lock from ledger load to ledger record, and record the new entry
/// only after the counts were saved. If that record fails the count is
/// already persisted: the caller gets `StoreUnavailable` and should keep its
/// own local ledger entry.
pub async fn run_intent(
    state: &AppState,
    viewer: &Viewer,
    intent: Intent,
) -> Result<IntentOutcome, ApiError> {
    if let Intent::Submit { draft } = &intent {
        validate_audio(draft.audio_data.as_deref(), state.max_audio_bytes)?;
    }

    let viewer_id = match &intent {
        Intent::React { .. } => Some(viewer.id.clone().ok_or(ApiError::MissingViewer)?),
        _ => None,
    };

    let _reaction_guard = match &viewer_id {
        Some(viewer) => Some(state.lock_viewer(viewer).await),
        None => None,
    };

    // Store adapters are blocking; keep them off the async runtime
    let app = state.clone();
    let is_admin = viewer.is_admin;
    let result = tokio::task::spawn_blocking(move || {
        let ledger = match &viewer_id {
            Some(viewer) => app.ledgers.load(viewer).map_err(WallError::from)?,
            None => ReactionLedger::new(),
        };

        let mut session = Session::new(is_admin, ledger);
        let outcome = session.dispatch(&app.wall, intent)?;

        if let (Some(viewer), IntentOutcome::Reacted { id, emoji, .. }) = (&viewer_id, &outcome) {
            app.ledgers.record(viewer, id, emoji).map_err(|e| {
                warn!("Reaction on {} saved but ledger write failed: {}", id, e);
                WallError::from(e)
            })?;
        }

        Ok::<_, WallError>(outcome)
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        ApiError::Internal
    })?;

    // A failed ledger write still changed the counts, so always republish
    state.refresh().await;
    Ok(result?)
}

pub async fn dispatch_intent(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Json(intent): Json<Intent>,
) -> Result<impl IntoResponse, ApiError> {
    let outcome = run_intent(&state, &viewer, intent).await?;
    Ok(Json(outcome))
}
