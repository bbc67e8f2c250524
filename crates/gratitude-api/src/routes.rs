use axum::{
    Extension, Router,
    extract::{DefaultBodyLimit, Query, State, WebSocketUpgrade},
    middleware,
    response::IntoResponse,
    routing::{delete, get, post},
};
use serde::Deserialize;

use gratitude_gateway::connection;

use crate::middleware::{Viewer, identify_viewer, require_admin};
use crate::state::AppState;
use crate::{intents, notes, reactions};

/// Headroom for the JSON envelope around a base64 audio payload.
const BODY_OVERHEAD: usize = 64 * 1024;

pub fn router(state: AppState) -> Router {
    // base64 inflates the payload by 4/3
    let body_limit = state.max_audio_bytes.div_ceil(3) * 4 + BODY_OVERHEAD;

    let public_routes = Router::new()
        .route("/notes", get(notes::list_notes).post(notes::submit_note))
        .route("/notes/{id}/reactions", post(reactions::react))
        .route("/viewer/ledger", get(reactions::get_ledger))
        .route("/intents", post(intents::dispatch_intent))
        .route("/gateway", get(ws_upgrade))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/notes/{id}", delete(notes::delete_note))
        .route("/notes/{id}/approve", post(notes::approve_note))
        .route("/notes/{id}/pin", post(notes::toggle_pin))
        .layer(middleware::from_fn(require_admin))
        .with_state(state.clone());

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn_with_state(state, identify_viewer))
}

#[derive(Debug, Deserialize)]
pub struct GatewayQuery {
    /// Browsers cannot set headers on a WebSocket handshake.
    pub admin_key: Option<String>,
}

async fn ws_upgrade(
    State(state): State<AppState>,
    Extension(viewer): Extension<Viewer>,
    Query(query): Query<GatewayQuery>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let is_admin = viewer.is_admin
        || query
            .admin_key
            .as_deref()
            .is_some_and(|key| state.is_admin_key(key));

    let feed = state.feed.clone();
    ws.on_upgrade(move |socket| connection::handle_connection(socket, feed, is_admin))
}
