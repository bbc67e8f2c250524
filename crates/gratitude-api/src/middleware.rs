use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use gratitude_core::WallError;

use crate::error::ApiError;
use crate::state::AppState;

pub const ADMIN_KEY_HEADER: &str = "x-admin-key";
pub const VIEWER_ID_HEADER: &str = "x-viewer-id";

const MAX_VIEWER_ID_LEN: usize = 128;

/// Who is calling. The viewer id is generated by the browser and kept in its
/// local storage; it scopes the reaction ledger, nothing else.
#[derive(Debug, Clone, Default)]
pub struct Viewer {
    pub id: Option<String>,
    pub is_admin: bool,
}

fn header<'a>(req: &'a Request, name: &str) -> Option<&'a str> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// Attach a [`Viewer`] to every request. The admin gate is a shared static key
/// and only adds friction; it is not an access-control boundary.
pub async fn identify_viewer(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let is_admin = header(&req, ADMIN_KEY_HEADER).is_some_and(|key| state.is_admin_key(key));
    let id = header(&req, VIEWER_ID_HEADER)
        .filter(|id| id.len() <= MAX_VIEWER_ID_LEN)
        .map(str::to_string);

    req.extensions_mut().insert(Viewer { id, is_admin });
    next.run(req).await
}

/// Reject admin routes for anyone who did not pass the gate.
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let is_admin = req
        .extensions()
        .get::<Viewer>()
        .is_some_and(|viewer| viewer.is_admin);

    if !is_admin {
        return Err(WallError::AdminRequired.into());
    }

    Ok(next.run(req).await)
}
