use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use gratitude_api::routes::router;
use gratitude_api::state::{AppState, AppStateInner};
use gratitude_core::memory::{MemoryLedgerStore, MemoryStore};
use gratitude_core::{LedgerStore, NoteStore, ReactionLedger, StoreError};
use gratitude_types::models::{NewNote, Note, NoteId, NotePatch};

const ADMIN: (&str, &str) = ("x-admin-key", "letmein");

async fn app() -> (Router, AppState) {
    app_with(Arc::new(MemoryStore::new()), Arc::new(MemoryLedgerStore::new())).await
}

async fn app_with(store: Arc<dyn NoteStore>, ledgers: Arc<dyn LedgerStore>) -> (Router, AppState) {
    let state = AppStateInner::new(store, ledgers, "letmein".into(), 1024);
    state.refresh().await;
    (router(state.clone()), state)
}

/// Memory store with slow reads, widening the gap between a ledger check
/// and the count write.
struct SlowReads(MemoryStore);

impl NoteStore for SlowReads {
    fn list(&self) -> Result<Vec<Note>, StoreError> {
        self.0.list()
    }

    fn get(&self, id: &NoteId) -> Result<Note, StoreError> {
        std::thread::sleep(Duration::from_millis(20));
        self.0.get(id)
    }

    fn create(&self, note: NewNote) -> Result<NoteId, StoreError> {
        self.0.create(note)
    }

    fn update(&self, id: &NoteId, patch: &NotePatch) -> Result<(), StoreError> {
        self.0.update(id, patch)
    }

    fn delete(&self, id: &NoteId) -> Result<(), StoreError> {
        self.0.delete(id)
    }
}

/// Ledger that loads fine but cannot persist new entries.
struct ReadOnlyLedger;

impl LedgerStore for ReadOnlyLedger {
    fn load(&self, _viewer: &str) -> Result<ReactionLedger, StoreError> {
        Ok(ReactionLedger::new())
    }

    fn record(&self, _viewer: &str, _id: &NoteId, _emoji: &str) -> Result<(), StoreError> {
        Err(StoreError::unavailable("ledger offline"))
    }
}

fn request(method: &str, uri: &str, body: Option<Value>, headers: &[(&str, &str)]) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn note_ids(view: &Value) -> Vec<String> {
    view["weeks"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|week| week["notes"].as_array().unwrap().iter())
        .map(|note| note["id"].as_str().unwrap().to_string())
        .collect()
}

async fn submit(app: &Router, text: &str) -> String {
    let (status, body) = send(
        app,
        request(
            "POST",
            "/notes",
            Some(json!({ "sender": "X", "receiver": "Y", "text": text })),
            &[],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "pending");
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn submit_approve_delete_flow() {
    let (app, _) = app().await;
    let id = submit(&app, "hello").await;

    let (_, guest) = send(&app, request("GET", "/notes", None, &[])).await;
    assert!(note_ids(&guest).is_empty());
    assert!(guest["pending_count"].is_null());

    let (_, admin) = send(&app, request("GET", "/notes", None, &[ADMIN])).await;
    assert_eq!(note_ids(&admin), vec![id.clone()]);
    assert_eq!(admin["pending_count"], 1);
    assert_eq!(admin["weeks"][0]["is_current"], true);

    let uri = format!("/notes/{id}/approve");
    let (status, body) = send(&app, request("POST", &uri, None, &[ADMIN])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["changed"], true);

    let (_, body) = send(&app, request("POST", &uri, None, &[ADMIN])).await;
    assert_eq!(body["changed"], false);

    let (_, guest) = send(&app, request("GET", "/notes", None, &[])).await;
    assert_eq!(note_ids(&guest), vec![id.clone()]);

    let uri = format!("/notes/{id}");
    let (status, _) = send(&app, request("DELETE", &uri, None, &[ADMIN])).await;
    assert_eq!(status, StatusCode::OK);

    let (_, guest) = send(&app, request("GET", "/notes", None, &[])).await;
    let (_, admin) = send(&app, request("GET", "/notes", None, &[ADMIN])).await;
    assert!(note_ids(&guest).is_empty());
    assert!(note_ids(&admin).is_empty());

    let (status, body) = send(&app, request("DELETE", &uri, None, &[ADMIN])).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains(&id));
}

#[tokio::test]
async fn empty_submission_is_rejected() {
    let (app, _) = app().await;

    let (status, _) = send(
        &app,
        request("POST", "/notes", Some(json!({ "receiver": "Y", "text": "" })), &[]),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, admin) = send(&app, request("GET", "/notes", None, &[ADMIN])).await;
    assert!(note_ids(&admin).is_empty());
}

#[tokio::test]
async fn malformed_audio_is_rejected() {
    let (app, _) = app().await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            "/notes",
            Some(json!({ "receiver": "Y", "audio_data": "data:audio/webm;base64,%%%" })),
            &[],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn admin_routes_need_the_key() {
    let (app, _) = app().await;
    let id = submit(&app, "hello").await;
    let uri = format!("/notes/{id}/approve");

    let (status, _) = send(&app, request("POST", &uri, None, &[])).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, request("POST", &uri, None, &[("x-admin-key", "nope")])).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, guest) = send(&app, request("GET", "/notes", None, &[])).await;
    assert!(note_ids(&guest).is_empty());
}

#[tokio::test]
async fn one_reaction_per_viewer() {
    let (app, _) = app().await;
    let id = submit(&app, "hello").await;
    send(&app, request("POST", &format!("/notes/{id}/approve"), None, &[ADMIN])).await;

    let uri = format!("/notes/{id}/reactions");
    let alice = ("x-viewer-id", "alice");
    let bob = ("x-viewer-id", "bob");

    let (status, body) = send(&app, request("POST", &uri, Some(json!({ "emoji": "👏" })), &[alice])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, _) = send(&app, request("POST", &uri, Some(json!({ "emoji": "👏" })), &[alice])).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, body) = send(&app, request("POST", &uri, Some(json!({ "emoji": "👏" })), &[bob])).await;
    assert_eq!(body["count"], 2);

    let (status, _) = send(&app, request("POST", &uri, Some(json!({ "emoji": "👏" })), &[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, ledger) = send(&app, request("GET", "/viewer/ledger", None, &[alice])).await;
    assert_eq!(ledger["reactions"][&id], "👏");

    let (_, guest) = send(&app, request("GET", "/notes", None, &[])).await;
    assert_eq!(guest["weeks"][0]["notes"][0]["reaction_counts"]["👏"], 2);
}

#[tokio::test]
async fn guests_cannot_react_to_pending_notes() {
    let (app, _) = app().await;
    let id = submit(&app, "hello").await;

    let (status, _) = send(
        &app,
        request(
            "POST",
            &format!("/notes/{id}/reactions"),
            Some(json!({ "emoji": "👍" })),
            &[("x-viewer-id", "alice")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn intents_endpoint_dispatches_and_gates() {
    let (app, state) = app().await;
    let id = submit(&app, "a fairly long note that will be cut in the pinned strip").await;
    let pin = json!({ "type": "toggle_pin", "id": id });

    let (status, _) = send(&app, request("POST", "/intents", Some(pin.clone()), &[])).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(&app, request("POST", "/intents", Some(pin), &[ADMIN])).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "pin_toggled");
    assert_eq!(body["is_pinned"], true);

    let (_, admin) = send(&app, request("GET", "/notes", None, &[ADMIN])).await;
    assert_eq!(admin["pinned"][0]["preview"], "a fairly long note that will b...");

    // Pinned but still pending: hidden from guests
    let (_, guest) = send(&app, request("GET", "/notes", None, &[])).await;
    assert!(guest["pinned"].as_array().unwrap().is_empty());

    let snapshot = state.feed.current();
    assert!(snapshot.notes[0].is_pinned);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reactions_from_one_viewer_count_once() {
    let (app, state) = app_with(
        Arc::new(SlowReads(MemoryStore::new())),
        Arc::new(MemoryLedgerStore::new()),
    )
    .await;
    let id = submit(&app, "hello").await;
    send(&app, request("POST", &format!("/notes/{id}/approve"), None, &[ADMIN])).await;

    let uri = format!("/notes/{id}/reactions");
    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let app = app.clone();
            let req = request("POST", &uri, Some(json!({ "emoji": "👍" })), &[("x-viewer-id", "alice")]);
            tokio::spawn(async move { send(&app, req).await.0 })
        })
        .collect();

    let mut accepted = 0;
    for task in tasks {
        match task.await.unwrap() {
            StatusCode::OK => accepted += 1,
            status => assert_eq!(status, StatusCode::CONFLICT),
        }
    }
    assert_eq!(accepted, 1);

    let note = state.wall.store().get(&NoteId(id)).unwrap();
    assert_eq!(note.reaction_counts["👍"], 1);
}

#[tokio::test]
async fn failed_ledger_write_is_reported() {
    let (app, _) = app_with(Arc::new(MemoryStore::new()), Arc::new(ReadOnlyLedger)).await;
    let id = submit(&app, "hello").await;
    send(&app, request("POST", &format!("/notes/{id}/approve"), None, &[ADMIN])).await;

    let (status, body) = send(
        &app,
        request(
            "POST",
            &format!("/notes/{id}/reactions"),
            Some(json!({ "emoji": "👍" })),
            &[("x-viewer-id", "alice")],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert!(body["error"].as_str().unwrap().contains("ledger offline"));

    // The count itself was saved and republished
    let (_, guest) = send(&app, request("GET", "/notes", None, &[])).await;
    assert_eq!(guest["weeks"][0]["notes"][0]["reaction_counts"]["👍"], 1);
}
