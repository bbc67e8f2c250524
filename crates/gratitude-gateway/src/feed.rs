use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::{debug, error, warn};

use gratitude_core::NoteStore;
use gratitude_types::models::Note;

/// Latest full note set. Subscribers replace their state with it wholesale.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub notes: Arc<Vec<Note>>,
    /// Set when the last refresh failed; `notes` then still holds the previous set.
    pub error: Option<String>,
}

/// Publishes store snapshots to every connected viewer.
#[derive(Clone)]
pub struct SnapshotFeed {
    inner: Arc<FeedInner>,
}

struct FeedInner {
    tx: watch::Sender<Snapshot>,
    /// Held across list + publish so an older read never lands last.
    refresh_lock: Mutex<()>,
}

impl SnapshotFeed {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Snapshot::default());
        Self {
            inner: Arc::new(FeedInner {
                tx,
                refresh_lock: Mutex::new(()),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Snapshot> {
        self.inner.tx.subscribe()
    }

    pub fn current(&self) -> Snapshot {
        self.inner.tx.borrow().clone()
    }

    pub fn publish(&self, notes: Vec<Note>) {
        debug!("Publishing snapshot of {} notes", notes.len());
        self.inner.tx.send_replace(Snapshot {
            notes: Arc::new(notes),
            error: None,
        });
    }

    pub fn publish_error(&self, message: String) {
        let notes = self.inner.tx.borrow().notes.clone();
        self.inner.tx.send_replace(Snapshot {
            notes,
            error: Some(message),
        });
    }

    /// Re-reads the store and publishes the result. A failed read keeps the
    /// previous notes and flags the error to subscribers.
    pub async fn refresh(&self, store: Arc<dyn NoteStore>) {
        let _guard = self.inner.refresh_lock.lock().await;
        match tokio::task::spawn_blocking(move || store.list()).await {
            Ok(Ok(notes)) => self.publish(notes),
            Ok(Err(e)) => {
                warn!("Snapshot refresh failed: {}", e);
                self.publish_error(e.to_string());
            }
            Err(e) => {
                error!("spawn_blocking join error: {}", e);
                self.publish_error("snapshot refresh aborted".into());
            }
        }
    }
}

impl Default for SnapshotFeed {
    fn default() -> Self {
        Self::new()
    }
}
