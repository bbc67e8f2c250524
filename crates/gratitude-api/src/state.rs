use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

use gratitude_core::{LedgerStore, NoteStore, Wall};
use gratitude_gateway::feed::SnapshotFeed;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub wall: Wall,
    pub ledgers: Arc<dyn LedgerStore>,
    pub feed: SnapshotFeed,
    pub admin_key: String,
    pub max_audio_bytes: usize,
    /// One lock per viewer id, held across ledger load, react and record.
    reaction_locks: Mutex<HashMap<String, Arc<tokio::sync::Mutex<()>>>>,
}

impl AppStateInner {
    pub fn new(
        store: Arc<dyn NoteStore>,
        ledgers: Arc<dyn LedgerStore>,
        admin_key: String,
        max_audio_bytes: usize,
    ) -> AppState {
        Arc::new(Self {
            wall: Wall::new(store),
            ledgers,
            feed: SnapshotFeed::new(),
            admin_key,
            max_audio_bytes,
            reaction_locks: Mutex::new(HashMap::new()),
        })
    }

    /// Re-reads the store and pushes the result to every subscriber.
    pub async fn refresh(&self) {
        self.feed.refresh(self.wall.store().clone()).await;
    }

    /// Serializes reactions from one viewer. Concurrent requests with the same
    /// viewer id would otherwise all load the same empty ledger.
    pub async fn lock_viewer(&self, viewer: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self
                .reaction_locks
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            // Drop locks nobody is holding or waiting on
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks.entry(viewer.to_string()).or_default().clone()
        };
        lock.lock_owned().await
    }

    /// An empty configured key disables the gate for everyone.
    pub fn is_admin_key(&self, candidate: &str) -> bool {
        !self.admin_key.is_empty() && candidate == self.admin_key
    }
}
