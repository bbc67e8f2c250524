//! In-process adapters. Nothing survives a restart; useful for demos and tests.

use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

use gratitude_types::models::{NewNote, Note, NoteId, NotePatch, NoteStatus};

use crate::error::StoreError;
use crate::ledger::ReactionLedger;
use crate::store::{LedgerStore, NoteStore};

/// Notes kept newest-first in a vector. Ids are sequential integers.
pub struct MemoryStore {
    notes: RwLock<Vec<Note>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_notes(Vec::new())
    }

    /// Seeds the store. `notes` must already be newest-first.
    pub fn with_notes(notes: Vec<Note>) -> Self {
        let next_id = notes
            .iter()
            .filter_map(|n| n.id.as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0)
            + 1;

        Self {
            notes: RwLock::new(notes),
            next_id: AtomicU64::new(next_id),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<E>(_: E) -> StoreError {
    StoreError::Unavailable("memory store lock poisoned".into())
}

impl NoteStore for MemoryStore {
    fn list(&self) -> Result<Vec<Note>, StoreError> {
        Ok(self.notes.read().map_err(poisoned)?.clone())
    }

    fn get(&self, id: &NoteId) -> Result<Note, StoreError> {
        self.notes
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|n| &n.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn create(&self, note: NewNote) -> Result<NoteId, StoreError> {
        let id = NoteId(self.next_id.fetch_add(1, Ordering::Relaxed).to_string());

        let record = Note {
            id: id.clone(),
            sender: note.sender,
            receiver: note.receiver,
            text: note.text,
            audio_data: note.audio_data,
            created_at: Some(Utc::now()),
            display_time: note.display_time,
            status: NoteStatus::Pending,
            is_pinned: false,
            reaction_counts: Default::default(),
            likes: 0,
        };

        self.notes.write().map_err(poisoned)?.insert(0, record);
        Ok(id)
    }

    fn update(&self, id: &NoteId, patch: &NotePatch) -> Result<(), StoreError> {
        let mut notes = self.notes.write().map_err(poisoned)?;
        let note = notes
            .iter_mut()
            .find(|n| &n.id == id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;

        patch.apply(note);
        Ok(())
    }

    fn delete(&self, id: &NoteId) -> Result<(), StoreError> {
        let mut notes = self.notes.write().map_err(poisoned)?;
        let before = notes.len();
        notes.retain(|n| &n.id != id);

        if notes.len() == before {
            return Err(StoreError::NotFound(id.clone()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryLedgerStore {
    ledgers: RwLock<HashMap<String, ReactionLedger>>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedgerStore {
    fn load(&self, viewer: &str) -> Result<ReactionLedger, StoreError> {
        Ok(self
            .ledgers
            .read()
            .map_err(poisoned)?
            .get(viewer)
            .cloned()
            .unwrap_or_default())
    }

    fn record(&self, viewer: &str, id: &NoteId, emoji: &str) -> Result<(), StoreError> {
        self.ledgers
            .write()
            .map_err(poisoned)?
            .entry(viewer.to_string())
            .or_default()
            .record(id.clone(), emoji.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::note;

    fn new_note(text: &str) -> NewNote {
        NewNote {
            sender: "a".into(),
            receiver: "b".into(),
            text: Some(text.into()),
            audio_data: None,
            display_time: "09:00".into(),
        }
    }

    #[test]
    fn list_is_newest_first() {
        let store = MemoryStore::new();
        let first = store.create(new_note("first")).unwrap();
        let second = store.create(new_note("second")).unwrap();

        let ids: Vec<_> = store.list().unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![second, first]);
    }

    #[test]
    fn ids_continue_after_seeded_notes() {
        let store = MemoryStore::with_notes(vec![note("7", NoteStatus::Approved)]);
        let id = store.create(new_note("x")).unwrap();
        assert_eq!(id, NoteId::from("8"));
    }

    #[test]
    fn update_unknown_note_is_not_found() {
        let store = MemoryStore::new();
        let err = store
            .update(&NoteId::from("9"), &NotePatch::IsPinned(true))
            .unwrap_err();
        assert_eq!(err, StoreError::NotFound(NoteId::from("9")));
    }

    #[test]
    fn ledgers_are_scoped_per_viewer() {
        let ledgers = MemoryLedgerStore::new();
        ledgers.record("alice", &NoteId::from("1"), "👍").unwrap();

        assert_eq!(ledgers.load("alice").unwrap().get(&NoteId::from("1")), Some("👍"));
        assert!(ledgers.load("bob").unwrap().is_empty());
    }
}
