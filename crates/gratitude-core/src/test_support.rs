use gratitude_types::models::{NewNote, Note, NoteId, NotePatch, NoteStatus};

use crate::error::StoreError;
use crate::memory::MemoryStore;
use crate::store::NoteStore;

pub fn note(id: &str, status: NoteStatus) -> Note {
    Note {
        id: NoteId::from(id),
        sender: "X".into(),
        receiver: "Y".into(),
        text: Some(format!("note {id}")),
        audio_data: None,
        created_at: None,
        display_time: "10:30".into(),
        status,
        is_pinned: false,
        reaction_counts: Default::default(),
        likes: 0,
    }
}

/// Reads succeed, every write fails.
pub struct FailingStore {
    inner: MemoryStore,
}

impl FailingStore {
    pub fn with(notes: Vec<Note>) -> Self {
        Self {
            inner: MemoryStore::with_notes(notes),
        }
    }
}

fn offline() -> StoreError {
    StoreError::Unavailable("offline".into())
}

impl NoteStore for FailingStore {
    fn list(&self) -> Result<Vec<Note>, StoreError> {
        self.inner.list()
    }

    fn get(&self, id: &NoteId) -> Result<Note, StoreError> {
        self.inner.get(id)
    }

    fn create(&self, _note: NewNote) -> Result<NoteId, StoreError> {
        Err(offline())
    }

    fn update(&self, _id: &NoteId, _patch: &NotePatch) -> Result<(), StoreError> {
        Err(offline())
    }

    fn delete(&self, _id: &NoteId) -> Result<(), StoreError> {
        Err(offline())
    }
}
