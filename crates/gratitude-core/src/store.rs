//! Adapter seams. The core never talks to a database directly.

use gratitude_types::models::{NewNote, Note, NoteId, NotePatch};

use crate::error::StoreError;
use crate::ledger::ReactionLedger;

/// Record store adapter.
///
/// Implementations assign ids and `created_at` on create, return notes
/// newest-first from `list`, and apply each [`NotePatch`] without touching
/// any other field of the record.
pub trait NoteStore: Send + Sync {
    fn list(&self) -> Result<Vec<Note>, StoreError>;

    fn get(&self, id: &NoteId) -> Result<Note, StoreError>;

    fn create(&self, note: NewNote) -> Result<NoteId, StoreError>;

    fn update(&self, id: &NoteId, patch: &NotePatch) -> Result<(), StoreError>;

    /// Returns `NotFound` when the record is already gone.
    fn delete(&self, id: &NoteId) -> Result<(), StoreError>;
}

/// Per-viewer idempotency record for reactions. Advisory only.
pub trait LedgerStore: Send + Sync {
    fn load(&self, viewer: &str) -> Result<ReactionLedger, StoreError>;

    fn record(&self, viewer: &str, id: &NoteId, emoji: &str) -> Result<(), StoreError>;
}
