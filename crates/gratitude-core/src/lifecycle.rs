//! Note lifecycle: `pending -> approved`, either state -> deleted.
//!
//! Every transition reads the authoritative record from the store, checks it,
//! and persists a single-field patch. Nothing local changes here; views move
//! only when the next snapshot is applied.

use std::sync::Arc;

use chrono::Local;
use tracing::info;

use gratitude_types::models::{ANONYMOUS, NewNote, Note, NoteDraft, NoteId, NotePatch, NoteStatus};

use crate::error::{WallError, WallResult};
use crate::store::NoteStore;

#[derive(Clone)]
pub struct Wall {
    store: Arc<dyn NoteStore>,
}

impl Wall {
    pub fn new(store: Arc<dyn NoteStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn NoteStore> {
        &self.store
    }

    /// Creates a `pending` note. Empty submissions never reach the store.
    pub fn submit(&self, draft: NoteDraft) -> WallResult<NoteId> {
        let display_time = Local::now().format("%H:%M").to_string();
        let note = validate_draft(draft, display_time)?;

        let id = self.store.create(note)?;
        info!("Note {} submitted for review", id);
        Ok(id)
    }

    /// Moves a pending note to approved. Returns `false` if it already was.
    pub fn approve(&self, id: &NoteId) -> WallResult<bool> {
        let note = self.store.get(id)?;
        if note.is_approved() {
            return Ok(false);
        }

        self.store.update(id, &NotePatch::Status(NoteStatus::Approved))?;
        info!("Note {} approved", id);
        Ok(true)
    }

    /// Removes a note in any state. Rejecting a pending note is the same call.
    pub fn delete(&self, id: &NoteId) -> WallResult<()> {
        self.store.delete(id)?;
        info!("Note {} deleted", id);
        Ok(())
    }

    /// Flips the pin flag and returns the new value. Status is untouched.
    pub fn toggle_pin(&self, id: &NoteId) -> WallResult<bool> {
        let note = self.store.get(id)?;
        let pinned = !note.is_pinned;

        self.store.update(id, &NotePatch::IsPinned(pinned))?;
        info!("Note {} pinned={}", id, pinned);
        Ok(pinned)
    }
}

/// Normalizes a guest draft. Blank text counts as absent; a note needs text
/// or audio.
pub fn validate_draft(draft: NoteDraft, display_time: String) -> WallResult<NewNote> {
    let text = draft.text.filter(|t| !t.trim().is_empty());
    let audio_data = draft.audio_data.filter(|a| !a.trim().is_empty());

    if text.is_none() && audio_data.is_none() {
        return Err(WallError::Validation(
            "a note needs text or a voice recording".into(),
        ));
    }

    let sender = draft
        .sender
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| ANONYMOUS.to_string());

    Ok(NewNote {
        sender,
        receiver: draft.receiver.trim().to_string(),
        text,
        audio_data,
        display_time,
    })
}

/// Notes a viewer may see: everything for the admin, approved notes otherwise.
pub fn visible_notes(notes: &[Note], is_admin: bool) -> Vec<&Note> {
    notes
        .iter()
        .filter(|n| is_admin || n.is_approved())
        .collect()
}
