//! Per-viewer view model.
//!
//! A session holds the latest snapshot, whether the viewer passed the admin
//! gate, and their reaction ledger. Snapshots replace the note set wholesale;
//! mutations go through [`Wall`] and never touch `notes` directly.

use chrono::{DateTime, TimeZone};

use gratitude_types::api::{Intent, IntentOutcome, PinnedSummary, WallView};
use gratitude_types::models::{Note, NoteStatus};

use crate::error::{WallError, WallResult};
use crate::grouping::group_by_week;
use crate::ledger::ReactionLedger;
use crate::lifecycle::{Wall, visible_notes};

const PREVIEW_CHARS: usize = 30;

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub is_admin: bool,
    pub notes: Vec<Note>,
    pub ledger: ReactionLedger,
}

impl Session {
    pub fn new(is_admin: bool, ledger: ReactionLedger) -> Self {
        Self {
            is_admin,
            notes: Vec::new(),
            ledger,
        }
    }

    pub fn apply_snapshot(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    pub fn visible(&self) -> Vec<&Note> {
        visible_notes(&self.notes, self.is_admin)
    }

    pub fn pinned(&self) -> Vec<&Note> {
        self.visible().into_iter().filter(|n| n.is_pinned).collect()
    }

    pub fn pending_count(&self) -> usize {
        pending_count(&self.notes)
    }

    pub fn view<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> WallView {
        project(&self.notes, self.is_admin, now)
    }

    /// Resolves a UI intent to store calls.
    pub fn dispatch(&mut self, wall: &Wall, intent: Intent) -> WallResult<IntentOutcome> {
        if intent.requires_admin() && !self.is_admin {
            return Err(WallError::AdminRequired);
        }

        match intent {
            Intent::Submit { draft } => {
                let id = wall.submit(draft)?;
                Ok(IntentOutcome::Submitted { id })
            }
            Intent::Approve { id } => {
                let changed = wall.approve(&id)?;
                Ok(IntentOutcome::Approved { id, changed })
            }
            Intent::Delete { id } => {
                wall.delete(&id)?;
                Ok(IntentOutcome::Deleted { id })
            }
            Intent::TogglePin { id } => {
                let is_pinned = wall.toggle_pin(&id)?;
                Ok(IntentOutcome::PinToggled { id, is_pinned })
            }
            Intent::React { id, emoji } => {
                let count = wall.react(&id, &emoji, &mut self.ledger, self.is_admin)?;
                let emoji = emoji.trim().to_string();
                Ok(IntentOutcome::Reacted { id, emoji, count })
            }
        }
    }
}

/// Projects a snapshot for one viewer. Pure; safe to call on every snapshot.
pub fn project<Tz: TimeZone>(notes: &[Note], is_admin: bool, now: &DateTime<Tz>) -> WallView {
    let visible = visible_notes(notes, is_admin);

    WallView {
        is_admin,
        pending_count: is_admin.then(|| pending_count(notes)),
        pinned: visible
            .iter()
            .filter(|n| n.is_pinned)
            .map(|n| pinned_summary(n))
            .collect(),
        weeks: group_by_week(visible, now),
    }
}

fn pending_count(notes: &[Note]) -> usize {
    notes
        .iter()
        .filter(|n| n.status == NoteStatus::Pending)
        .count()
}

fn pinned_summary(note: &Note) -> PinnedSummary {
    let preview = match note.text.as_deref() {
        Some(text) if text.chars().count() > PREVIEW_CHARS => {
            let head: String = text.chars().take(PREVIEW_CHARS).collect();
            format!("{head}...")
        }
        Some(text) => text.to_string(),
        None => "Voice Message".to_string(),
    };

    PinnedSummary {
        id: note.id.clone(),
        sender: note.sender.clone(),
        preview,
    }
}
