use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Note, NoteDraft, NoteId, NoteStatus};

// -- Notes --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitNoteRequest {
    #[serde(default)]
    pub sender: Option<String>,
    pub receiver: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub audio_data: Option<String>,
}

impl From<SubmitNoteRequest> for NoteDraft {
    fn from(req: SubmitNoteRequest) -> Self {
        NoteDraft {
            sender: req.sender,
            receiver: req.receiver,
            text: req.text,
            audio_data: req.audio_data,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitNoteResponse {
    pub id: NoteId,
    pub status: NoteStatus,
}

// -- Reactions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReactRequest {
    pub emoji: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LedgerResponse {
    pub reactions: BTreeMap<NoteId, String>,
}

// -- Intents --

/// Action emitted by the UI. The core resolves each one to store calls.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Intent {
    Submit { draft: NoteDraft },
    Approve { id: NoteId },
    Delete { id: NoteId },
    TogglePin { id: NoteId },
    React { id: NoteId, emoji: String },
}

impl Intent {
    pub fn requires_admin(&self) -> bool {
        matches!(self, Self::Approve { .. } | Self::Delete { .. } | Self::TogglePin { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum IntentOutcome {
    Submitted { id: NoteId },
    /// `changed` is false when the note was already approved.
    Approved { id: NoteId, changed: bool },
    Deleted { id: NoteId },
    PinToggled { id: NoteId, is_pinned: bool },
    Reacted { id: NoteId, emoji: String, count: u32 },
}

// -- Views --

/// One calendar week (Sunday to Saturday) of notes, in store order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekBucket {
    pub week_start: NaiveDate,
    pub label: String,
    /// The current week renders open; every other bucket is archived.
    pub is_current: bool,
    pub notes: Vec<Note>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinnedSummary {
    pub id: NoteId,
    pub sender: String,
    pub preview: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallView {
    pub is_admin: bool,
    /// Only reported to the admin.
    pub pending_count: Option<usize>,
    pub pinned: Vec<PinnedSummary>,
    pub weeks: Vec<WeekBucket>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
