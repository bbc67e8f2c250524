use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Reaction key that replaced the legacy `likes` counter.
pub const HEART: &str = "❤️";

/// Sender name used when a guest leaves the field blank.
pub const ANONYMOUS: &str = "Anonymous";

/// Store-assigned note identifier. Opaque to everything above the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NoteId(pub String);

impl NoteId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NoteId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for NoteId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Moderation status. Rejection deletes the record, so there is no third state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteStatus {
    Pending,
    Approved,
}

impl NoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            _ => None,
        }
    }
}

/// A submitted message, text and/or voice, with moderation and reaction state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub sender: String,
    pub receiver: String,
    pub text: Option<String>,
    pub audio_data: Option<String>,
    /// `None` until the store has assigned the authoritative timestamp.
    pub created_at: Option<DateTime<Utc>>,
    pub display_time: String,
    pub status: NoteStatus,
    pub is_pinned: bool,
    #[serde(default)]
    pub reaction_counts: BTreeMap<String, u32>,
    /// Legacy heart counter, superseded by `reaction_counts[HEART]`.
    #[serde(default)]
    pub likes: u32,
}

impl Note {
    pub fn is_approved(&self) -> bool {
        self.status == NoteStatus::Approved
    }

    /// Effective count for display. Hearts fall back to the legacy counter
    /// until the first heart reaction migrates it.
    pub fn reaction_count(&self, emoji: &str) -> u32 {
        match self.reaction_counts.get(emoji) {
            Some(count) => *count,
            None if emoji == HEART => self.likes,
            None => 0,
        }
    }
}

/// Guest submission as received from the UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NoteDraft {
    #[serde(default)]
    pub sender: Option<String>,
    pub receiver: String,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub audio_data: Option<String>,
}

/// A validated draft, ready to be handed to a store adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNote {
    pub sender: String,
    pub receiver: String,
    pub text: Option<String>,
    pub audio_data: Option<String>,
    pub display_time: String,
}

/// Partial update. Each variant touches exactly one field of the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotePatch {
    Status(NoteStatus),
    IsPinned(bool),
    ReactionCounts(BTreeMap<String, u32>),
}

impl NotePatch {
    /// Apply to an in-memory record. Used by adapters that hold notes directly.
    pub fn apply(&self, note: &mut Note) {
        match self {
            Self::Status(status) => note.status = *status,
            Self::IsPinned(pinned) => note.is_pinned = *pinned,
            Self::ReactionCounts(counts) => note.reaction_counts = counts.clone(),
        }
    }
}
