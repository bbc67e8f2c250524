//! At-most-one reaction per viewer per note.
//!
//! The ledger lives with the viewer (one per device), so it stops accidental
//! repeats but cannot give exactly-once across devices.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::info;

use gratitude_types::models::{HEART, Note, NoteId, NotePatch};

use crate::error::{WallError, WallResult};
use crate::lifecycle::Wall;

/// Note id -> emoji this viewer already used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReactionLedger {
    entries: BTreeMap<NoteId, String>,
}

impl ReactionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &NoteId) -> Option<&str> {
        self.entries.get(id).map(String::as_str)
    }

    pub fn contains(&self, id: &NoteId) -> bool {
        self.entries.contains_key(id)
    }

    /// Keeps the first emoji recorded for a note.
    pub fn record(&mut self, id: NoteId, emoji: String) {
        self.entries.entry(id).or_insert(emoji);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<NoteId, String> {
        &self.entries
    }
}

impl FromIterator<(NoteId, String)> for ReactionLedger {
    fn from_iter<I: IntoIterator<Item = (NoteId, String)>>(iter: I) -> Self {
        let mut ledger = Self::new();
        for (id, emoji) in iter {
            ledger.record(id, emoji);
        }
        ledger
    }
}

/// Counts after one more `emoji`. A first heart on a note that still carries
/// only the legacy `likes` tally starts from that tally; once the heart key
/// exists the seed never applies again.
pub fn counts_after_reaction(note: &Note, emoji: &str) -> BTreeMap<String, u32> {
    let mut counts = note.reaction_counts.clone();

    if emoji == HEART && note.likes > 0 && !counts.contains_key(HEART) {
        counts.insert(HEART.to_string(), note.likes);
    }

    *counts.entry(emoji.to_string()).or_insert(0) += 1;
    counts
}

impl Wall {
    /// Adds one `emoji` reaction from the viewer owning `ledger`.
    ///
    /// The ledger entry is written only after the store confirmed the new
    /// counts. Guests cannot react to notes they cannot see.
    pub fn react(
        &self,
        id: &NoteId,
        emoji: &str,
        ledger: &mut ReactionLedger,
        is_admin: bool,
    ) -> WallResult<u32> {
        if let Some(used) = ledger.get(id) {
            return Err(WallError::AlreadyReacted {
                id: id.clone(),
                emoji: used.to_string(),
            });
        }

        let emoji = emoji.trim();
        if emoji.is_empty() {
            return Err(WallError::Validation("reaction emoji is empty".into()));
        }

        let note = self.store().get(id)?;
        if !is_admin && !note.is_approved() {
            return Err(WallError::NotFound(id.clone()));
        }

        let counts = counts_after_reaction(&note, emoji);
        let count = counts.get(emoji).copied().unwrap_or_default();

        self.store().update(id, &NotePatch::ReactionCounts(counts))?;
        ledger.record(id.clone(), emoji.to_string());

        info!("Note {} reaction {} -> {}", id, emoji, count);
        Ok(count)
    }
}
