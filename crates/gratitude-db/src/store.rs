use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::warn;
use uuid::Uuid;

use gratitude_core::{LedgerStore, NoteStore, ReactionLedger, StoreError};
use gratitude_types::models::{NewNote, Note, NoteId, NotePatch, NoteStatus};

use crate::Database;
use crate::models::NoteRow;

/// SQLite-backed record store and viewer ledger.
pub struct SqliteStore {
    db: Database,
}

impl SqliteStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }
}

/// Timestamps are stored in one fixed format so they sort as text.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // Rows written by SQLite's datetime('now') carry no timezone.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .ok()
}

fn note_from_row(row: NoteRow) -> Note {
    let status = NoteStatus::parse(&row.status).unwrap_or_else(|| {
        warn!("Corrupt status '{}' on note '{}', treating as pending", row.status, row.id);
        NoteStatus::Pending
    });

    let reaction_counts: BTreeMap<String, u32> = serde_json::from_str(&row.reaction_counts)
        .unwrap_or_else(|e| {
            warn!("Corrupt reaction_counts on note '{}': {}", row.id, e);
            BTreeMap::new()
        });

    let created_at = parse_timestamp(&row.created_at);
    if created_at.is_none() {
        warn!("Corrupt created_at '{}' on note '{}'", row.created_at, row.id);
    }

    Note {
        id: NoteId(row.id),
        sender: row.sender,
        receiver: row.receiver,
        text: row.text,
        audio_data: row.audio_data,
        created_at,
        display_time: row.display_time,
        status,
        is_pinned: row.is_pinned,
        reaction_counts,
        likes: row.likes,
    }
}

fn require_changed(changed: usize, id: &NoteId) -> Result<(), StoreError> {
    if changed == 0 {
        return Err(StoreError::NotFound(id.clone()));
    }
    Ok(())
}

impl NoteStore for SqliteStore {
    fn list(&self) -> Result<Vec<Note>, StoreError> {
        let rows = self.db.list_notes().map_err(StoreError::unavailable)?;
        Ok(rows.into_iter().map(note_from_row).collect())
    }

    fn get(&self, id: &NoteId) -> Result<Note, StoreError> {
        self.db
            .get_note(id.as_str())
            .map_err(StoreError::unavailable)?
            .map(note_from_row)
            .ok_or_else(|| StoreError::NotFound(id.clone()))
    }

    fn create(&self, note: NewNote) -> Result<NoteId, StoreError> {
        let id = Uuid::new_v4().to_string();

        let row = NoteRow {
            id: id.clone(),
            sender: note.sender,
            receiver: note.receiver,
            text: note.text,
            audio_data: note.audio_data,
            display_time: note.display_time,
            status: NoteStatus::Pending.as_str().to_string(),
            is_pinned: false,
            likes: 0,
            reaction_counts: "{}".to_string(),
            created_at: format_timestamp(Utc::now()),
        };

        self.db.insert_note(&row).map_err(StoreError::unavailable)?;
        Ok(NoteId(id))
    }

    fn update(&self, id: &NoteId, patch: &NotePatch) -> Result<(), StoreError> {
        let changed = match patch {
            NotePatch::Status(status) => self.db.set_note_status(id.as_str(), status.as_str()),
            NotePatch::IsPinned(pinned) => self.db.set_note_pinned(id.as_str(), *pinned),
            NotePatch::ReactionCounts(counts) => {
                let json = serde_json::to_string(counts).map_err(StoreError::unavailable)?;
                self.db.set_reaction_counts(id.as_str(), &json)
            }
        }
        .map_err(StoreError::unavailable)?;

        require_changed(changed, id)
    }

    fn delete(&self, id: &NoteId) -> Result<(), StoreError> {
        let changed = self.db.delete_note(id.as_str()).map_err(StoreError::unavailable)?;
        require_changed(changed, id)
    }
}

impl LedgerStore for SqliteStore {
    fn load(&self, viewer: &str) -> Result<ReactionLedger, StoreError> {
        let rows = self
            .db
            .get_viewer_reactions(viewer)
            .map_err(StoreError::unavailable)?;

        Ok(rows
            .into_iter()
            .map(|row| (NoteId(row.note_id), row.emoji))
            .collect())
    }

    fn record(&self, viewer: &str, id: &NoteId, emoji: &str) -> Result<(), StoreError> {
        self.db
            .record_viewer_reaction(viewer, id.as_str(), emoji)
            .map_err(StoreError::unavailable)
    }
}
