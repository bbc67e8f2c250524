use crate::Database;
use crate::models::{LedgerRow, NoteRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

const NOTE_COLUMNS: &str = "id, sender, receiver, text, audio_data, display_time, status, \
     is_pinned, likes, reaction_counts, created_at";

impl Database {
    // -- Notes --

    pub fn insert_note(&self, row: &NoteRow) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notes (id, sender, receiver, text, audio_data, display_time, status, is_pinned, likes, reaction_counts, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                rusqlite::params![
                    row.id,
                    row.sender,
                    row.receiver,
                    row.text,
                    row.audio_data,
                    row.display_time,
                    row.status,
                    row.is_pinned,
                    row.likes,
                    row.reaction_counts,
                    row.created_at,
                ],
            )?;
            Ok(())
        })
    }

    /// All notes, newest first. Rowid breaks ties between equal timestamps.
    pub fn list_notes(&self) -> Result<Vec<NoteRow>> {
        self.with_conn(query_notes)
    }

    pub fn get_note(&self, id: &str) -> Result<Option<NoteRow>> {
        self.with_conn(|conn| query_note_by_id(conn, id))
    }

    pub fn count_notes(&self) -> Result<u64> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
            Ok(count as u64)
        })
    }

    /// Each setter touches one column and returns the number of rows changed.
    pub fn set_note_status(&self, id: &str, status: &str) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE notes SET status = ?2 WHERE id = ?1",
                rusqlite::params![id, status],
            )?)
        })
    }

    pub fn set_note_pinned(&self, id: &str, pinned: bool) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE notes SET is_pinned = ?2 WHERE id = ?1",
                rusqlite::params![id, pinned],
            )?)
        })
    }

    pub fn set_reaction_counts(&self, id: &str, counts_json: &str) -> Result<usize> {
        self.with_conn(|conn| {
            Ok(conn.execute(
                "UPDATE notes SET reaction_counts = ?2 WHERE id = ?1",
                rusqlite::params![id, counts_json],
            )?)
        })
    }

    pub fn delete_note(&self, id: &str) -> Result<usize> {
        self.with_conn(|conn| Ok(conn.execute("DELETE FROM notes WHERE id = ?1", [id])?))
    }

    // -- Viewer ledger --

    /// Keeps the first emoji a viewer used on a note.
    pub fn record_viewer_reaction(&self, viewer_id: &str, note_id: &str, emoji: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO viewer_reactions (viewer_id, note_id, emoji) VALUES (?1, ?2, ?3)",
                rusqlite::params![viewer_id, note_id, emoji],
            )?;
            Ok(())
        })
    }

    pub fn get_viewer_reactions(&self, viewer_id: &str) -> Result<Vec<LedgerRow>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT note_id, emoji FROM viewer_reactions WHERE viewer_id = ?1")?;

            let rows = stmt
                .query_map([viewer_id], |row| {
                    Ok(LedgerRow {
                        note_id: row.get(0)?,
                        emoji: row.get(1)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn map_note(row: &rusqlite::Row<'_>) -> rusqlite::Result<NoteRow> {
    Ok(NoteRow {
        id: row.get(0)?,
        sender: row.get(1)?,
        receiver: row.get(2)?,
        text: row.get(3)?,
        audio_data: row.get(4)?,
        display_time: row.get(5)?,
        status: row.get(6)?,
        is_pinned: row.get(7)?,
        likes: row.get(8)?,
        reaction_counts: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn query_notes(conn: &Connection) -> Result<Vec<NoteRow>> {
    let sql = format!("SELECT {NOTE_COLUMNS} FROM notes ORDER BY created_at DESC, rowid DESC");
    let mut stmt = conn.prepare(&sql)?;

    let rows = stmt
        .query_map([], map_note)?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn query_note_by_id(conn: &Connection, id: &str) -> Result<Option<NoteRow>> {
    let sql = format!("SELECT {NOTE_COLUMNS} FROM notes WHERE id = ?1");
    let mut stmt = conn.prepare(&sql)?;

    let row = stmt.query_row([id], map_note).optional()?;
    Ok(row)
}
