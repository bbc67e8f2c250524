use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS notes (
            id              TEXT PRIMARY KEY,
            sender          TEXT NOT NULL,
            receiver        TEXT NOT NULL,
            text            TEXT,
            audio_data      TEXT,
            display_time    TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'pending'
                            CHECK (status IN ('pending', 'approved')),
            is_pinned       INTEGER NOT NULL DEFAULT 0,
            likes           INTEGER NOT NULL DEFAULT 0,
            reaction_counts TEXT NOT NULL DEFAULT '{}',
            created_at      TEXT NOT NULL,
            CHECK (text IS NOT NULL OR audio_data IS NOT NULL)
        );

        CREATE INDEX IF NOT EXISTS idx_notes_created
            ON notes(created_at);

        -- One reaction per viewer per note. No foreign key: the ledger is
        -- the viewer's record and outlives deleted notes.
        CREATE TABLE IF NOT EXISTS viewer_reactions (
            viewer_id   TEXT NOT NULL,
            note_id     TEXT NOT NULL,
            emoji       TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (viewer_id, note_id)
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
