use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use tracing::info;

use gratitude_types::models::{Note, NoteId, NoteStatus};

use crate::Database;
use crate::models::NoteRow;
use crate::store::format_timestamp;

struct DemoNote {
    sender: &'static str,
    receiver: &'static str,
    text: &'static str,
    display_time: &'static str,
    status: NoteStatus,
    likes: u32,
    age_days: i64,
}

// Legacy `likes` are set and `reaction_counts` left empty so the first heart
// exercises the migration path.
const DEMO_NOTES: &[DemoNote] = &[
    DemoNote {
        sender: "Ahmed (student)",
        receiver: "Mr. Mohammed",
        text: "Thank you for today's math lesson, it was wonderful!",
        display_time: "10:30",
        status: NoteStatus::Approved,
        likes: 5,
        age_days: 0,
    },
    DemoNote {
        sender: "Sara's mother",
        receiver: "Ms. Fatima",
        text: "So grateful for how you look after Sara and keep encouraging her.",
        display_time: "11:15",
        status: NoteStatus::Approved,
        likes: 12,
        age_days: 1,
    },
    DemoNote {
        sender: "The principal",
        receiver: "The students",
        text: "Very proud of how clean the courtyard was today. You are amazing!",
        display_time: "09:00",
        status: NoteStatus::Approved,
        likes: 45,
        age_days: 8,
    },
    DemoNote {
        sender: "Khaled (student)",
        receiver: "Mr. Ali",
        text: "I did not fully understand the lesson, but thanks for trying.",
        display_time: "08:45",
        status: NoteStatus::Pending,
        likes: 0,
        age_days: 0,
    },
];

/// The demo set as notes, newest first. Also seeds the in-memory store.
pub fn demo_notes(now: DateTime<Utc>) -> Vec<Note> {
    let mut notes: Vec<Note> = DEMO_NOTES
        .iter()
        .enumerate()
        .map(|(i, demo)| Note {
            id: NoteId(format!("demo-{}", i + 1)),
            sender: demo.sender.to_string(),
            receiver: demo.receiver.to_string(),
            text: Some(demo.text.to_string()),
            audio_data: None,
            // Offset by index so no two demo notes share a timestamp.
            created_at: Some(now - Duration::days(demo.age_days) - Duration::seconds(i as i64)),
            display_time: demo.display_time.to_string(),
            status: demo.status,
            is_pinned: false,
            reaction_counts: Default::default(),
            likes: demo.likes,
        })
        .collect();

    notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    notes
}

/// Inserts the demo notes into an empty database. Returns how many were added.
pub fn seed_demo(db: &Database) -> Result<usize> {
    if db.count_notes()? > 0 {
        return Ok(0);
    }

    let notes = demo_notes(Utc::now());
    for note in &notes {
        db.insert_note(&NoteRow {
            id: note.id.to_string(),
            sender: note.sender.clone(),
            receiver: note.receiver.clone(),
            text: note.text.clone(),
            audio_data: None,
            display_time: note.display_time.clone(),
            status: note.status.as_str().to_string(),
            is_pinned: false,
            likes: note.likes,
            reaction_counts: "{}".to_string(),
            created_at: format_timestamp(note.created_at.unwrap_or_else(Utc::now)),
        })?;
    }

    info!("Seeded {} demo notes", notes.len());
    Ok(notes.len())
}
