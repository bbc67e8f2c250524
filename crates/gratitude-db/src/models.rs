/// Database row types. These map directly to SQLite rows and stay
/// independent of the shared note model.

pub struct NoteRow {
    pub id: String,
    pub sender: String,
    pub receiver: String,
    pub text: Option<String>,
    pub audio_data: Option<String>,
    pub display_time: String,
    pub status: String,
    pub is_pinned: bool,
    pub likes: u32,
    pub reaction_counts: String,
    pub created_at: String,
}

pub struct LedgerRow {
    pub note_id: String,
    pub emoji: String,
}
