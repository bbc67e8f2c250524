use gratitude_types::models::NoteId;
use thiserror::Error;

/// Failure reported by a record store or ledger adapter.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("note not found: {0}")]
    NotFound(NoteId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    pub fn unavailable(err: impl std::fmt::Display) -> Self {
        Self::Unavailable(err.to_string())
    }
}

/// Per-operation failure. None of these are fatal; callers retry or re-render.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WallError {
    /// Rejected locally before any store call.
    #[error("invalid submission: {0}")]
    Validation(String),

    #[error("note not found: {0}")]
    NotFound(NoteId),

    /// Rejected locally before any store call.
    #[error("already reacted to note {id} with {emoji}")]
    AlreadyReacted { id: NoteId, emoji: String },

    #[error("admin access required")]
    AdminRequired,

    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
}

impl From<StoreError> for WallError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::NotFound(id) => Self::NotFound(id),
            StoreError::Unavailable(msg) => Self::StoreUnavailable(msg),
        }
    }
}

pub type WallResult<T> = Result<T, WallError>;
