//! Moderation, reaction and grouping rules for the gratitude wall.
//!
//! Everything here is adapter-agnostic: records come in through a
//! [`store::NoteStore`], and views are pure projections of the latest
//! snapshot.

pub mod error;
pub mod grouping;
pub mod ledger;
pub mod lifecycle;
pub mod memory;
pub mod session;
pub mod store;

pub use error::{StoreError, WallError, WallResult};
pub use ledger::ReactionLedger;
pub use lifecycle::Wall;
pub use session::Session;
pub use store::{LedgerStore, NoteStore};

#[cfg(test)]
pub(crate) mod test_support;
