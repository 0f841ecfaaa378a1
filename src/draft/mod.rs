//! Draft store: buffered pending edits
//!
//! Every editable cell that has entered edit mode gets at most one
//! [`DraftEntry`], keyed by [`CellKey`](crate::model::CellKey). Entries hold
//! the value captured when editing began and the latest candidate value.
//!
//! ```text
//! begin_edit ──► update* ──┬─► commit_one / save_all ──► (removed on success)
//!                          └─► discard_one / discard_all ─► (removed)
//! ```
//!
//! Commits are split into [`DraftStore::begin_commit`] and
//! [`DraftStore::finish_commit`] so a write path that suspends can be
//! modelled; the synchronous helpers compose the two halves.

mod entry;
mod error;
mod store;

pub use entry::{DraftEntry, WriteTicket};
pub use error::{CellFailure, CommitError, Committed, DraftError, SaveReport, WriteError};
pub(crate) use store::record_outcome;
pub use store::{CommitOutcome, DraftStore, PendingWrite, SavePlan};
