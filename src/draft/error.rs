//! Draft store error and outcome types
//!
//! All failures are returned as values; nothing panics or unwinds across the
//! store/controller boundary.

use thiserror::Error;

use crate::model::{CellKey, FieldPath, FieldValue, Row, RowId};

/// Failure reported by a data source's write path
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WriteError {
    #[error("row {0} not found")]
    RowNotFound(RowId),
    #[error("field {0} cannot be written to this row")]
    InvalidPath(FieldPath),
    #[error("{field} rejected: {reason}")]
    Rejected { field: FieldPath, reason: String },
    #[error("write failed: {0}")]
    Failed(String),
}

/// Misuse of the draft store API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("no draft for {0}")]
    MissingEntry(CellKey),
    #[error("a write for {0} is already in flight")]
    InFlight(CellKey),
}

/// Why a single cell could not be committed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CommitError {
    #[error(transparent)]
    Draft(#[from] DraftError),
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),
    #[error(transparent)]
    Write(#[from] WriteError),
    #[error("draft for {0} was discarded before the write completed")]
    Discarded(CellKey),
}

impl CommitError {
    /// Messages to show in the cell's error mode, in display order
    pub fn messages(&self) -> Vec<String> {
        match self {
            CommitError::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }
}

/// A successfully written cell
#[derive(Debug, Clone, PartialEq)]
pub struct Committed {
    pub key: CellKey,
    pub value: FieldValue,
    /// Updated record as returned by the write path
    pub row: Row,
}

/// A cell that failed to commit during a bulk save
#[derive(Debug, Clone, PartialEq)]
pub struct CellFailure {
    pub key: CellKey,
    pub error: CommitError,
}

/// Per-cell outcome of a bulk save, in draft creation order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SaveReport {
    pub saved: Vec<Committed>,
    /// Drafts dropped without a write because they matched their original
    pub skipped: Vec<CellKey>,
    /// Writes that resolved after their draft had been discarded
    pub orphaned: Vec<CellKey>,
    pub failures: Vec<CellFailure>,
}

impl SaveReport {
    pub fn saved_count(&self) -> usize {
        self.saved.len()
    }

    /// True when no cell failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn failed_keys(&self) -> impl Iterator<Item = &CellKey> {
        self.failures.iter().map(|f| &f.key)
    }

    /// Collapse into `Ok(saved count)` or `Err(per-cell failures)`
    pub fn into_result(self) -> Result<usize, Vec<CellFailure>> {
        if self.failures.is_empty() {
            Ok(self.saved.len())
        } else {
            Err(self.failures)
        }
    }
}
