//! Draft entries

use crate::model::{CellKey, FieldValue};

/// Identifies one in-flight write of a draft entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WriteTicket(pub(crate) u64);

/// A buffered pending edit for one cell
///
/// `original` is captured once, when the cell first enters edit mode. It only
/// moves when a write of this entry lands while a newer edit is pending.
#[derive(Debug, Clone, PartialEq)]
pub struct DraftEntry {
    key: CellKey,
    original: FieldValue,
    current: FieldValue,
    /// Creation order within the store
    pub(crate) sequence: u64,
    /// Bumped each time `current` changes
    pub(crate) revision: u64,
    pub(crate) in_flight: Option<WriteTicket>,
}

impl DraftEntry {
    pub(crate) fn new(key: CellKey, original: FieldValue, sequence: u64) -> Self {
        Self {
            key,
            current: original.clone(),
            original,
            sequence,
            revision: 0,
            in_flight: None,
        }
    }

    pub fn key(&self) -> &CellKey {
        &self.key
    }

    pub fn original(&self) -> &FieldValue {
        &self.original
    }

    pub fn current(&self) -> &FieldValue {
        &self.current
    }

    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// True while a write for this entry is awaiting completion
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Current differs from original under the value type's equality
    pub fn is_dirty(&self) -> bool {
        !self.current.same_as(&self.original)
    }

    /// Move the baseline to a value that is now authoritative
    pub(crate) fn rebase(&mut self, original: FieldValue) {
        self.original = original;
    }

    /// Replace the current value. Returns false if nothing changed.
    pub(crate) fn set_current(&mut self, value: FieldValue) -> bool {
        if self.current.same_as(&value) {
            return false;
        }
        self.current = value;
        self.revision += 1;
        true
    }
}
