//! The draft store: single owner of all pending, uncommitted edits

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::entry::{DraftEntry, WriteTicket};
use super::error::{CellFailure, CommitError, Committed, DraftError, SaveReport, WriteError};
use crate::model::{CellKey, FieldValue, Row, RowId};
use crate::source::DataSource;

/// A write handed to the data source, awaiting its result.
///
/// The draft entry stays in the store while the write is outstanding, so a
/// discard during that window is well-defined.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    pub ticket: WriteTicket,
    pub key: CellKey,
    pub value: FieldValue,
    revision: u64,
}

/// Result of resolving a [`PendingWrite`] against the store
#[derive(Debug, Clone, PartialEq)]
pub enum CommitOutcome {
    /// Written and the draft removed
    Committed(Committed),
    /// Written, but the cell was edited again while in flight; the newer
    /// value stays pending against the written one
    Superseded(Committed),
    /// The draft was discarded before the write resolved; local state is
    /// left alone whatever the write's result
    Orphaned(CellKey),
    /// Write failed; the draft is kept intact
    Failed(CellKey, WriteError),
}

/// Writes to issue for a bulk save
#[derive(Debug, Clone, Default)]
pub struct SavePlan {
    pub writes: Vec<PendingWrite>,
    /// Clean drafts dropped without a write
    pub skipped: Vec<CellKey>,
}

/// Keyed storage of draft entries, iterated in creation order
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    entries: BTreeMap<u64, DraftEntry>,
    index: HashMap<CellKey, u64>,
    next_sequence: u64,
    next_ticket: u64,
}

impl DraftStore {
    pub fn new() -> Self {
        Self::default()
    }

    // === Single-cell operations ===

    /// Open a draft for `key`, capturing `original` as its baseline.
    ///
    /// If a draft already exists the original is NOT overwritten. Returns true
    /// when a new entry was created.
    pub fn begin_edit(&mut self, key: CellKey, original: FieldValue) -> bool {
        if self.index.contains_key(&key) {
            tracing::trace!(target: "drafts", %key, "begin_edit on existing draft");
            return false;
        }

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        tracing::debug!(target: "drafts", %key, sequence, "draft opened");
        self.index.insert(key.clone(), sequence);
        self.entries
            .insert(sequence, DraftEntry::new(key, original, sequence));
        true
    }

    /// Replace the current value of an existing draft
    pub fn update(&mut self, key: &CellKey, current: FieldValue) -> Result<(), DraftError> {
        let entry = self
            .entry_mut(key)
            .ok_or_else(|| DraftError::MissingEntry(key.clone()))?;
        if entry.set_current(current) {
            tracing::trace!(target: "drafts", %key, revision = entry.revision, "draft updated");
        }
        Ok(())
    }

    /// Remove a draft unconditionally. Discarding a missing key is a no-op.
    pub fn discard_one(&mut self, key: &CellKey) -> Option<DraftEntry> {
        let sequence = self.index.remove(key)?;
        let entry = self.entries.remove(&sequence);
        if let Some(entry) = &entry {
            tracing::debug!(
                target: "drafts",
                %key,
                in_flight = entry.is_in_flight(),
                "draft discarded"
            );
        }
        entry
    }

    /// Drop every draft. Returns the discarded keys in creation order.
    pub fn discard_all(&mut self) -> Vec<CellKey> {
        let keys: Vec<CellKey> = self.entries.values().map(|e| e.key().clone()).collect();
        self.entries.clear();
        self.index.clear();
        if !keys.is_empty() {
            tracing::debug!(target: "drafts", count = keys.len(), "all drafts discarded");
        }
        keys
    }

    /// Drop every draft belonging to one row
    pub fn discard_row(&mut self, row: &RowId) -> Vec<CellKey> {
        let keys: Vec<CellKey> = self
            .entries
            .values()
            .filter(|e| &e.key().row == row)
            .map(|e| e.key().clone())
            .collect();
        for key in &keys {
            self.discard_one(key);
        }
        keys
    }

    // === Commit ===

    /// First half of a commit: tag the draft with a write ticket.
    pub fn begin_commit(&mut self, key: &CellKey) -> Result<PendingWrite, DraftError> {
        let ticket = WriteTicket(self.next_ticket);
        let entry = self
            .entry_mut(key)
            .ok_or_else(|| DraftError::MissingEntry(key.clone()))?;
        if entry.is_in_flight() {
            return Err(DraftError::InFlight(key.clone()));
        }

        entry.in_flight = Some(ticket);
        let pending = PendingWrite {
            ticket,
            key: key.clone(),
            value: entry.current().clone(),
            revision: entry.revision,
        };
        self.next_ticket += 1;
        Ok(pending)
    }

    /// Second half of a commit: apply the write path's result.
    pub fn finish_commit(
        &mut self,
        pending: &PendingWrite,
        result: Result<Row, WriteError>,
    ) -> CommitOutcome {
        let key = &pending.key;
        let matches_ticket = self
            .get(key)
            .is_some_and(|entry| entry.in_flight == Some(pending.ticket));
        if !matches_ticket {
            tracing::debug!(
                target: "drafts",
                %key,
                succeeded = result.is_ok(),
                "write resolved after draft was discarded"
            );
            return CommitOutcome::Orphaned(key.clone());
        }

        match result {
            Ok(row) => {
                let committed = Committed {
                    key: key.clone(),
                    value: pending.value.clone(),
                    row,
                };
                let superseded = self
                    .get(key)
                    .is_some_and(|entry| entry.revision != pending.revision);
                if superseded {
                    if let Some(entry) = self.entry_mut(key) {
                        entry.in_flight = None;
                        // The written value is what the row holds now
                        entry.rebase(pending.value.clone());
                    }
                    tracing::debug!(target: "drafts", %key, "write superseded by newer edit");
                    CommitOutcome::Superseded(committed)
                } else {
                    self.discard_one(key);
                    tracing::debug!(target: "drafts", %key, "draft committed");
                    CommitOutcome::Committed(committed)
                }
            }
            Err(error) => {
                if let Some(entry) = self.entry_mut(key) {
                    entry.in_flight = None;
                }
                tracing::warn!(target: "drafts", %key, %error, "commit failed, draft kept");
                CommitOutcome::Failed(key.clone(), error)
            }
        }
    }

    /// Commit one draft synchronously through `source`.
    ///
    /// On failure the draft stays intact and the error is returned.
    pub fn commit_one<S: DataSource + ?Sized>(
        &mut self,
        key: &CellKey,
        source: &mut S,
    ) -> Result<Committed, CommitError> {
        let pending = self.begin_commit(key)?;
        let result = source.write(&pending.key.row, &pending.key.field, &pending.value);
        match self.finish_commit(&pending, result) {
            CommitOutcome::Committed(committed) | CommitOutcome::Superseded(committed) => {
                Ok(committed)
            }
            CommitOutcome::Orphaned(key) => Err(CommitError::Discarded(key)),
            CommitOutcome::Failed(_, error) => Err(CommitError::Write(error)),
        }
    }

    /// Begin a commit for every dirty draft not already in flight, in
    /// creation order. Clean drafts are dropped and reported as skipped.
    pub fn begin_save_all(&mut self) -> SavePlan {
        self.begin_save_matching(|_| true)
    }

    /// Like [`begin_save_all`](Self::begin_save_all), but drafts rejected by
    /// `accept` are left untouched, clean or not.
    pub fn begin_save_matching(&mut self, mut accept: impl FnMut(&DraftEntry) -> bool) -> SavePlan {
        let mut plan = SavePlan::default();
        let keys: Vec<(CellKey, bool, bool)> = self
            .entries
            .values()
            .filter(|e| accept(e))
            .map(|e| (e.key().clone(), e.is_dirty(), e.is_in_flight()))
            .collect();

        for (key, dirty, in_flight) in keys {
            if in_flight {
                continue;
            }
            if !dirty {
                self.discard_one(&key);
                plan.skipped.push(key);
                continue;
            }
            match self.begin_commit(&key) {
                Ok(pending) => plan.writes.push(pending),
                Err(error) => tracing::warn!(target: "drafts", %key, %error, "skipping draft"),
            }
        }
        plan
    }

    /// Commit every outstanding draft through `source`.
    ///
    /// Each cell is attempted independently; one failure does not stop the
    /// others. Failed drafts stay in the store.
    pub fn save_all<S: DataSource + ?Sized>(&mut self, source: &mut S) -> SaveReport {
        let plan = self.begin_save_all();
        let mut report = SaveReport {
            skipped: plan.skipped,
            ..Default::default()
        };

        for pending in plan.writes {
            let result = source.write(&pending.key.row, &pending.key.field, &pending.value);
            record_outcome(&mut report, self.finish_commit(&pending, result));
        }

        tracing::info!(
            target: "drafts",
            saved = report.saved.len(),
            failed = report.failures.len(),
            skipped = report.skipped.len(),
            "save_all finished"
        );
        report
    }

    // === Queries ===

    pub fn get(&self, key: &CellKey) -> Option<&DraftEntry> {
        self.index.get(key).and_then(|seq| self.entries.get(seq))
    }

    /// Current draft value for `key`, if any
    pub fn value(&self, key: &CellKey) -> Option<&FieldValue> {
        self.get(key).map(DraftEntry::current)
    }

    pub fn contains(&self, key: &CellKey) -> bool {
        self.index.contains_key(key)
    }

    /// Grid dirty flag: at least one draft differs from its original
    pub fn has_unsaved_changes(&self) -> bool {
        self.entries.values().any(DraftEntry::is_dirty)
    }

    /// Row dirty flag, derived from the entries on every call
    pub fn is_row_dirty(&self, row: &RowId) -> bool {
        self.entries
            .values()
            .any(|e| &e.key().row == row && e.is_dirty())
    }

    pub fn dirty_rows(&self) -> BTreeSet<RowId> {
        self.entries
            .values()
            .filter(|e| e.is_dirty())
            .map(|e| e.key().row.clone())
            .collect()
    }

    pub fn dirty_count(&self) -> usize {
        self.entries.values().filter(|e| e.is_dirty()).count()
    }

    /// Entries in creation order
    pub fn iter(&self) -> impl Iterator<Item = &DraftEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn entry_mut(&mut self, key: &CellKey) -> Option<&mut DraftEntry> {
        let seq = self.index.get(key)?;
        self.entries.get_mut(seq)
    }

    /// Panic if the key index and the entries disagree
    pub fn assert_invariants(&self) {
        assert_eq!(
            self.index.len(),
            self.entries.len(),
            "draft index and entries out of sync"
        );
        for (key, seq) in &self.index {
            let entry = self
                .entries
                .get(seq)
                .unwrap_or_else(|| panic!("index points at missing entry for {}", key));
            assert_eq!(entry.key(), key, "entry stored under wrong key");
            assert_eq!(entry.sequence, *seq, "entry sequence mismatch");
        }
    }
}

/// Fold one commit outcome into a save report
pub(crate) fn record_outcome(report: &mut SaveReport, outcome: CommitOutcome) {
    match outcome {
        CommitOutcome::Committed(committed) | CommitOutcome::Superseded(committed) => {
            report.saved.push(committed)
        }
        CommitOutcome::Orphaned(key) => report.orphaned.push(key),
        CommitOutcome::Failed(key, error) => report.failures.push(CellFailure {
            key,
            error: CommitError::Write(error),
        }),
    }
}
