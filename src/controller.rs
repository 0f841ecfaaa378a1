//! Grid edit controller - the runtime handle around [`GridModel`]
//!
//! The controller owns the model and a [`DataSource`]. It feeds messages to
//! [`update`], executes the returned commands (performing writes and feeding
//! their results back in as [`GridMsg::WriteCompleted`]), fans events out to
//! subscribers and accumulates redraw damage for the rendering surface.
//!
//! Hosts with an asynchronous write path can skip the controller and drive
//! [`update`] directly, delivering `WriteCompleted` whenever a write resolves.

use std::collections::{BTreeSet, VecDeque};
use std::fmt;

use crate::atom::CellView;
use crate::commands::{Cmd, Damage, GridEvent};
use crate::draft::{CommitError, Committed, DraftError, PendingWrite, SaveReport, WriteError};
use crate::messages::GridMsg;
use crate::model::{CellKey, FieldPath, GridModel, Row, RowId};
use crate::source::DataSource;
use crate::update::update;

type Subscriber = Box<dyn FnMut(&GridEvent)>;

/// Imperative surface over the grid state machine
pub struct GridController<S: DataSource> {
    model: GridModel,
    source: S,
    queue: VecDeque<GridMsg>,
    subscribers: Vec<Subscriber>,
    damage: Damage,
    /// Writes performed during the latest dispatch
    recent_writes: Vec<(PendingWrite, Result<Row, WriteError>)>,
    last_report: Option<SaveReport>,
}

impl<S: DataSource> fmt::Debug for GridController<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GridController")
            .field("model", &self.model)
            .field("subscribers", &self.subscribers.len())
            .field("damage", &self.damage)
            .finish_non_exhaustive()
    }
}

impl<S: DataSource> GridController<S> {
    pub fn new(model: GridModel, source: S) -> Self {
        Self {
            model,
            source,
            queue: VecDeque::new(),
            subscribers: Vec::new(),
            damage: Damage::None,
            recent_writes: Vec::new(),
            last_report: None,
        }
    }

    /// Register a callback for every [`GridEvent`]
    pub fn subscribe(&mut self, subscriber: impl FnMut(&GridEvent) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    /// Process a message and everything it triggers, to quiescence
    pub fn dispatch(&mut self, msg: GridMsg) {
        self.recent_writes.clear();
        self.queue.push_back(msg);
        while let Some(msg) = self.queue.pop_front() {
            if let Some(cmd) = update(&mut self.model, msg) {
                self.process_cmd(cmd);
            }
        }
    }

    fn process_cmd(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::None => {}
            Cmd::Redraw(damage) => self.damage.merge(damage),
            Cmd::Write(write) => {
                let result = self
                    .source
                    .write(&write.key.row, &write.key.field, &write.value);
                self.recent_writes.push((write.clone(), result.clone()));
                self.queue
                    .push_back(GridMsg::WriteCompleted { write, result });
            }
            Cmd::Notify(event) => {
                if let GridEvent::SaveFinished(report) = &event {
                    self.last_report = Some(report.clone());
                }
                for subscriber in &mut self.subscribers {
                    subscriber(&event);
                }
            }
            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.process_cmd(cmd);
                }
            }
        }
    }

    // === Imperative API ===

    /// Flush every draft through the data source.
    ///
    /// Failed cells keep their drafts and render in error mode.
    pub fn save_all_drafts(&mut self) -> SaveReport {
        self.last_report = None;
        self.dispatch(GridMsg::SaveAll);
        self.last_report.take().unwrap_or_default()
    }

    /// Drop every draft; all cells render their committed values again
    pub fn discard_all_drafts(&mut self) {
        self.dispatch(GridMsg::DiscardAll);
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.model.has_unsaved_changes()
    }

    pub fn is_row_dirty(&self, row: &RowId) -> bool {
        self.model.is_row_dirty(row)
    }

    pub fn dirty_rows(&self) -> BTreeSet<RowId> {
        self.model.dirty_rows()
    }

    pub fn draft_count(&self) -> usize {
        self.model.draft_count()
    }

    /// Drop the drafts of one row
    pub fn discard_row(&mut self, row: &RowId) {
        let keys: Vec<CellKey> = self
            .model
            .drafts
            .iter()
            .filter(|e| &e.key().row == row)
            .map(|e| e.key().clone())
            .collect();
        for key in keys {
            self.dispatch(GridMsg::DiscardCell(key));
        }
    }

    /// Persist one cell's draft. The draft survives a failed write.
    pub fn commit_cell(&mut self, key: CellKey) -> Result<Committed, CommitError> {
        let had_draft = self.model.drafts.contains(&key);
        let value = self.model.effective_value(&key);
        self.dispatch(GridMsg::CommitCell(key.clone()));

        if let Some((write, result)) = self.recent_writes.iter().rev().find(|(w, _)| w.key == key)
        {
            return match result {
                Ok(row) => Ok(Committed {
                    key,
                    value: write.value.clone(),
                    row: row.clone(),
                }),
                Err(error) => Err(CommitError::Write(error.clone())),
            };
        }
        if let Some(session) = self.model.session_for(&key).filter(|s| s.is_error()) {
            return Err(CommitError::Validation(session.messages.clone()));
        }
        if let Some(messages) = self.model.failures.get(&key) {
            return Err(CommitError::Validation(messages.clone()));
        }
        if !had_draft {
            return Err(DraftError::MissingEntry(key).into());
        }

        // Clean draft dropped without a write
        match self.model.rows.get(&key.row).cloned() {
            Some(row) => Ok(Committed { key, value, row }),
            None => Err(WriteError::RowNotFound(key.row).into()),
        }
    }

    /// Activate a cell, type `input` and complete the session
    pub fn edit_cell(&mut self, key: CellKey, input: &str) -> Option<CellView> {
        self.dispatch(GridMsg::Activate(key.clone()));
        self.dispatch(GridMsg::Input(input.to_string()));
        self.dispatch(GridMsg::Complete);
        self.model.cell_view(&key)
    }

    /// Render one cell
    pub fn cell(&self, row: &str, field: &str) -> Option<CellView> {
        self.model.cell_view(&CellKey::new(row, field))
    }

    pub fn set_editable(&mut self, field: &str, editable: bool) {
        self.dispatch(GridMsg::SetEditable {
            field: FieldPath::new(field),
            editable,
        });
    }

    pub fn replace_rows(&mut self, rows: Vec<Row>) {
        self.dispatch(GridMsg::ReplaceRows(rows));
    }

    /// Damage accumulated since the last call
    pub fn take_damage(&mut self) -> Damage {
        std::mem::take(&mut self.damage)
    }

    pub fn model(&self) -> &GridModel {
        &self.model
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn into_parts(self) -> (GridModel, S) {
        (self.model, self.source)
    }
}
