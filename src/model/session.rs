//! Transient edit state: the single active session and bulk save progress

use std::collections::HashSet;

use super::cell::CellKey;
use super::value::{FieldType, FieldValue};
use crate::atom::{FieldEditor, FieldMode};
use crate::draft::{SaveReport, WriteTicket};

/// The single-focus editing episode for one cell
#[derive(Debug, Clone)]
pub struct EditSession {
    pub key: CellKey,
    pub field_type: FieldType,
    pub editor: FieldEditor,
    /// Edit or Error; never Display while the session lives
    pub mode: FieldMode,
    /// Validation messages shown in error mode, in rule order
    pub messages: Vec<String>,
    /// Draft value the cell held before this session opened. `None` means
    /// the cell had no draft and cancel discards the entry.
    pub previous: Option<FieldValue>,
}

impl EditSession {
    pub fn new(
        key: CellKey,
        field_type: FieldType,
        editor: FieldEditor,
        previous: Option<FieldValue>,
    ) -> Self {
        Self {
            key,
            field_type,
            editor,
            mode: FieldMode::Edit,
            messages: Vec::new(),
            previous,
        }
    }

    pub fn is_error(&self) -> bool {
        self.mode == FieldMode::Error
    }

    /// Enter error mode with a fresh message list
    pub fn fail(&mut self, messages: Vec<String>) {
        self.mode = FieldMode::Error;
        self.messages = messages;
    }
}

/// A bulk save whose writes have not all resolved yet
#[derive(Debug, Clone, Default)]
pub struct SaveProgress {
    pub outstanding: HashSet<WriteTicket>,
    pub report: SaveReport,
}

impl SaveProgress {
    pub fn is_finished(&self) -> bool {
        self.outstanding.is_empty()
    }
}
