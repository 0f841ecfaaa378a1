//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use crate::draft::{PendingWrite, WriteError};
use crate::model::{CellKey, FieldPath, FieldValue, Row};

/// Gestures and completions accepted by the grid
#[derive(Debug, Clone)]
pub enum GridMsg {
    // === Edit session ===
    /// Activation gesture on a cell (double click, Enter, typing)
    Activate(CellKey),
    /// Raw text typed into the active editor
    Input(String),
    /// Typed control change in the active editor (checkbox, picker)
    SetValue(FieldValue),
    /// Commit gesture for the active session
    Complete,
    /// Abort gesture for the active session
    Cancel,

    // === Single cell ===
    /// Persist one cell's draft through the write path
    CommitCell(CellKey),
    /// Drop one cell's draft
    DiscardCell(CellKey),

    // === Bulk ===
    SaveAll,
    DiscardAll,

    // === Host ===
    /// The write path resolved a [`crate::commands::Cmd::Write`]
    WriteCompleted {
        write: PendingWrite,
        result: Result<Row, WriteError>,
    },
    /// External editability override for one column
    SetEditable { field: FieldPath, editable: bool },
    /// The host replaced the row collection (refetch, pagination)
    ReplaceRows(Vec<Row>),
}

// Convenience constructors for common messages
impl GridMsg {
    pub fn activate(row: &str, field: &str) -> Self {
        GridMsg::Activate(CellKey::new(row, field))
    }

    pub fn input(text: impl Into<String>) -> Self {
        GridMsg::Input(text.into())
    }

    pub fn set_editable(field: &str, editable: bool) -> Self {
        GridMsg::SetEditable {
            field: FieldPath::new(field),
            editable,
        }
    }
}
