//! Field atoms: the tri-mode contract every typed cell obeys
//!
//! A cell is rendered in one of three modes:
//!
//! - **display**: read-only text for the committed-or-drafted value
//! - **edit**: an editable control seeded with the current value
//! - **error**: the edit control plus a fixed-order list of messages
//!
//! ```text
//! display ──activate──► edit ──complete (valid)──► display
//!                        │  ▲
//!          complete      │  │ complete (valid) / cancel ──► display
//!          (invalid)     ▼  │
//!                        error
//! ```
//!
//! Atoms only format, parse and render. They never touch the draft store;
//! the controller routes their [`AtomEvent`]s.

mod editor;
mod kinds;
mod registry;

pub use editor::FieldEditor;
pub use kinds::{
    BoolAtom, DateAtom, DateTimeAtom, DurationAtom, MoneyAtom, NumberAtom, QuantityAtom,
    TextAtom, TimeAtom, UrlAtom,
};
pub use registry::AtomRegistry;

use std::fmt;

use serde::Serialize;

use crate::model::{FieldType, FieldValue};

/// Rendering mode of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldMode {
    Display,
    Edit,
    Error,
}

/// Pick the mode for a cell.
///
/// `editable == false` forces display mode and is checked before anything
/// else. Otherwise an active session decides, then a recorded failure.
pub fn select_mode(editable: bool, session: Option<FieldMode>, failed: bool) -> FieldMode {
    if !editable {
        return FieldMode::Display;
    }
    match session {
        Some(mode) => mode,
        None if failed => FieldMode::Error,
        None => FieldMode::Display,
    }
}

/// Events an atom emits while a cell is being edited
#[derive(Debug, Clone, PartialEq)]
pub enum AtomEvent {
    /// Interactive change; always carries the session original
    Change {
        original: FieldValue,
        current: FieldValue,
    },
    /// Commit gesture: the session is finished, please persist
    Complete(FieldValue),
    /// Abort gesture: revert to the pre-session value
    Cancel,
}

/// Everything an atom needs to render one cell
#[derive(Debug, Clone, Copy)]
pub struct CellState<'a> {
    pub value: &'a FieldValue,
    /// Raw editor input, when a session is active
    pub input: Option<&'a str>,
    pub messages: &'a [String],
    pub dirty: bool,
}

/// Rendered cell, one variant per mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CellView {
    Display {
        text: String,
        dirty: bool,
    },
    Edit {
        input: String,
        dirty: bool,
    },
    Error {
        input: String,
        messages: Vec<String>,
        dirty: bool,
    },
}

impl CellView {
    pub fn mode(&self) -> FieldMode {
        match self {
            CellView::Display { .. } => FieldMode::Display,
            CellView::Edit { .. } => FieldMode::Edit,
            CellView::Error { .. } => FieldMode::Error,
        }
    }

    pub fn is_dirty(&self) -> bool {
        match self {
            CellView::Display { dirty, .. }
            | CellView::Edit { dirty, .. }
            | CellView::Error { dirty, .. } => *dirty,
        }
    }

    /// Displayed text or editor input
    pub fn text(&self) -> &str {
        match self {
            CellView::Display { text, .. } => text,
            CellView::Edit { input, .. } | CellView::Error { input, .. } => input,
        }
    }

    pub fn messages(&self) -> &[String] {
        match self {
            CellView::Error { messages, .. } => messages,
            _ => &[],
        }
    }
}

/// Formatting, parsing and rendering for one field type
pub trait FieldAtom: fmt::Debug + Send + Sync {
    fn field_type(&self) -> FieldType;

    /// Read-only text for display mode. Null renders as empty text.
    fn format(&self, value: &FieldValue) -> String;

    /// Initial editor text for a value
    fn edit_text(&self, value: &FieldValue) -> String {
        self.format(value)
    }

    /// Turn editor input into a typed value. Blank input clears the cell.
    fn parse(&self, input: &str) -> Result<FieldValue, String>;

    fn render(&self, mode: FieldMode, state: CellState<'_>) -> CellView {
        let input = || {
            state
                .input
                .map(str::to_string)
                .unwrap_or_else(|| self.edit_text(state.value))
        };
        match mode {
            FieldMode::Display => CellView::Display {
                text: self.format(state.value),
                dirty: state.dirty,
            },
            FieldMode::Edit => CellView::Edit {
                input: input(),
                dirty: state.dirty,
            },
            FieldMode::Error => CellView::Error {
                input: input(),
                messages: state.messages.to_vec(),
                dirty: state.dirty,
            },
        }
    }
}
