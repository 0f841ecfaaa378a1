//! Per-cell edit state driven by an atom

use super::{AtomEvent, FieldAtom};
use crate::model::FieldValue;

fn is_blank(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => true,
        FieldValue::Text(s) => s.is_empty(),
        _ => false,
    }
}

/// State for editing a single cell
#[derive(Debug, Clone)]
pub struct FieldEditor {
    /// Session original: the draft baseline, not the pre-session value
    original: FieldValue,
    /// Latest successfully parsed candidate
    current: FieldValue,
    /// Raw editor text
    input: String,
    /// Set while `input` does not parse
    parse_error: Option<String>,
}

impl FieldEditor {
    /// Create an editor seeded with `seed` (the draft value if present, else
    /// the original)
    pub fn new(atom: &dyn FieldAtom, original: FieldValue, seed: FieldValue) -> Self {
        Self {
            input: atom.edit_text(&seed),
            current: seed,
            original,
            parse_error: None,
        }
    }

    /// Move the session baseline after the cell's committed value changed
    pub fn rebase(&mut self, original: FieldValue) {
        self.original = original;
    }

    pub fn original(&self) -> &FieldValue {
        &self.original
    }

    pub fn current(&self) -> &FieldValue {
        &self.current
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn parse_error(&self) -> Option<&str> {
        self.parse_error.as_deref()
    }

    /// Check if the candidate differs from the session original
    pub fn is_modified(&self) -> bool {
        !self.current.same_as(&self.original)
    }

    /// Typed control change (checkbox, picker, ...)
    pub fn set_value(&mut self, atom: &dyn FieldAtom, value: FieldValue) -> AtomEvent {
        self.input = atom.edit_text(&value);
        self.parse_error = None;
        self.current = value;
        self.change_event()
    }

    /// Text input change. Emits a change only when the input parses; otherwise
    /// the parse error is kept until the next change.
    pub fn set_input(&mut self, atom: &dyn FieldAtom, input: &str) -> Option<AtomEvent> {
        self.input = input.to_string();
        match atom.parse(input) {
            Ok(value) => {
                self.parse_error = None;
                // Clearing a cell that was already empty is not a change
                self.current = if is_blank(&value) && is_blank(&self.original) {
                    self.original.clone()
                } else {
                    value
                };
                Some(self.change_event())
            }
            Err(message) => {
                self.parse_error = Some(message);
                None
            }
        }
    }

    pub fn complete(&self) -> AtomEvent {
        AtomEvent::Complete(self.current.clone())
    }

    pub fn cancel(&self) -> AtomEvent {
        AtomEvent::Cancel
    }

    fn change_event(&self) -> AtomEvent {
        AtomEvent::Change {
            original: self.original.clone(),
            current: self.current.clone(),
        }
    }
}
