//! Grid model - the complete state of the editing core
//!
//! This module contains all the state types following the Elm Architecture pattern.
//! Nothing here performs I/O; [`crate::update`] mutates the model and returns
//! commands for the runtime to execute.

pub mod cell;
pub mod column;
pub mod row;
pub mod session;
pub mod value;

pub use cell::{CellKey, FieldPath, RowId};
pub use column::ColumnDef;
pub use row::{Row, RowSet};
pub use session::{EditSession, SaveProgress};
pub use value::{FieldType, FieldValue, Money, Quantity};

use std::collections::{BTreeSet, HashMap};

use crate::atom::{select_mode, AtomRegistry, CellState, CellView, FieldAtom, FieldMode};
use crate::config::GridConfig;
use crate::draft::DraftStore;

/// The complete grid state
#[derive(Debug)]
pub struct GridModel {
    pub config: GridConfig,
    pub columns: Vec<ColumnDef>,
    /// Authoritative rows as last seen from the data source
    pub rows: RowSet,
    pub drafts: DraftStore,
    /// At most one active edit session across the whole grid
    pub session: Option<EditSession>,
    /// Cells whose last commit or blur failed, with the messages to show
    pub failures: HashMap<CellKey, Vec<String>>,
    pub atoms: AtomRegistry,
    /// Bulk save in progress
    pub save: Option<SaveProgress>,
}

impl GridModel {
    pub fn new(columns: Vec<ColumnDef>, rows: Vec<Row>) -> Self {
        Self::with_config(GridConfig::default(), columns, rows)
    }

    pub fn with_config(config: GridConfig, columns: Vec<ColumnDef>, rows: Vec<Row>) -> Self {
        let atoms = AtomRegistry::with_defaults(&config.default_currency);
        Self {
            config,
            columns,
            rows: RowSet::new(rows),
            drafts: DraftStore::new(),
            session: None,
            failures: HashMap::new(),
            atoms,
            save: None,
        }
    }

    pub fn column(&self, path: &FieldPath) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| &c.path == path)
    }

    pub fn column_mut(&mut self, path: &FieldPath) -> Option<&mut ColumnDef> {
        self.columns.iter_mut().find(|c| &c.path == path)
    }

    /// Unknown columns are never editable
    pub fn is_editable(&self, path: &FieldPath) -> bool {
        self.column(path).is_some_and(|c| c.editable)
    }

    /// Atom for a column, falling back to text for unknown columns
    pub fn atom(&self, path: &FieldPath) -> &dyn FieldAtom {
        let field_type = self
            .column(path)
            .map(|c| c.field_type)
            .unwrap_or(FieldType::Text);
        self.atoms.get(field_type)
    }

    /// Committed value of a cell; missing values read as null
    pub fn authoritative(&self, key: &CellKey) -> FieldValue {
        self.rows
            .value(&key.row, &key.field)
            .cloned()
            .unwrap_or_default()
    }

    /// Draft value if one exists, otherwise the committed value
    pub fn effective_value(&self, key: &CellKey) -> FieldValue {
        match self.drafts.value(key) {
            Some(value) => value.clone(),
            None => self.authoritative(key),
        }
    }

    pub fn session_for(&self, key: &CellKey) -> Option<&EditSession> {
        self.session.as_ref().filter(|s| &s.key == key)
    }

    pub fn is_cell_dirty(&self, key: &CellKey) -> bool {
        self.drafts.get(key).is_some_and(|e| e.is_dirty())
    }

    pub fn cell_mode(&self, key: &CellKey) -> FieldMode {
        select_mode(
            self.is_editable(&key.field),
            self.session_for(key).map(|s| s.mode),
            self.failures.contains_key(key),
        )
    }

    /// Render one cell. `None` when the row or column is unknown.
    pub fn cell_view(&self, key: &CellKey) -> Option<CellView> {
        let column = self.column(&key.field)?;
        if !self.rows.contains(&key.row) {
            return None;
        }

        let mode = self.cell_mode(key);
        let session = self.session_for(key).filter(|_| column.editable);
        let value = match session {
            Some(session) => session.editor.current().clone(),
            None => self.effective_value(key),
        };
        let messages: &[String] = match (session, self.failures.get(key)) {
            (Some(session), _) => &session.messages,
            (None, Some(messages)) => messages,
            (None, None) => &[],
        };
        let state = CellState {
            value: &value,
            input: session.map(|s| s.editor.input()),
            messages,
            dirty: self.is_cell_dirty(key),
        };
        Some(self.atoms.get(column.field_type).render(mode, state))
    }

    // === Dirty flags ===

    pub fn has_unsaved_changes(&self) -> bool {
        self.drafts.has_unsaved_changes()
    }

    pub fn is_row_dirty(&self, row: &RowId) -> bool {
        self.drafts.is_row_dirty(row)
    }

    pub fn dirty_rows(&self) -> BTreeSet<RowId> {
        self.drafts.dirty_rows()
    }

    pub fn draft_count(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_saving(&self) -> bool {
        self.save.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> GridModel {
        GridModel::new(
            vec![
                ColumnDef::new("name", FieldType::Text),
                ColumnDef::new("qty", FieldType::Number).read_only(),
            ],
            vec![Row::new("r1").with("name", "Acme").with("qty", 5.0)],
        )
    }

    #[test]
    fn test_effective_value_prefers_draft() {
        let mut model = model();
        let key = CellKey::new("r1", "name");
        assert_eq!(model.effective_value(&key), FieldValue::text("Acme"));

        model.drafts.begin_edit(key.clone(), FieldValue::text("Acme"));
        model.drafts.update(&key, FieldValue::text("Acme Corp")).unwrap();
        assert_eq!(model.effective_value(&key), FieldValue::text("Acme Corp"));
        assert_eq!(model.authoritative(&key), FieldValue::text("Acme"));
    }

    #[test]
    fn test_cell_view_unknown_row_or_column() {
        let model = model();
        assert!(model.cell_view(&CellKey::new("r9", "name")).is_none());
        assert!(model.cell_view(&CellKey::new("r1", "nope")).is_none());
    }

    #[test]
    fn test_read_only_cell_ignores_failure_mark() {
        let mut model = model();
        let key = CellKey::new("r1", "qty");
        model.failures.insert(key.clone(), vec!["boom".into()]);
        assert_eq!(model.cell_mode(&key), FieldMode::Display);
        assert_eq!(model.cell_view(&key).unwrap().text(), "5");
    }

    #[test]
    fn test_failure_mark_renders_error() {
        let mut model = model();
        let key = CellKey::new("r1", "name");
        model.failures.insert(key.clone(), vec!["boom".into()]);
        let view = model.cell_view(&key).unwrap();
        assert_eq!(view.mode(), FieldMode::Error);
        assert_eq!(view.messages(), &["boom".to_string()]);
        assert_eq!(view.text(), "Acme");
    }
}
