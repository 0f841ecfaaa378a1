//! Column definitions

use super::cell::FieldPath;
use super::value::FieldType;
use crate::validate::Rule;

/// One editable column of the grid
#[derive(Debug, Clone)]
pub struct ColumnDef {
    pub path: FieldPath,
    pub label: String,
    pub field_type: FieldType,
    /// External editability override. When false the column always renders
    /// in display mode, regardless of any session or draft state.
    pub editable: bool,
    pub rules: Vec<Rule>,
}

impl ColumnDef {
    pub fn new(path: impl Into<FieldPath>, field_type: FieldType) -> Self {
        let path = path.into();
        Self {
            label: path.to_string(),
            path,
            field_type,
            editable: true,
            rules: Vec::new(),
        }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn read_only(mut self) -> Self {
        self.editable = false;
        self
    }

    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }
}
