//! In-memory row collection with synchronous writes

use std::collections::{HashMap, HashSet};

use super::DataSource;
use crate::draft::WriteError;
use crate::model::{CellKey, FieldPath, FieldValue, Row, RowId, RowSet};

/// Row collection that commits straight into memory.
///
/// Failures can be injected per field or per cell, which the demo binary and
/// the tests use to exercise partial saves.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: RowSet,
    read_only: HashSet<FieldPath>,
    failing_fields: HashMap<FieldPath, String>,
    failing_cells: HashMap<CellKey, String>,
    write_log: Vec<CellKey>,
}

impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Self {
        Self {
            rows: RowSet::new(rows),
            ..Default::default()
        }
    }

    pub fn rows(&self) -> &RowSet {
        &self.rows
    }

    pub fn row(&self, id: &RowId) -> Option<&Row> {
        self.rows.get(id)
    }

    /// Reject every write to `field`
    pub fn set_read_only(&mut self, field: impl Into<FieldPath>) {
        self.read_only.insert(field.into());
    }

    /// Make every write to `field` fail with `reason`
    pub fn fail_field(&mut self, field: impl Into<FieldPath>, reason: impl Into<String>) {
        self.failing_fields.insert(field.into(), reason.into());
    }

    /// Make writes to one cell fail with `reason`
    pub fn fail_cell(&mut self, key: CellKey, reason: impl Into<String>) {
        self.failing_cells.insert(key, reason.into());
    }

    pub fn clear_failures(&mut self) {
        self.failing_fields.clear();
        self.failing_cells.clear();
    }

    /// Cells written so far (successful or not), in call order
    pub fn write_log(&self) -> &[CellKey] {
        &self.write_log
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows.iter().cloned().collect()
    }
}

impl DataSource for MemorySource {
    fn write(
        &mut self,
        row: &RowId,
        field: &FieldPath,
        value: &FieldValue,
    ) -> Result<Row, WriteError> {
        let key = CellKey::new(row.clone(), field.clone());
        self.write_log.push(key.clone());

        if let Some(reason) = self
            .failing_cells
            .get(&key)
            .or_else(|| self.failing_fields.get(field))
        {
            return Err(WriteError::Failed(reason.clone()));
        }
        if self.read_only.contains(field) {
            return Err(WriteError::Rejected {
                field: field.clone(),
                reason: "field is read-only".to_string(),
            });
        }

        let mut updated = self
            .rows
            .get(row)
            .cloned()
            .ok_or_else(|| WriteError::RowNotFound(row.clone()))?;
        if !updated.set(field, value.clone()) {
            return Err(WriteError::InvalidPath(field.clone()));
        }

        tracing::debug!(%key, "row written");
        self.rows.upsert(updated.clone());
        Ok(updated)
    }
}
