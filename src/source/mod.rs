//! Data sources: the write path drafts are committed through
//!
//! The draft store never mutates rows itself. A commit hands the candidate
//! value to a [`DataSource`], which returns the updated record on success.

mod memory;

pub use memory::MemorySource;

use crate::draft::WriteError;
use crate::model::{FieldPath, FieldValue, Row, RowId};

/// The only write primitive the core needs from its host.
///
/// Must be safe to call once per committed cell.
pub trait DataSource {
    fn write(&mut self, row: &RowId, field: &FieldPath, value: &FieldValue)
        -> Result<Row, WriteError>;
}

impl<T: DataSource + ?Sized> DataSource for &mut T {
    fn write(
        &mut self,
        row: &RowId,
        field: &FieldPath,
        value: &FieldValue,
    ) -> Result<Row, WriteError> {
        (**self).write(row, field, value)
    }
}

impl<T: DataSource + ?Sized> DataSource for Box<T> {
    fn write(
        &mut self,
        row: &RowId,
        field: &FieldPath,
        value: &FieldValue,
    ) -> Result<Row, WriteError> {
        (**self).write(row, field, value)
    }
}
