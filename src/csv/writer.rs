//! Writing rows back out as delimited text

use super::delimiter::Delimiter;
use crate::atom::AtomRegistry;
use crate::model::{ColumnDef, FieldPath, Row};

/// Serialize rows under `headers`.
///
/// Known columns are written in their atom's edit format so the output
/// parses back to the same values; other fields are written as plain text.
pub fn write_rows<'a>(
    headers: &[String],
    id_column: &str,
    rows: impl IntoIterator<Item = &'a Row>,
    delimiter: Delimiter,
    columns: &[ColumnDef],
    atoms: &AtomRegistry,
) -> Result<String, csv::Error> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter.byte())
        .from_writer(Vec::new());
    writer.write_record(headers)?;

    let paths: Vec<FieldPath> = headers.iter().map(|h| FieldPath::new(h)).collect();
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .zip(&paths)
            .map(|(header, path)| {
                if header == id_column {
                    return row.id.to_string();
                }
                let Some(value) = row.get(path) else {
                    return String::new();
                };
                match columns.iter().find(|c| &c.path == path) {
                    Some(column) => atoms.get(column.field_type).edit_text(value),
                    None => atoms.fallback().format(value),
                }
            })
            .collect();
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
