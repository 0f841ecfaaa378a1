//! CSV parsing using the csv crate
//!
//! RFC 4180 compliant parsing with support for quoted fields,
//! escaped quotes, and custom delimiters. The first record is the header;
//! one header names the row identity column.

use std::collections::HashSet;
use std::io::Cursor;

use thiserror::Error;

use super::delimiter::Delimiter;
use crate::atom::AtomRegistry;
use crate::model::{ColumnDef, FieldPath, FieldValue, Row, RowId};

/// Error type for CSV parsing
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("CSV parse error at line {line}: {message}")]
    Malformed { line: u64, message: String },
    #[error("identity column `{0}` not found in header")]
    MissingIdColumn(String),
    #[error("line {line}: empty row identity")]
    EmptyId { line: u64 },
    #[error("line {line}: duplicate row identity `{id}`")]
    DuplicateId { line: u64, id: RowId },
    #[error("line {line}, field {field}: {message}")]
    InvalidValue {
        line: u64,
        field: FieldPath,
        message: String,
    },
}

/// Parsed rows plus the header order, for writing back out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub id_column: String,
    pub rows: Vec<Row>,
}

fn reader(content: &str, delimiter: Delimiter) -> csv::Reader<Cursor<&[u8]>> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .has_headers(true)
        .flexible(true)
        .from_reader(Cursor::new(content.as_bytes()))
}

fn malformed(e: csv::Error) -> ParseError {
    let line = e.position().map(|p| p.line()).unwrap_or(0);
    ParseError::Malformed {
        line,
        message: e.to_string(),
    }
}

/// Header names, trimmed
pub fn read_headers(content: &str, delimiter: Delimiter) -> Result<Vec<String>, ParseError> {
    let mut reader = reader(content, delimiter);
    let headers = reader.headers().map_err(malformed)?;
    Ok(headers.iter().map(|h| h.trim().to_string()).collect())
}

/// Parse CSV content into rows.
///
/// Values of known columns are parsed by the column's atom; other headers
/// become text. Dotted headers build nested records. Missing trailing fields
/// read as null.
pub fn parse_rows(
    content: &str,
    delimiter: Delimiter,
    id_column: &str,
    columns: &[ColumnDef],
    atoms: &AtomRegistry,
) -> Result<CsvTable, ParseError> {
    if content.trim().is_empty() {
        return Ok(CsvTable {
            id_column: id_column.to_string(),
            ..Default::default()
        });
    }

    let headers = read_headers(content, delimiter)?;
    let id_index = headers
        .iter()
        .position(|h| h == id_column)
        .ok_or_else(|| ParseError::MissingIdColumn(id_column.to_string()))?;

    let fields: Vec<(FieldPath, Option<&ColumnDef>)> = headers
        .iter()
        .map(|h| {
            let path = FieldPath::new(h);
            let column = columns.iter().find(|c| c.path == path);
            (path, column)
        })
        .collect();

    let mut reader = reader(content, delimiter);
    let mut seen = HashSet::new();
    let mut rows = Vec::new();

    for result in reader.records() {
        let record = result.map_err(malformed)?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);

        let id = record.get(id_index).unwrap_or("").trim();
        if id.is_empty() {
            return Err(ParseError::EmptyId { line });
        }
        let id = RowId::from(id);
        if !seen.insert(id.clone()) {
            return Err(ParseError::DuplicateId { line, id });
        }

        let mut row = Row::new(id);
        for (index, (path, column)) in fields.iter().enumerate() {
            if index == id_index || path.is_empty() {
                continue;
            }
            let raw = record.get(index).unwrap_or("");
            let value = match column {
                Some(column) => atoms.get(column.field_type).parse(raw).map_err(|message| {
                    ParseError::InvalidValue {
                        line,
                        field: path.clone(),
                        message,
                    }
                })?,
                None if raw.is_empty() => FieldValue::Null,
                None => FieldValue::text(raw),
            };
            if !row.set(path, value) {
                tracing::warn!(%path, line, "field conflicts with a scalar parent, skipped");
            }
        }
        rows.push(row);
    }

    tracing::debug!(rows = rows.len(), columns = headers.len(), "parsed CSV");
    Ok(CsvTable {
        headers,
        id_column: id_column.to_string(),
        rows,
    })
}

/// Detect delimiter by analyzing first few lines
pub fn detect_delimiter(content: &str) -> Delimiter {
    let first_lines: String = content.lines().take(5).collect::<Vec<_>>().join("\n");

    let comma_count = first_lines.matches(',').count();
    let tab_count = first_lines.matches('\t').count();
    let pipe_count = first_lines.matches('|').count();
    let semi_count = first_lines.matches(';').count();

    let max = comma_count.max(tab_count).max(pipe_count).max(semi_count);

    if max == 0 {
        return Delimiter::Comma;
    }

    if tab_count == max {
        Delimiter::Tab
    } else if pipe_count == max {
        Delimiter::Pipe
    } else if semi_count == max {
        Delimiter::Semicolon
    } else {
        Delimiter::Comma
    }
}
