//! Delimited text import and export
//!
//! Loads CSV/TSV/PSV files into [`Row`](crate::model::Row)s for the grid and
//! writes committed rows back out.
//!
//! ```text
//! file ──read_headers──► headers ──► columns (types from the caller)
//!      ──parse_rows────► CsvTable { headers, id_column, rows }
//! rows ──write_rows────► file
//! ```

mod delimiter;
mod parser;
mod writer;

pub use delimiter::Delimiter;
pub use parser::{detect_delimiter, parse_rows, read_headers, CsvTable, ParseError};
pub use writer::write_rows;
