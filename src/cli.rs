//! Command-line argument parsing for the stockgrid demo
//!
//! Supports:
//! - Loading a CSV/TSV/PSV file with a chosen identity column
//! - Typing columns and marking them read-only
//! - Applying cell edits as activate/type/complete gestures
//! - Saving or discarding the resulting drafts

use clap::Parser;
use std::path::PathBuf;

use crate::model::{CellKey, FieldPath, FieldType};

/// Edit a delimited inventory file through the draft/commit grid
#[derive(Parser, Debug)]
#[command(name = "stockgrid", version, about = "Buffered cell editing for tabular data")]
pub struct CliArgs {
    /// CSV, TSV or PSV file to load
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Header naming the row identity column
    #[arg(long, value_name = "COLUMN", default_value = "id")]
    pub id_column: String,

    /// Column type, e.g. `qty=number` (repeatable)
    #[arg(long = "type", value_name = "FIELD=TYPE")]
    pub types: Vec<String>,

    /// Column that may not be edited (repeatable)
    #[arg(long, value_name = "FIELD")]
    pub read_only: Vec<String>,

    /// Cell edit, e.g. `sku-1:qty=12` (repeatable, applied in order)
    #[arg(long = "set", value_name = "ROW:FIELD=VALUE")]
    pub sets: Vec<String>,

    /// Discard the drafts instead of saving them
    #[arg(long)]
    pub discard: bool,

    /// Write the resulting rows here instead of over FILE
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Report as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// One `--set` argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellEdit {
    pub key: CellKey,
    pub input: String,
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub file: PathBuf,
    pub id_column: String,
    pub types: Vec<(FieldPath, FieldType)>,
    pub read_only: Vec<FieldPath>,
    pub edits: Vec<CellEdit>,
    pub discard: bool,
    pub output: PathBuf,
    pub json: bool,
}

impl CliArgs {
    /// Convert parsed CLI args into a run configuration
    pub fn into_config(self) -> Result<RunConfig, String> {
        let types = self
            .types
            .iter()
            .map(|spec| parse_type(spec))
            .collect::<Result<Vec<_>, _>>()?;
        let edits = self
            .sets
            .iter()
            .map(|spec| parse_edit(spec))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RunConfig {
            output: self.output.unwrap_or_else(|| self.file.clone()),
            file: self.file,
            id_column: self.id_column,
            types,
            read_only: self.read_only.iter().map(|f| FieldPath::new(f)).collect(),
            edits,
            discard: self.discard,
            json: self.json,
        })
    }
}

fn parse_type(spec: &str) -> Result<(FieldPath, FieldType), String> {
    let (field, ty) = spec
        .split_once('=')
        .ok_or_else(|| format!("Expected FIELD=TYPE, got `{}`", spec))?;
    let field = FieldPath::new(field);
    if field.is_empty() {
        return Err(format!("Missing field name in `{}`", spec));
    }
    let ty = FieldType::from_name(ty.trim()).ok_or_else(|| format!("Unknown type `{}`", ty))?;
    Ok((field, ty))
}

/// `ROW:FIELD=VALUE`; the value may itself contain `=` or `:`
fn parse_edit(spec: &str) -> Result<CellEdit, String> {
    let (target, input) = spec
        .split_once('=')
        .ok_or_else(|| format!("Expected ROW:FIELD=VALUE, got `{}`", spec))?;
    let (row, field) = target
        .split_once(':')
        .ok_or_else(|| format!("Expected ROW:FIELD before `=`, got `{}`", target))?;
    let field = FieldPath::new(field);
    if row.trim().is_empty() || field.is_empty() {
        return Err(format!("Missing row or field in `{}`", spec));
    }
    Ok(CellEdit {
        key: CellKey::new(row.trim(), field),
        input: input.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(extra: &[&str]) -> CliArgs {
        let mut argv = vec!["stockgrid", "stock.csv"];
        argv.extend_from_slice(extra);
        CliArgs::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let config = args(&[]).into_config().unwrap();
        assert_eq!(config.id_column, "id");
        assert_eq!(config.output, PathBuf::from("stock.csv"));
        assert!(config.edits.is_empty());
        assert!(!config.discard);
    }

    #[test]
    fn test_type_and_set_parsing() {
        let config = args(&[
            "--type",
            "qty=number",
            "--set",
            "sku-1:qty=12",
            "--set",
            "sku-2:note=a=b",
        ])
        .into_config()
        .unwrap();

        assert_eq!(
            config.types,
            vec![(FieldPath::new("qty"), FieldType::Number)]
        );
        assert_eq!(
            config.edits,
            vec![
                CellEdit {
                    key: CellKey::new("sku-1", "qty"),
                    input: "12".into(),
                },
                CellEdit {
                    key: CellKey::new("sku-2", "note"),
                    input: "a=b".into(),
                },
            ]
        );
    }

    #[test]
    fn test_bad_specs_are_rejected() {
        assert!(args(&["--type", "qty"]).into_config().is_err());
        assert!(args(&["--type", "qty=widget"]).into_config().is_err());
        assert!(args(&["--set", "qty=1"]).into_config().is_err());
        assert!(args(&["--set", ":qty=1"]).into_config().is_err());
    }

    #[test]
    fn test_output_override() {
        let config = args(&["-o", "out.csv", "--discard"]).into_config().unwrap();
        assert_eq!(config.output, PathBuf::from("out.csv"));
        assert!(config.discard);
    }
}
