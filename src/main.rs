//! stockgrid - apply buffered cell edits to a delimited file
//!
//! Each `--set` goes through the same activate/type/complete gestures a grid
//! surface would send, so validation, drafts and error mode behave exactly as
//! they would interactively. The drafts are then saved (or discarded) in one
//! bulk operation.

use std::cell::Cell;
use std::path::Path;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use stockgrid::atom::FieldMode;
use stockgrid::cli::{CliArgs, RunConfig};
use stockgrid::commands::GridEvent;
use stockgrid::config::GridConfig;
use stockgrid::csv::{detect_delimiter, parse_rows, read_headers, write_rows, Delimiter};
use stockgrid::model::{ColumnDef, FieldType, FieldValue, GridModel};
use stockgrid::source::MemorySource;
use stockgrid::GridController;

#[derive(Debug, Serialize)]
struct DraftLine {
    cell: String,
    original: FieldValue,
    current: FieldValue,
}

#[derive(Debug, Serialize)]
struct FailureLine {
    cell: String,
    messages: Vec<String>,
}

#[derive(Debug, Default, Serialize)]
struct Report {
    drafts: Vec<DraftLine>,
    dirty_rows: Vec<String>,
    rejected_edits: Vec<FailureLine>,
    discarded: bool,
    saved: usize,
    rows_updated: usize,
    failures: Vec<FailureLine>,
}

fn main() -> Result<()> {
    stockgrid::tracing::init();

    let config = CliArgs::parse()
        .into_config()
        .map_err(anyhow::Error::msg)?;
    let report = run(&config)?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.failures.is_empty() {
        bail!("{} cell(s) failed to save", report.failures.len());
    }
    Ok(())
}

fn delimiter_for(path: &Path, content: &str) -> Delimiter {
    path.extension()
        .and_then(|ext| ext.to_str())
        .and_then(Delimiter::from_extension)
        .unwrap_or_else(|| detect_delimiter(content))
}

fn build_columns(headers: &[String], config: &RunConfig) -> Vec<ColumnDef> {
    for (field, _) in &config.types {
        if !headers.iter().any(|h| h == field.as_str()) {
            tracing::warn!(%field, "--type names a column that is not in the file");
        }
    }

    headers
        .iter()
        .filter(|h| **h != config.id_column)
        .map(|header| {
            let field_type = config
                .types
                .iter()
                .find(|(field, _)| field.as_str() == header)
                .map(|(_, ty)| *ty)
                .unwrap_or(FieldType::Text);
            let column = ColumnDef::new(header.as_str(), field_type);
            if config.read_only.iter().any(|f| f.as_str() == header) {
                column.read_only()
            } else {
                column
            }
        })
        .collect()
}

fn run(config: &RunConfig) -> Result<Report> {
    let grid_config = GridConfig::load();
    let content = std::fs::read_to_string(&config.file)
        .with_context(|| format!("Failed to read {}", config.file.display()))?;
    let delimiter = delimiter_for(&config.file, &content);

    let headers = read_headers(&content, delimiter)
        .with_context(|| format!("Failed to read header of {}", config.file.display()))?;
    let columns = build_columns(&headers, config);

    let model = GridModel::with_config(grid_config, columns.clone(), Vec::new());
    let table = parse_rows(&content, delimiter, &config.id_column, &columns, &model.atoms)
        .with_context(|| format!("Failed to parse {}", config.file.display()))?;
    tracing::info!(rows = table.rows.len(), columns = columns.len(), "loaded");

    let source = MemorySource::new(table.rows.clone());
    let mut controller = GridController::new(model, source);
    controller.replace_rows(table.rows.clone());

    let rows_updated = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&rows_updated);
    controller.subscribe(move |event| {
        if let GridEvent::RowUpdated(_) = event {
            counter.set(counter.get() + 1);
        }
    });

    let mut report = Report::default();
    for edit in &config.edits {
        match controller.edit_cell(edit.key.clone(), &edit.input) {
            Some(view) if view.mode() == FieldMode::Error => {
                report.rejected_edits.push(FailureLine {
                    cell: edit.key.to_string(),
                    messages: view.messages().to_vec(),
                });
            }
            Some(_) => {}
            None => tracing::warn!(key = %edit.key, "no such cell, edit skipped"),
        }
    }

    report.drafts = controller
        .model()
        .drafts
        .iter()
        .filter(|entry| entry.is_dirty())
        .map(|entry| DraftLine {
            cell: entry.key().to_string(),
            original: entry.original().clone(),
            current: entry.current().clone(),
        })
        .collect();
    report.dirty_rows = controller
        .dirty_rows()
        .iter()
        .map(|row| row.to_string())
        .collect();

    if config.discard {
        controller.discard_all_drafts();
        report.discarded = true;
        return Ok(report);
    }

    let saved = controller.save_all_drafts();
    report.saved = saved.saved_count();
    report.rows_updated = rows_updated.get();
    report.failures = saved
        .failures
        .iter()
        .map(|failure| FailureLine {
            cell: failure.key.to_string(),
            messages: failure.error.messages(),
        })
        .collect();

    if report.saved > 0 {
        let output = write_rows(
            &table.headers,
            &table.id_column,
            controller.source().rows().iter(),
            delimiter,
            &columns,
            &controller.model().atoms,
        )?;
        std::fs::write(&config.output, output)
            .with_context(|| format!("Failed to write {}", config.output.display()))?;
        tracing::info!(path = %config.output.display(), "rows written");
    }

    Ok(report)
}

fn print_report(report: &Report) {
    for line in &report.rejected_edits {
        println!("rejected {}: {}", line.cell, line.messages.join("; "));
    }
    for line in &report.drafts {
        println!(
            "draft    {}: {:?} -> {:?}",
            line.cell, line.original, line.current
        );
    }
    if !report.dirty_rows.is_empty() {
        println!("dirty rows: {}", report.dirty_rows.join(", "));
    }

    if report.discarded {
        println!("discarded {} draft(s)", report.drafts.len());
        return;
    }
    println!(
        "saved {} cell(s), {} row update(s)",
        report.saved, report.rows_updated
    );
    for line in &report.failures {
        println!("failed   {}: {}", line.cell, line.messages.join("; "));
    }
}
