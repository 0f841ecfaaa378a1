//! Tracing setup and draft-state diagnostics
//!
//! Provides structured logging with scoped filtering for debugging
//! draft lifecycles, edit sessions and save batches.
//!
//! # Usage
//!
//! Configure via RUST_LOG environment variable:
//! - `RUST_LOG=debug` - all debug logs
//! - `RUST_LOG=drafts=trace,session=debug` - scoped filtering
//! - `RUST_LOG=stockgrid::update=debug` - module-level filtering
//!
//! # Log Files
//!
//! Logs are written to `~/.config/stockgrid/logs/stockgrid.log` with daily rotation.
//! File logging uses debug level by default for more verbose troubleshooting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use crate::model::{CellKey, GridModel};

/// Initialize tracing subscriber with console and file logging
///
/// Console output respects RUST_LOG and defaults to `warn`.
/// File logging writes to the logs directory with daily rotation.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    // Console layer - respects RUST_LOG
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    // File layer - always debug level for troubleshooting
    let file_layer = match crate::config_paths::ensure_logs_dir() {
        Ok(logs_dir) => {
            let file_appender = tracing_appender::rolling::daily(logs_dir, "stockgrid.log");
            Some(
                fmt::layer()
                    .with_writer(file_appender)
                    .with_ansi(false)
                    .with_target(true)
                    .with_line_number(true)
                    .with_filter(EnvFilter::new("debug")),
            )
        }
        Err(e) => {
            eprintln!("Warning: Could not initialize file logging: {:#}", e);
            None
        }
    };

    tracing_subscriber::registry()
        .with(console_layer)
        .with(file_layer)
        .init();
}

/// Lightweight snapshot of draft/session state for diffing
#[derive(Debug, Clone, PartialEq)]
pub struct DraftSnapshot {
    pub draft_count: usize,
    pub dirty_count: usize,
    pub session: Option<(CellKey, String)>,
    pub failures: usize,
    pub saving: bool,
}

impl DraftSnapshot {
    pub fn from_model(model: &GridModel) -> Self {
        Self {
            draft_count: model.drafts.len(),
            dirty_count: model.drafts.dirty_count(),
            session: model
                .session
                .as_ref()
                .map(|s| (s.key.clone(), format!("{:?}", s.mode))),
            failures: model.failures.len(),
            saving: model.is_saving(),
        }
    }

    /// Generate a diff description between two snapshots
    pub fn diff(&self, other: &DraftSnapshot) -> Option<String> {
        let mut changes = Vec::new();
        if self.draft_count != other.draft_count {
            changes.push(format!(
                "drafts: {} → {}",
                self.draft_count, other.draft_count
            ));
        }
        if self.dirty_count != other.dirty_count {
            changes.push(format!(
                "dirty: {} → {}",
                self.dirty_count, other.dirty_count
            ));
        }
        if self.session != other.session {
            let describe = |s: &Option<(CellKey, String)>| match s {
                Some((key, mode)) => format!("{} ({})", key, mode),
                None => "none".to_string(),
            };
            changes.push(format!(
                "session: {} → {}",
                describe(&self.session),
                describe(&other.session)
            ));
        }
        if self.failures != other.failures {
            changes.push(format!("failures: {} → {}", self.failures, other.failures));
        }
        if self.saving != other.saving {
            let status = if other.saving { "started" } else { "finished" };
            changes.push(format!("save {}", status));
        }

        if changes.is_empty() {
            None
        } else {
            Some(changes.join("; "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_diff() {
        let before = DraftSnapshot {
            draft_count: 0,
            dirty_count: 0,
            session: None,
            failures: 0,
            saving: false,
        };
        assert_eq!(before.diff(&before.clone()), None);

        let after = DraftSnapshot {
            draft_count: 1,
            session: Some((CellKey::new("r1", "name"), "Edit".into())),
            ..before.clone()
        };
        assert_eq!(
            before.diff(&after).as_deref(),
            Some("drafts: 0 → 1; session: none → r1:name (Edit)")
        );
    }
}
