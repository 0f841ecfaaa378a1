//! Where stockgrid keeps its files
//!
//! One directory holds `config.yaml` (blur behaviour, auto-commit, conflict
//! policy, default currency; see [`GridConfig`](crate::config::GridConfig))
//! and `logs/`, the daily-rotated debug log written by
//! [`tracing::init`](crate::tracing::init):
//! - Unix/macOS: `$XDG_CONFIG_HOME/stockgrid/` or `~/.config/stockgrid/`
//! - Windows: `%APPDATA%\stockgrid\`

use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "stockgrid";
const CONFIG_FILE: &str = "config.yaml";
const LOGS_DIR: &str = "logs";

/// The stockgrid directory, or `None` when no home/app-data dir is known.
///
/// `XDG_CONFIG_HOME` wins on every Unix, including macOS, so the layout is
/// the same everywhere but Windows.
pub fn config_dir() -> Option<PathBuf> {
    let base = if cfg!(target_os = "windows") {
        dirs::config_dir()
    } else {
        std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .filter(|p| p.is_absolute())
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
    };
    base.map(|dir| dir.join(APP_DIR))
}

/// Grid settings read by [`GridConfig::load`](crate::config::GridConfig::load)
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(CONFIG_FILE))
}

pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|dir| dir.join(LOGS_DIR))
}

/// Create the logs directory if needed and return it
pub fn ensure_logs_dir() -> Result<PathBuf> {
    let logs = logs_dir().context("No config directory available")?;
    std::fs::create_dir_all(&logs)
        .with_context(|| format!("Failed to create log directory {}", logs.display()))?;
    Ok(logs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_files_share_the_app_dir() {
        let (Some(dir), Some(file), Some(logs)) = (config_dir(), config_file(), logs_dir()) else {
            return;
        };
        assert!(dir.ends_with(APP_DIR));
        assert_eq!(file.parent(), Some(dir.as_path()));
        assert_eq!(logs.parent(), Some(dir.as_path()));
    }
}
