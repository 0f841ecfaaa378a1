//! Grid configuration
//!
//! Stored in `~/.config/stockgrid/config.yaml`. Every field has a default, so
//! a partial (or missing) file is fine.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// What happens to an open edit session when another cell is activated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlurBehavior {
    /// Finalize the outgoing session as if the user pressed confirm
    #[default]
    Commit,
    /// Finalize the outgoing session as if the user pressed abort
    Cancel,
}

/// What happens to drafts whose row was refreshed with different data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    /// Keep the draft; saving it overwrites the refreshed value
    #[default]
    KeepDrafts,
    /// Drop the draft and show the refreshed value
    DropDrafts,
}

/// Grid behaviour settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    #[serde(default)]
    pub blur: BlurBehavior,

    /// Commit each cell through the write path as soon as its session completes
    #[serde(default)]
    pub auto_commit: bool,

    #[serde(default)]
    pub conflict_policy: ConflictPolicy,

    /// Currency for money input without an explicit code
    #[serde(default = "default_currency")]
    pub default_currency: String,
}

fn default_currency() -> String {
    "USD".to_string()
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            blur: BlurBehavior::default(),
            auto_commit: false,
            conflict_policy: ConflictPolicy::default(),
            default_currency: default_currency(),
        }
    }
}

impl GridConfig {
    /// Load config from disk, or return defaults if not found
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::config_file() else {
            tracing::debug!("No config directory available, using defaults");
            return Self::default();
        };

        if !path.exists() {
            tracing::debug!(
                "Config file not found at {}, using defaults",
                path.display()
            );
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                tracing::warn!("{:#}, using defaults", e);
                Self::default()
            }
        }
    }

    /// Load config from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config at {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to parse config at {}", path.display()))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(content)?)
    }

    /// Save config to `path`, creating the parent directory if needed
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let content = serde_yaml::to_string(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        tracing::info!("Saved config to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = GridConfig::from_yaml("auto_commit: true\n").unwrap();
        assert!(config.auto_commit);
        assert_eq!(config.blur, BlurBehavior::Commit);
        assert_eq!(config.conflict_policy, ConflictPolicy::KeepDrafts);
        assert_eq!(config.default_currency, "USD");
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(GridConfig::from_yaml("").unwrap(), GridConfig::default());
    }

    #[test]
    fn test_enum_names() {
        let config =
            GridConfig::from_yaml("blur: cancel\nconflict_policy: drop_drafts\n").unwrap();
        assert_eq!(config.blur, BlurBehavior::Cancel);
        assert_eq!(config.conflict_policy, ConflictPolicy::DropDrafts);
    }

    #[test]
    fn test_unknown_policy_is_error() {
        assert!(GridConfig::from_yaml("conflict_policy: merge\n").is_err());
    }
}
