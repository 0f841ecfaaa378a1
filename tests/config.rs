//! Configuration loading and saving

use stockgrid::config::{BlurBehavior, ConflictPolicy, GridConfig};
use stockgrid::config_paths;
use tempfile::TempDir;

#[test]
fn test_save_and_load_roundtrip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("config.yaml");
    let config = GridConfig {
        blur: BlurBehavior::Cancel,
        auto_commit: true,
        conflict_policy: ConflictPolicy::DropDrafts,
        default_currency: "EUR".to_string(),
    };

    config.save_to(&path).unwrap();
    let loaded = GridConfig::load_from(&path).unwrap();

    assert_eq!(loaded, config);
}

#[test]
fn test_yaml_uses_snake_case_names() {
    let config = GridConfig::from_yaml("blur: cancel\nconflict_policy: drop_drafts\n").unwrap();
    assert_eq!(config.blur, BlurBehavior::Cancel);
    assert_eq!(config.conflict_policy, ConflictPolicy::DropDrafts);
    assert!(!config.auto_commit);
}

#[test]
fn test_invalid_yaml_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "blur: sideways\n").unwrap();

    let err = GridConfig::load_from(&path).unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to parse config"));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(GridConfig::load_from(&dir.path().join("absent.yaml")).is_err());
}

#[test]
fn test_paths_live_under_app_dir() {
    if let Some(file) = config_paths::config_file() {
        assert!(file.ends_with("stockgrid/config.yaml"));
    }
    if let Some(logs) = config_paths::logs_dir() {
        assert!(logs.ends_with("stockgrid/logs"));
    }
}
