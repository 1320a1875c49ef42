//! Config and record table files

use std::fs;
use std::path::PathBuf;

use rectris::config::{Config, ConfigError};
use rectris::records::RecordStore;
use rectris::types::ColorMode;
use tempfile::tempdir;

fn temp_path(name: &str) -> (tempfile::TempDir, PathBuf) {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let path = temp_dir.path().join("rectris").join(name);
    (temp_dir, path)
}

#[test]
fn test_missing_config_writes_defaults() {
    let (_dir, path) = temp_path("config.toml");

    let config = Config::load_from(&path).unwrap();
    assert_eq!(config, Config::default());
    assert!(path.exists());

    // The written file loads back to the same values
    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn test_config_round_trip_keeps_optional_fields() {
    let (_dir, path) = temp_path("config.toml");
    let config = Config {
        width: 12,
        height: 16,
        color_mode: ColorMode::Gray,
        seed: Some(77),
        records_path: Some(PathBuf::from("/tmp/rectris-records.json")),
        ..Config::default()
    };

    config.save_to(&path).unwrap();
    assert_eq!(Config::load_from(&path).unwrap(), config);
}

#[test]
fn test_malformed_config_is_a_parse_error() {
    let (_dir, path) = temp_path("config.toml");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "width = \"wide\"").unwrap();

    assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_invalid_config_values_are_rejected_on_load() {
    let (_dir, path) = temp_path("config.toml");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "width = 2\n").unwrap();

    let err = Config::load_from(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(err.to_string().contains("width"));
}

#[test]
fn test_missing_records_file_gives_empty_table() {
    let (_dir, path) = temp_path("records.json");
    let store = RecordStore::open(&path);
    assert_eq!(store.standings(0).entries, [0; 8]);
    assert!(!path.exists());
}

#[test]
fn test_records_survive_save_and_reopen() {
    let (_dir, path) = temp_path("records.json");

    let mut store = RecordStore::open(&path);
    assert_eq!(store.commit(120), Some(0));
    assert_eq!(store.commit(45), Some(1));
    assert_eq!(store.commit(0), None);
    store.save().unwrap();

    let reopened = RecordStore::open(&path);
    assert_eq!(reopened.standings(0).entries, [120, 45, 0, 0, 0, 0, 0, 0]);

    let standings = reopened.standings(45);
    assert_eq!(standings.live, Some(2));
    assert_eq!(standings.entries, vec![120, 45, 45, 0, 0, 0, 0, 0]);
}

#[test]
fn test_corrupt_records_file_falls_back_to_empty_table() {
    let (_dir, path) = temp_path("records.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, "{ not json").unwrap();

    let mut store = RecordStore::open(&path);
    assert_eq!(store.standings(0).entries, [0; 8]);

    // The next save replaces the broken file
    store.commit(9);
    store.save().unwrap();
    assert_eq!(RecordStore::open(&path).standings(0).entries[0], 9);
}

#[test]
fn test_hand_edited_records_are_normalized() {
    let (_dir, path) = temp_path("records.json");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(&path, r#"{"entries": [3, 30, 300]}"#).unwrap();

    let store = RecordStore::open(&path);
    assert_eq!(store.standings(0).entries, [300, 30, 3, 0, 0, 0, 0, 0]);
}
