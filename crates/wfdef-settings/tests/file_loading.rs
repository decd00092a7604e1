//! Reading settings files from disk

use std::fs;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use wfdef_settings::{SettingsError, SettingsRead, SettingsTree};

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn json_and_yaml_files_read_the_same() {
    let dir = TempDir::new().unwrap();
    let json = write(&dir, "wf.json", r#"{"name": "etl", "bounds": [1, 2, 3, 4]}"#);
    let yaml = write(&dir, "wf.YML", "name: etl\nbounds: [1, 2, 3, 4]\n");

    let a = SettingsTree::from_path(&json).unwrap();
    let b = SettingsTree::from_path(&yaml).unwrap();
    assert_eq!(a, b);
    assert_eq!(b.get_int_array("bounds").unwrap(), vec![1, 2, 3, 4]);
}

#[test]
fn yaml_key_order_is_preserved() {
    let dir = TempDir::new().unwrap();
    let yaml = "nodes:\n  zeta: {id: 3}\n  alpha: {id: 1}\n  mid: {id: 2}\n";
    let path = write(&dir, "nodes.yaml", yaml);
    let nodes = SettingsTree::from_path(&path).unwrap().get_config("nodes").unwrap();
    assert_eq!(nodes.keys(), vec!["zeta", "alpha", "mid"]);
    assert_eq!(nodes.get_config("mid").unwrap().path(), "/nodes/mid");
}

#[test]
fn unknown_extension_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "wf.toml", "name = 'etl'");
    let err = SettingsTree::from_path(&path).unwrap_err();
    assert!(matches!(err, SettingsError::UnsupportedFormat(ref ext) if ext == "toml"));
}

#[test]
fn missing_file_reports_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.json");
    let err = SettingsTree::from_path(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Io { .. }));
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn malformed_documents_are_parse_errors() {
    let dir = TempDir::new().unwrap();
    let json = write(&dir, "bad.json", "{\"name\": ");
    let yaml = write(&dir, "bad.yaml", "- just\n- a list\n");
    assert!(matches!(
        SettingsTree::from_path(&json).unwrap_err(),
        SettingsError::InvalidJson(_)
    ));
    assert!(matches!(
        SettingsTree::from_path(&yaml).unwrap_err(),
        SettingsError::NotAnObject("array")
    ));
}
