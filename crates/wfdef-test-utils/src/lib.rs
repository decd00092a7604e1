//! Testing utilities for the wfdef workspace
//!
//! Settings fixtures, injected supplier failures and file helpers.

#![allow(missing_docs)]

use std::fs;
use std::path::PathBuf;

use serde_json::{json, Value};
use tempfile::TempDir;
use wfdef_settings::SettingsTree;
use wfdef_tree::SupplyError;

/// Failure injected into a supplier
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct Injected(pub &'static str);

/// Supplier that always fails with `message`
pub fn failing<T>(message: &'static str) -> impl FnOnce() -> Result<T, Injected> {
    move || Err(Injected(message))
}

/// Supplier that always succeeds with `value`
pub fn supplying<T>(value: T) -> impl FnOnce() -> Result<T, Injected> {
    move || Ok(value)
}

/// Messages of `errors`, in order
pub fn messages<'a>(errors: impl IntoIterator<Item = &'a SupplyError>) -> Vec<String> {
    errors.into_iter().map(ToString::to_string).collect()
}

pub fn node_json(id: i32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "kind": "native",
        "factory": format!("org.example.{}", name.replace(' ', "")),
        "bounds": [id * 100, 50, 80, 60],
        "in_ports": {
            "port_0": {"index": 0, "port_type": "table"}
        },
        "out_ports": {
            "port_0": {"index": 0, "port_type": "table", "name": "Filtered"}
        },
        "properties": {
            "column": "age"
        }
    })
}

/// Workflow with two connected nodes, one canvas annotation, and nothing broken
pub fn sample_workflow_json() -> Value {
    json!({
        "name": "Customer Churn",
        "version": "4.2.0",
        "author": "analytics",
        "nodes": {
            "node_1": node_json(1, "CSV Reader"),
            "node_2": node_json(2, "Row Filter")
        },
        "connections": {
            "connection_0": {
                "source_id": 1,
                "source_port": 0,
                "dest_id": 2,
                "dest_port": 0,
                "bendpoints": {
                    "point_0": {"x": 150, "y": 80}
                }
            }
        },
        "annotations": {
            "annotation_0": {
                "text": "Input data",
                "bounds": [10, 10, 200, 40],
                "bgcolor": 16_777_215,
                "border_size": 1,
                "alignment": "LEFT",
                "styles": {
                    "style_0": {"start": 0, "length": 5, "font_style": 1}
                }
            }
        }
    })
}

pub fn sample_workflow_settings() -> SettingsTree {
    settings(sample_workflow_json())
}

/// Sample workflow with `value` written at the slash-separated `path`
pub fn sample_workflow_with(path: &str, value: Value) -> SettingsTree {
    let mut root = sample_workflow_json();
    let (parent, last) = parent_of(&mut root, path);
    parent[last] = value;
    settings(root)
}

/// Sample workflow with the entry at `path` removed
pub fn sample_workflow_without(path: &str) -> SettingsTree {
    let mut root = sample_workflow_json();
    let (parent, last) = parent_of(&mut root, path);
    parent
        .as_object_mut()
        .expect("parent is an object")
        .shift_remove(last);
    settings(root)
}

fn parent_of<'a, 'p>(root: &'a mut Value, path: &'p str) -> (&'a mut Value, &'p str) {
    let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    let (last, parents) = segments.split_last().expect("non-empty path");
    let mut cursor = root;
    for segment in parents {
        cursor = cursor
            .get_mut(*segment)
            .unwrap_or_else(|| panic!("no entry '{segment}' in sample workflow"));
    }
    (cursor, *last)
}

pub fn settings(value: Value) -> SettingsTree {
    SettingsTree::from_value(value).expect("fixture is an object")
}

/// Write `contents` to `name` inside a fresh temporary directory
///
/// Keep the returned directory alive for as long as the file is needed.
pub fn write_temp_file(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join(name);
    fs::write(&path, contents).expect("write fixture");
    (dir, path)
}

/// Route `tracing` output through the test harness; safe to call repeatedly
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
