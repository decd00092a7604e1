//! Loading workflows from settings trees and files

use pretty_assertions::assert_eq;
use serde_json::json;
use wfdef_builder::Def;
use wfdef_model::{
    load_connection, load_node, load_workflow, load_workflow_file, BoundsDef, LoadConfig,
    LoadError, LoadReport, NodeAttribute, NodeKind,
};
use wfdef_settings::{SettingsError, SettingsTree};
use wfdef_test_utils::{
    init_test_tracing, node_json, sample_workflow_json, sample_workflow_settings,
    sample_workflow_with, sample_workflow_without, settings, write_temp_file,
};

fn paths(workflow: &wfdef_model::WorkflowDef) -> Vec<String> {
    workflow
        .flattened_with_paths()
        .into_iter()
        .map(|(p, _)| p.to_string())
        .collect()
}

#[test]
fn sample_workflow_loads_cleanly() {
    init_test_tracing();
    let wf = load_workflow(&sample_workflow_settings(), &LoadConfig::default()).unwrap();

    assert_eq!(wf.name(), "Customer Churn");
    assert_eq!(wf.version(), "4.2.0");
    assert_eq!(wf.author(), Some("analytics"));
    assert_eq!(wf.nodes().keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    let reader = wf.node(1).unwrap();
    assert_eq!(reader.name(), "CSV Reader");
    assert_eq!(reader.kind(), NodeKind::Native);
    assert_eq!(reader.bounds(), &BoundsDef::new(100, 50, 80, 60));
    assert_eq!(reader.out_ports()[0].name(), Some("Filtered"));
    assert_eq!(reader.properties()["column"], "age");
    assert_eq!(wf.connections().len(), 1);
    assert_eq!(wf.connections()[0].bendpoints()[0].x(), 150);
    let note = &wf.annotations()["annotation_0"];
    assert_eq!(note.text(), "Input data");
    assert_eq!(note.style_ranges()[0].font_style(), Some(1));
    assert_eq!(wf.dangling_connections().count(), 0);
    assert!(!wf.has_exceptions());
}

#[test]
fn corrupt_node_bounds_yield_single_exception_at_their_path() {
    init_test_tracing();
    let tree = sample_workflow_with("nodes/node_2/bounds", json!("not-an-array"));
    let wf = load_workflow(&tree, &LoadConfig::default()).unwrap();

    let filter = wf.node(2).unwrap();
    assert_eq!(filter.bounds(), &BoundsDef::placeholder());
    assert_eq!(paths(&wf), vec!["nodes.2.bounds"]);
    assert!(filter.bounds_supply_exception().is_some());
    assert!(wf.node(1).is_some_and(|n| !n.has_exceptions()));
}

#[test]
fn strict_load_without_version_fails_naming_it() {
    let tree = sample_workflow_without("version");
    let err = load_workflow(&tree, &LoadConfig::new().strict()).unwrap_err();
    assert_eq!(err.shape(), "WorkflowDef");
    assert_eq!(err.missing_fields(), &["version"]);
}

#[test]
fn lenient_load_without_version_records_it() {
    let tree = sample_workflow_without("version");
    let wf = load_workflow(&tree, &LoadConfig::default()).unwrap();
    assert_eq!(wf.version(), "");
    assert!(wf.has_exceptions());
    let cause = wf.version_supply_exception().unwrap();
    assert!(cause.downcast_ref::<SettingsError>().is_some_and(SettingsError::is_missing));
    assert_eq!(paths(&wf), vec!["version"]);
}

#[test]
fn unknown_node_kind_is_recorded_on_the_kind_field() {
    let tree = sample_workflow_with("nodes/node_1/kind", json!("plugin"));
    let wf = load_workflow(&tree, &LoadConfig::default()).unwrap();
    let node = wf.node(1).unwrap();
    assert_eq!(node.kind(), NodeKind::Native);
    let cause = node.kind_supply_exception().unwrap();
    assert_eq!(cause.to_string(), "unknown node kind 'plugin'");
    assert!(matches!(cause.downcast_ref::<LoadError>(), Some(LoadError::UnknownNodeKind(_))));
}

#[test]
fn node_with_unreadable_id_is_kept_under_synthesized_key() {
    let tree = sample_workflow_with("nodes/node_2/id", json!("two"));
    let wf = load_workflow(&tree, &LoadConfig::default()).unwrap();
    assert_eq!(wf.nodes().keys().copied().collect::<Vec<_>>(), vec![1, -2]);
    assert_eq!(wf.node(-2).unwrap().name(), "Row Filter");
    assert_eq!(paths(&wf), vec!["nodes.-2.id"]);
    assert_eq!(wf.dangling_connections().count(), 1);
}

#[test]
fn synthesized_key_never_replaces_a_node_with_a_real_id() {
    let mut unreadable = node_json(5, "Reader");
    unreadable["id"] = json!("five");
    let tree = settings(json!({
        "name": "wf",
        "version": "1",
        "nodes": {
            "first": unreadable,
            "second": node_json(-1, "Writer")
        }
    }));
    let wf = load_workflow(&tree, &LoadConfig::default()).unwrap();
    assert_eq!(wf.nodes().keys().copied().collect::<Vec<_>>(), vec![-2, -1]);
    assert_eq!(wf.node(-2).unwrap().name(), "Reader");
    assert_eq!(wf.node(-1).unwrap().name(), "Writer");
    assert_eq!(paths(&wf), vec!["nodes.-2.id"]);
}

#[test]
fn unopenable_child_subtree_becomes_placeholder_entry() {
    let tree = sample_workflow_with("connections/connection_0", json!(42));
    let wf = load_workflow(&tree, &LoadConfig::default()).unwrap();
    assert_eq!(wf.connections().len(), 1);
    assert_eq!(wf.connections()[0].source_id(), 0);
    assert_eq!(paths(&wf), vec!["connections.0"]);
}

#[test]
fn unreadable_collection_is_a_bulk_failure() {
    let tree = sample_workflow_with("annotations", json!(["not", "a", "map"]));
    let wf = load_workflow(&tree, &LoadConfig::default()).unwrap();
    assert!(wf.annotations().is_empty());
    assert!(wf.annotations_supply_exception().is_some());
    assert!(wf.annotations_exception_tree().unwrap().exceptional_children().is_empty());
}

#[test]
fn optional_keys_absent_are_not_exceptions() {
    let tree = settings(json!({
        "id": 9,
        "name": "Bare",
        "kind": "metanode",
        "bounds": [0, 0, 1, 1]
    }));
    let node = load_node(&tree, &LoadConfig::default()).unwrap();
    assert_eq!(node.kind(), NodeKind::MetaNode);
    assert_eq!(node.factory(), None);
    assert!(node.annotation().is_none());
    assert!(node.in_ports().is_empty());
    assert!(!node.has_exceptions());
}

#[test]
fn failures_inside_node_annotation_nest_under_it() {
    let tree = settings(json!({
        "id": 3,
        "name": "Joiner",
        "kind": "native",
        "bounds": [0, 0, 1, 1],
        "annotation": {
            "text": "joins",
            "bounds": {"x": 0, "y": 0, "width": "wide", "height": 10}
        }
    }));
    let node = load_node(&tree, &LoadConfig::default()).unwrap();
    assert!(node.annotation_supply_exception().is_none());
    assert!(node.annotation_exception_tree().is_some());
    let paths: Vec<String> = node
        .flattened_with_paths()
        .into_iter()
        .map(|(p, _)| p.to_string())
        .collect();
    assert_eq!(paths, vec!["annotation.bounds.width"]);
    assert!(node.has_exceptions_at(NodeAttribute::Annotation));
}

#[test]
fn strict_nested_failure_fails_the_required_parent_field() {
    let tree = settings(json!({
        "id": 3,
        "name": "Joiner",
        "kind": "native",
        "bounds": {"x": 0, "y": 0}
    }));
    let err = load_node(&tree, &LoadConfig::new().strict()).unwrap_err();
    assert_eq!(err.missing_fields(), &["bounds"]);
}

#[test]
fn strict_nested_failure_in_a_list_is_recorded_at_its_index() {
    let tree = settings(json!({
        "source_id": 1, "source_port": 0, "dest_id": 2, "dest_port": 0,
        "bendpoints": {"p0": {"x": 1, "y": 1}, "p1": {"x": 2}}
    }));
    let c = load_connection(&tree, &LoadConfig::new().strict()).unwrap();
    assert_eq!(c.bendpoints().len(), 2);
    let cause = c
        .bendpoints_exception_tree()
        .unwrap()
        .supply_exception_at(&1)
        .unwrap();
    assert!(matches!(cause.downcast_ref::<LoadError>(), Some(LoadError::Build(_))));
}

#[test]
fn loads_yaml_file_by_extension() {
    let yaml = serde_yaml::to_string(&sample_workflow_json()).unwrap();
    let (_dir, path) = write_temp_file("flow.yaml", &yaml);
    let wf = load_workflow_file(&path, &LoadConfig::default()).unwrap();
    assert_eq!(wf.nodes().len(), 2);
}

#[test]
fn missing_file_is_a_hard_error() {
    let err = load_workflow_file("/definitely/not/here.json", &LoadConfig::default()).unwrap_err();
    assert!(matches!(err, LoadError::Settings(_)));
}

#[test]
fn report_respects_limit_and_counts_everything() {
    let tree = SettingsTree::from_value(json!({
        "nodes": {"a": 1, "b": 2, "c": 3}
    }))
    .unwrap();
    let config = LoadConfig::default().with_report_limit(Some(2));
    let wf = load_workflow(&tree, &config).unwrap();
    let report = LoadReport::new(&wf, &config);
    assert_eq!(report.exception_count, 5);
    assert_eq!(report.exceptions.len(), 2);
    assert!(report.truncated);
    assert_eq!(report.exceptions[0].path, "name");
    assert!(!report.is_clean());
}
