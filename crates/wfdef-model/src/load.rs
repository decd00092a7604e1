//! Loaders from settings subtrees
//!
//! Every settings access is wrapped in a fallible supplier, so a corrupt or
//! missing entry only marks its own field. Child subtrees that cannot be
//! opened become per-entry failures with a placeholder record.
//!
//! In strict mode a nested record that fails its own strict check is
//! recorded at its parent's slot like any other failure; when that slot is
//! required the parent's strict check then rejects it in turn.

use std::collections::HashSet;
use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, instrument, warn};
use wfdef_builder::{BuildError, Def, DefBuilder};
use wfdef_settings::{SettingsRead, SettingsTree};

use crate::annotation::AnnotationDef;
use crate::bounds::BoundsDef;
use crate::config::LoadConfig;
use crate::connection::ConnectionDef;
use crate::coordinate::CoordinateDef;
use crate::error::LoadError;
use crate::node::{NodeDef, NodeKind};
use crate::port::PortDef;
use crate::style_range::StyleRangeDef;
use crate::workflow::WorkflowDef;

/// Read a JSON or YAML file and load the workflow it describes
///
/// # Errors
/// The file cannot be read or parsed, or strict construction failed.
pub fn load_workflow_file(
    path: impl AsRef<Path>,
    config: &LoadConfig,
) -> Result<WorkflowDef, LoadError> {
    let settings = SettingsTree::from_path(path)?;
    Ok(load_workflow(&settings, config)?)
}

/// Load a workflow from its root settings tree
///
/// Logs a warning with the exception count when anything failed.
///
/// # Errors
/// Only in strict mode, when `name` or `version` has no real value.
#[instrument(level = "debug", skip_all, fields(path = settings.path()))]
pub fn load_workflow<S: SettingsRead>(
    settings: &S,
    config: &LoadConfig,
) -> Result<WorkflowDef, BuildError> {
    let mut builder = WorkflowDef::builder()
        .with_mode(config.mode)
        .set_name_from(|| settings.get_string("name"))
        .set_version_from(|| settings.get_string("version"));
    if settings.has("author") {
        builder = builder.set_author_from(|| settings.get_string("author"));
    }

    match settings.get_optional("nodes", S::get_config) {
        Ok(Some(nodes)) => {
            let keys = nodes.keys();
            let ids: Vec<Option<i32>> = keys.iter().map(|key| node_id(&nodes, key)).collect();
            let mut taken: HashSet<i32> = ids.iter().flatten().copied().collect();
            let mut seen = HashSet::new();
            for (index, (key, id)) in keys.iter().zip(ids).enumerate() {
                let id = id.unwrap_or_else(|| synthesized_node_id(index, &mut taken));
                if !seen.insert(id) {
                    warn!(id, key = %key, "duplicate node id, later entry wins");
                }
                builder = builder.put_to_nodes_from(
                    id,
                    || load_child(&nodes, key, config, load_node),
                    NodeDef::placeholder(id),
                );
            }
        }
        Ok(None) => {}
        Err(e) => builder = builder.set_nodes_from(|| Err::<IndexMap<i32, NodeDef>, _>(e)),
    }

    match settings.get_optional("connections", S::get_config) {
        Ok(Some(connections)) => {
            for key in connections.keys() {
                builder = builder.add_to_connections_from(
                    || load_child(&connections, &key, config, load_connection),
                    ConnectionDef::placeholder(),
                );
            }
        }
        Ok(None) => {}
        Err(e) => builder = builder.set_connections_from(|| Err::<Vec<ConnectionDef>, _>(e)),
    }

    match settings.get_optional("annotations", S::get_config) {
        Ok(Some(annotations)) => {
            for key in annotations.keys() {
                builder = builder.put_to_annotations_from(
                    key.clone(),
                    || load_child(&annotations, &key, config, load_annotation),
                    AnnotationDef::placeholder(),
                );
            }
        }
        Ok(None) => {}
        Err(e) => {
            builder =
                builder.set_annotations_from(|| Err::<IndexMap<String, AnnotationDef>, _>(e));
        }
    }

    let workflow = builder.build()?;
    log_load_exceptions(&workflow, config);
    Ok(workflow)
}

/// Load one node
///
/// # Errors
/// Only in strict mode.
pub fn load_node<S: SettingsRead>(
    settings: &S,
    config: &LoadConfig,
) -> Result<NodeDef, BuildError> {
    let mut builder = NodeDef::builder()
        .with_mode(config.mode)
        .set_id_from(|| settings.get_int("id"))
        .set_name_from(|| settings.get_string("name"))
        .set_kind_from(|| -> Result<NodeKind, LoadError> {
            NodeKind::parse(&settings.get_string("kind")?)
        })
        .set_bounds_from(|| load_bounds(settings, "bounds", config));
    if settings.has("factory") {
        builder = builder.set_factory_from(|| settings.get_string("factory"));
    }
    if settings.has("annotation") {
        builder = builder.set_annotation_from(|| -> Result<AnnotationDef, LoadError> {
            Ok(load_annotation(&settings.get_config("annotation")?, config)?)
        });
    }

    match settings.get_optional("in_ports", S::get_config) {
        Ok(Some(ports)) => {
            for key in ports.keys() {
                builder = builder.add_to_in_ports_from(
                    || load_child(&ports, &key, config, load_port),
                    PortDef::placeholder(),
                );
            }
        }
        Ok(None) => {}
        Err(e) => builder = builder.set_in_ports_from(|| Err::<Vec<PortDef>, _>(e)),
    }

    match settings.get_optional("out_ports", S::get_config) {
        Ok(Some(ports)) => {
            for key in ports.keys() {
                builder = builder.add_to_out_ports_from(
                    || load_child(&ports, &key, config, load_port),
                    PortDef::placeholder(),
                );
            }
        }
        Ok(None) => {}
        Err(e) => builder = builder.set_out_ports_from(|| Err::<Vec<PortDef>, _>(e)),
    }

    match settings.get_optional("properties", S::get_config) {
        Ok(Some(properties)) => {
            for key in properties.keys() {
                builder = builder.put_to_properties_from(
                    key.clone(),
                    || properties.get_string(&key),
                    String::new(),
                );
            }
        }
        Ok(None) => {}
        Err(e) => {
            builder = builder.set_properties_from(|| Err::<IndexMap<String, String>, _>(e));
        }
    }

    builder.build()
}

/// Load one connection
///
/// # Errors
/// Only in strict mode.
pub fn load_connection<S: SettingsRead>(
    settings: &S,
    config: &LoadConfig,
) -> Result<ConnectionDef, BuildError> {
    let mut builder = ConnectionDef::builder()
        .with_mode(config.mode)
        .set_source_id_from(|| settings.get_int("source_id"))
        .set_source_port_from(|| settings.get_int("source_port"))
        .set_dest_id_from(|| settings.get_int("dest_id"))
        .set_dest_port_from(|| settings.get_int("dest_port"));
    if settings.has("deletable") {
        builder = builder.set_deletable_from(|| settings.get_bool("deletable"));
    }
    match settings.get_optional("bendpoints", S::get_config) {
        Ok(Some(points)) => {
            for key in points.keys() {
                builder = builder.add_to_bendpoints_from(
                    || load_child(&points, &key, config, load_coordinate),
                    CoordinateDef::new(0, 0),
                );
            }
        }
        Ok(None) => {}
        Err(e) => builder = builder.set_bendpoints_from(|| Err::<Vec<CoordinateDef>, _>(e)),
    }
    builder.build()
}

/// Load one annotation
///
/// # Errors
/// Only in strict mode.
pub fn load_annotation<S: SettingsRead>(
    settings: &S,
    config: &LoadConfig,
) -> Result<AnnotationDef, BuildError> {
    let mut builder = AnnotationDef::builder()
        .with_mode(config.mode)
        .set_text_from(|| settings.get_string("text"))
        .set_bounds_from(|| load_bounds(settings, "bounds", config));
    if settings.has("bgcolor") {
        builder = builder.set_background_color_from(|| settings.get_int("bgcolor"));
    }
    if settings.has("border_size") {
        builder = builder.set_border_size_from(|| settings.get_int("border_size"));
    }
    if settings.has("alignment") {
        builder = builder.set_alignment_from(|| settings.get_string("alignment"));
    }
    match settings.get_optional("styles", S::get_config) {
        Ok(Some(styles)) => {
            for key in styles.keys() {
                builder = builder.add_to_style_ranges_from(
                    || load_child(&styles, &key, config, load_style_range),
                    StyleRangeDef::placeholder(),
                );
            }
        }
        Ok(None) => {}
        Err(e) => builder = builder.set_style_ranges_from(|| Err::<Vec<StyleRangeDef>, _>(e)),
    }
    builder.build()
}

/// Load bounds stored under `key`
///
/// Either an int array `[x, y, width, height]`, or a subtree with one entry
/// per dimension. The subtree form records failures per dimension.
///
/// # Errors
/// The entry is missing, is neither form, or the array has the wrong
/// length; in strict mode also an incomplete subtree.
pub fn load_bounds<S: SettingsRead>(
    settings: &S,
    key: &str,
    config: &LoadConfig,
) -> Result<BoundsDef, LoadError> {
    let builder = BoundsDef::builder().with_mode(config.mode);
    match settings.get_config(key) {
        Ok(dims) => Ok(builder
            .set_x_from(|| dims.get_int("x"))
            .set_y_from(|| dims.get_int("y"))
            .set_width_from(|| dims.get_int("width"))
            .set_height_from(|| dims.get_int("height"))
            .build()?),
        Err(e) if e.is_type_mismatch() => {
            let values = settings.get_int_array(key)?;
            let [x, y, width, height] = <[i32; 4]>::try_from(values.as_slice())
                .map_err(|_| LoadError::BoundsArity(values.len()))?;
            Ok(builder
                .set_x(x)
                .set_y(y)
                .set_width(width)
                .set_height(height)
                .build()?)
        }
        Err(e) => Err(e.into()),
    }
}

/// Load one `{x, y}` coordinate
///
/// # Errors
/// Only in strict mode.
pub fn load_coordinate<S: SettingsRead>(
    settings: &S,
    config: &LoadConfig,
) -> Result<CoordinateDef, BuildError> {
    CoordinateDef::builder()
        .with_mode(config.mode)
        .set_x_from(|| settings.get_int("x"))
        .set_y_from(|| settings.get_int("y"))
        .build()
}

/// Load one port
///
/// # Errors
/// Only in strict mode.
pub fn load_port<S: SettingsRead>(
    settings: &S,
    config: &LoadConfig,
) -> Result<PortDef, BuildError> {
    let mut builder = PortDef::builder()
        .with_mode(config.mode)
        .set_index_from(|| settings.get_int("index"))
        .set_port_type_from(|| settings.get_string("port_type"));
    if settings.has("name") {
        builder = builder.set_name_from(|| settings.get_string("name"));
    }
    builder.build()
}

/// Load one style range
///
/// # Errors
/// Only in strict mode.
pub fn load_style_range<S: SettingsRead>(
    settings: &S,
    config: &LoadConfig,
) -> Result<StyleRangeDef, BuildError> {
    let mut builder = StyleRangeDef::builder()
        .with_mode(config.mode)
        .set_start_from(|| settings.get_int("start"))
        .set_length_from(|| settings.get_int("length"));
    if settings.has("font_style") {
        builder = builder.set_font_style_from(|| settings.get_int("font_style"));
    }
    if settings.has("color") {
        builder = builder.set_color_from(|| settings.get_int("color"));
    }
    builder.build()
}

fn load_child<S, T, F>(parent: &S, key: &str, config: &LoadConfig, load: F) -> Result<T, LoadError>
where
    S: SettingsRead,
    F: FnOnce(&S, &LoadConfig) -> Result<T, BuildError>,
{
    let child = parent.get_config(key)?;
    Ok(load(&child, config)?)
}

/// The `id` of the node stored under `key`, if readable
fn node_id<S: SettingsRead>(nodes: &S, key: &str) -> Option<i32> {
    nodes.get_config(key).and_then(|node| node.get_int("id")).ok()
}

/// Map key for the node at `index` whose id is unreadable
///
/// Starts at `-(index + 1)` and steps down past ids in `taken`, then claims
/// the result.
fn synthesized_node_id(index: usize, taken: &mut HashSet<i32>) -> i32 {
    let mut id = i32::try_from(index).map_or(i32::MIN, |i| -i - 1);
    while !taken.insert(id) && id > i32::MIN {
        id -= 1;
    }
    id
}

fn log_load_exceptions(workflow: &WorkflowDef, config: &LoadConfig) {
    let exceptions = workflow.flattened_with_paths();
    if exceptions.is_empty() {
        return;
    }
    warn!(
        workflow = workflow.name(),
        count = exceptions.len(),
        "workflow loaded with exceptions"
    );
    let limit = config.report_limit.unwrap_or(usize::MAX);
    for (path, error) in exceptions.iter().take(limit) {
        debug!(%path, %error, "load exception");
    }
}
