//! Workflow root record

use std::sync::Arc;

use indexmap::IndexMap;
use serde::Serialize;
use wfdef_builder::{
    BuildError, BuildMode, Def, DefBuilder, FieldKind, FieldSlot, FieldSpec, ListSlot, MapSlot,
    RecordAssembler, Shape,
};
use wfdef_tree::{ExceptionTree, FallibleSupplier, SupplyError};

use crate::annotation::AnnotationDef;
use crate::connection::ConnectionDef;
use crate::node::NodeDef;

/// Fields of [`WorkflowDef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum WorkflowAttribute {
    Name,
    Version,
    Author,
    Nodes,
    Connections,
    Annotations,
}

/// A complete workflow: nodes keyed by id, connections, canvas annotations
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowDef {
    name: String,
    version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    author: Option<String>,
    nodes: IndexMap<i32, NodeDef>,
    connections: Vec<ConnectionDef>,
    annotations: IndexMap<String, AnnotationDef>,
    #[serde(skip)]
    load_exception_tree: Arc<ExceptionTree<WorkflowAttribute>>,
}

impl WorkflowDef {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    #[must_use]
    pub fn nodes(&self) -> &IndexMap<i32, NodeDef> {
        &self.nodes
    }

    #[must_use]
    pub fn node(&self, id: i32) -> Option<&NodeDef> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn connections(&self) -> &[ConnectionDef] {
        &self.connections
    }

    #[must_use]
    pub fn annotations(&self) -> &IndexMap<String, AnnotationDef> {
        &self.annotations
    }

    /// Connections whose source or destination is not a node of this workflow
    pub fn dangling_connections(&self) -> impl Iterator<Item = &ConnectionDef> {
        self.connections.iter().filter(|c| {
            !self.nodes.contains_key(&c.source_id()) || !self.nodes.contains_key(&c.dest_id())
        })
    }

    #[must_use]
    pub fn name_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(WorkflowAttribute::Name)
    }

    #[must_use]
    pub fn version_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(WorkflowAttribute::Version)
    }

    #[must_use]
    pub fn author_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(WorkflowAttribute::Author)
    }

    #[must_use]
    pub fn nodes_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(WorkflowAttribute::Nodes)
    }

    #[must_use]
    pub fn nodes_exception_tree(&self) -> Option<&ExceptionTree<i32>> {
        self.exception_tree_as(WorkflowAttribute::Nodes)
    }

    #[must_use]
    pub fn connections_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(WorkflowAttribute::Connections)
    }

    #[must_use]
    pub fn connections_exception_tree(&self) -> Option<&ExceptionTree<usize>> {
        self.exception_tree_as(WorkflowAttribute::Connections)
    }

    #[must_use]
    pub fn annotations_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(WorkflowAttribute::Annotations)
    }

    #[must_use]
    pub fn annotations_exception_tree(&self) -> Option<&ExceptionTree<String>> {
        self.exception_tree_as(WorkflowAttribute::Annotations)
    }
}

impl PartialEq for WorkflowDef {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.author == other.author
            && self.nodes == other.nodes
            && self.connections == other.connections
            && self.annotations == other.annotations
    }
}

impl Shape for WorkflowDef {
    type Attribute = WorkflowAttribute;
    const NAME: &'static str = "WorkflowDef";
    const FIELDS: &'static [FieldSpec<WorkflowAttribute>] = &[
        FieldSpec::required(WorkflowAttribute::Name, FieldKind::Scalar),
        FieldSpec::required(WorkflowAttribute::Version, FieldKind::Scalar),
        FieldSpec::optional(WorkflowAttribute::Author, FieldKind::Scalar),
        FieldSpec::optional(WorkflowAttribute::Nodes, FieldKind::Map),
        FieldSpec::optional(WorkflowAttribute::Connections, FieldKind::List),
        FieldSpec::optional(WorkflowAttribute::Annotations, FieldKind::Map),
    ];
}

crate::impl_def!(WorkflowDef, WorkflowDefBuilder, WorkflowAttribute);

/// Builder for [`WorkflowDef`]
#[derive(Debug, Default)]
pub struct WorkflowDefBuilder {
    mode: BuildMode,
    name: FieldSlot<String>,
    version: FieldSlot<String>,
    author: FieldSlot<String>,
    nodes: MapSlot<i32, NodeDef>,
    connections: ListSlot<ConnectionDef>,
    annotations: MapSlot<String, AnnotationDef>,
}

impl WorkflowDefBuilder {
    #[must_use]
    pub fn set_name(mut self, name: impl Into<String>) -> Self {
        self.name.set(name.into());
        self
    }

    #[must_use]
    pub fn set_name_from<E: Into<SupplyError>>(
        mut self,
        name: impl FallibleSupplier<String, E>,
    ) -> Self {
        self.name.set_from(name);
        self
    }

    #[must_use]
    pub fn set_version(mut self, version: impl Into<String>) -> Self {
        self.version.set(version.into());
        self
    }

    #[must_use]
    pub fn set_version_from<E: Into<SupplyError>>(
        mut self,
        version: impl FallibleSupplier<String, E>,
    ) -> Self {
        self.version.set_from(version);
        self
    }

    #[must_use]
    pub fn set_author(mut self, author: impl Into<String>) -> Self {
        self.author.set(author.into());
        self
    }

    #[must_use]
    pub fn set_author_from<E: Into<SupplyError>>(
        mut self,
        author: impl FallibleSupplier<String, E>,
    ) -> Self {
        self.author.set_from(author);
        self
    }

    #[must_use]
    pub fn set_nodes(mut self, nodes: IndexMap<i32, NodeDef>) -> Self {
        self.nodes.set(nodes);
        self
    }

    #[must_use]
    pub fn set_nodes_from<E: Into<SupplyError>>(
        mut self,
        nodes: impl FallibleSupplier<IndexMap<i32, NodeDef>, E>,
    ) -> Self {
        self.nodes.set_from(nodes);
        self
    }

    #[must_use]
    pub fn put_to_nodes(mut self, id: i32, node: NodeDef) -> Self {
        self.nodes.put(id, node);
        self
    }

    #[must_use]
    pub fn put_to_nodes_from<E: Into<SupplyError>>(
        mut self,
        id: i32,
        node: impl FallibleSupplier<NodeDef, E>,
        fallback: NodeDef,
    ) -> Self {
        self.nodes.put_from(id, node, fallback);
        self
    }

    #[must_use]
    pub fn set_connections(mut self, connections: Vec<ConnectionDef>) -> Self {
        self.connections.set(connections);
        self
    }

    #[must_use]
    pub fn set_connections_from<E: Into<SupplyError>>(
        mut self,
        connections: impl FallibleSupplier<Vec<ConnectionDef>, E>,
    ) -> Self {
        self.connections.set_from(connections);
        self
    }

    #[must_use]
    pub fn add_to_connections(mut self, connection: ConnectionDef) -> Self {
        self.connections.add(connection);
        self
    }

    #[must_use]
    pub fn add_to_connections_from<E: Into<SupplyError>>(
        mut self,
        connection: impl FallibleSupplier<ConnectionDef, E>,
        fallback: ConnectionDef,
    ) -> Self {
        self.connections.add_from(connection, fallback);
        self
    }

    #[must_use]
    pub fn set_annotations(mut self, annotations: IndexMap<String, AnnotationDef>) -> Self {
        self.annotations.set(annotations);
        self
    }

    #[must_use]
    pub fn set_annotations_from<E: Into<SupplyError>>(
        mut self,
        annotations: impl FallibleSupplier<IndexMap<String, AnnotationDef>, E>,
    ) -> Self {
        self.annotations.set_from(annotations);
        self
    }

    #[must_use]
    pub fn put_to_annotations(mut self, id: impl Into<String>, annotation: AnnotationDef) -> Self {
        self.annotations.put(id.into(), annotation);
        self
    }

    #[must_use]
    pub fn put_to_annotations_from<E: Into<SupplyError>>(
        mut self,
        id: impl Into<String>,
        annotation: impl FallibleSupplier<AnnotationDef, E>,
        fallback: AnnotationDef,
    ) -> Self {
        self.annotations.put_from(id.into(), annotation, fallback);
        self
    }
}

impl DefBuilder for WorkflowDefBuilder {
    type Def = WorkflowDef;

    fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    fn build(self) -> Result<WorkflowDef, BuildError> {
        let mut a = RecordAssembler::<WorkflowDef>::new(self.mode);
        let name = a.required(WorkflowAttribute::Name, self.name, String::new);
        let version = a.required(WorkflowAttribute::Version, self.version, String::new);
        let author = a.optional(WorkflowAttribute::Author, self.author);
        let nodes = a.map(WorkflowAttribute::Nodes, self.nodes);
        let connections = a.list(WorkflowAttribute::Connections, self.connections);
        let annotations = a.map(WorkflowAttribute::Annotations, self.annotations);
        Ok(WorkflowDef {
            name,
            version,
            author,
            nodes,
            connections,
            annotations,
            load_exception_tree: Arc::new(a.finish()?),
        })
    }
}
