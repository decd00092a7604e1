//! Workflow nodes

use std::sync::Arc;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use wfdef_builder::{
    BuildError, BuildMode, Def, DefBuilder, FieldKind, FieldSlot, FieldSpec, ListSlot, MapSlot,
    RecordAssembler, Shape,
};
use wfdef_tree::{ExceptionTree, FallibleSupplier, HasLoadExceptionTree, SupplyError};

use crate::annotation::{AnnotationAttribute, AnnotationDef};
use crate::bounds::{BoundsAttribute, BoundsDef};
use crate::error::LoadError;
use crate::port::PortDef;

/// What a node is implemented by
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum NodeKind {
    /// Single node backed by a factory
    #[default]
    Native,
    /// Container of nested nodes
    MetaNode,
    /// Shareable container with its own configuration
    Component,
}

impl NodeKind {
    /// Parse the persisted kind string
    ///
    /// # Errors
    /// [`LoadError::UnknownNodeKind`] for anything but the three known kinds.
    pub fn parse(s: &str) -> Result<Self, LoadError> {
        s.parse()
            .map_err(|_| LoadError::UnknownNodeKind(s.to_owned()))
    }
}

impl HasLoadExceptionTree for NodeKind {}

/// Fields of [`NodeDef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum NodeAttribute {
    Id,
    Name,
    Kind,
    Factory,
    Bounds,
    Annotation,
    InPorts,
    OutPorts,
    Properties,
}

/// A node of a workflow
#[derive(Debug, Clone, Serialize)]
pub struct NodeDef {
    id: i32,
    name: String,
    kind: NodeKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    factory: Option<String>,
    bounds: BoundsDef,
    #[serde(skip_serializing_if = "Option::is_none")]
    annotation: Option<AnnotationDef>,
    in_ports: Vec<PortDef>,
    out_ports: Vec<PortDef>,
    properties: IndexMap<String, String>,
    #[serde(skip)]
    load_exception_tree: Arc<ExceptionTree<NodeAttribute>>,
}

impl NodeDef {
    /// Unnamed native node standing in for one that failed to load
    #[must_use]
    pub fn placeholder(id: i32) -> Self {
        Self {
            id,
            name: String::new(),
            kind: NodeKind::default(),
            factory: None,
            bounds: BoundsDef::placeholder(),
            annotation: None,
            in_ports: Vec::new(),
            out_ports: Vec::new(),
            properties: IndexMap::new(),
            load_exception_tree: Arc::default(),
        }
    }

    #[must_use]
    pub fn id(&self) -> i32 {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    #[must_use]
    pub fn factory(&self) -> Option<&str> {
        self.factory.as_deref()
    }

    #[must_use]
    pub fn bounds(&self) -> &BoundsDef {
        &self.bounds
    }

    #[must_use]
    pub fn annotation(&self) -> Option<&AnnotationDef> {
        self.annotation.as_ref()
    }

    #[must_use]
    pub fn in_ports(&self) -> &[PortDef] {
        &self.in_ports
    }

    #[must_use]
    pub fn out_ports(&self) -> &[PortDef] {
        &self.out_ports
    }

    #[must_use]
    pub fn properties(&self) -> &IndexMap<String, String> {
        &self.properties
    }

    #[must_use]
    pub fn id_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(NodeAttribute::Id)
    }

    #[must_use]
    pub fn name_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(NodeAttribute::Name)
    }

    #[must_use]
    pub fn kind_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(NodeAttribute::Kind)
    }

    #[must_use]
    pub fn factory_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(NodeAttribute::Factory)
    }

    #[must_use]
    pub fn bounds_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(NodeAttribute::Bounds)
    }

    #[must_use]
    pub fn bounds_exception_tree(&self) -> Option<&ExceptionTree<BoundsAttribute>> {
        self.exception_tree_as(NodeAttribute::Bounds)
    }

    #[must_use]
    pub fn annotation_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(NodeAttribute::Annotation)
    }

    #[must_use]
    pub fn annotation_exception_tree(&self) -> Option<&ExceptionTree<AnnotationAttribute>> {
        self.exception_tree_as(NodeAttribute::Annotation)
    }

    #[must_use]
    pub fn in_ports_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(NodeAttribute::InPorts)
    }

    #[must_use]
    pub fn in_ports_exception_tree(&self) -> Option<&ExceptionTree<usize>> {
        self.exception_tree_as(NodeAttribute::InPorts)
    }

    #[must_use]
    pub fn out_ports_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(NodeAttribute::OutPorts)
    }

    #[must_use]
    pub fn out_ports_exception_tree(&self) -> Option<&ExceptionTree<usize>> {
        self.exception_tree_as(NodeAttribute::OutPorts)
    }

    #[must_use]
    pub fn properties_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(NodeAttribute::Properties)
    }

    #[must_use]
    pub fn properties_exception_tree(&self) -> Option<&ExceptionTree<String>> {
        self.exception_tree_as(NodeAttribute::Properties)
    }
}

impl PartialEq for NodeDef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.name == other.name
            && self.kind == other.kind
            && self.factory == other.factory
            && self.bounds == other.bounds
            && self.annotation == other.annotation
            && self.in_ports == other.in_ports
            && self.out_ports == other.out_ports
            && self.properties == other.properties
    }
}

impl Shape for NodeDef {
    type Attribute = NodeAttribute;
    const NAME: &'static str = "NodeDef";
    const FIELDS: &'static [FieldSpec<NodeAttribute>] = &[
        FieldSpec::required(NodeAttribute::Id, FieldKind::Scalar),
        FieldSpec::required(NodeAttribute::Name, FieldKind::Scalar),
        FieldSpec::required(NodeAttribute::Kind, FieldKind::Scalar),
        FieldSpec::optional(NodeAttribute::Factory, FieldKind::Scalar),
        FieldSpec::required(NodeAttribute::Bounds, FieldKind::Record),
        FieldSpec::optional(NodeAttribute::Annotation, FieldKind::Record),
        FieldSpec::optional(NodeAttribute::InPorts, FieldKind::List),
        FieldSpec::optional(NodeAttribute::OutPorts, FieldKind::List),
        FieldSpec::optional(NodeAttribute::Properties, FieldKind::Map),
    ];
}

crate::impl_def!(NodeDef, NodeDefBuilder, NodeAttribute);

/// Builder for [`NodeDef`]
#[derive(Debug, Default)]
pub struct NodeDefBuilder {
    mode: BuildMode,
    id: FieldSlot<i32>,
    name: FieldSlot<String>,
    kind: FieldSlot<NodeKind>,
    factory: FieldSlot<String>,
    bounds: FieldSlot<BoundsDef>,
    annotation: FieldSlot<AnnotationDef>,
    in_ports: ListSlot<PortDef>,
    out_ports: ListSlot<PortDef>,
    properties: MapSlot<String, String>,
}

impl NodeDefBuilder {
    #[must_use]
    pub fn set_id(mut self, id: i32) -> Self {
        self.id.set(id);
        self
    }

    #[must_use]
    pub fn set_id_from<E: Into<SupplyError>>(mut self, id: impl FallibleSupplier<i32, E>) -> Self {
        self.id.set_from(id);
        self
    }

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
    pub fn set_kind(mut self, kind: NodeKind) -> Self {
        self.kind.set(kind);
        self
    }

    #[must_use]
    pub fn set_kind_from<E: Into<SupplyError>>(
        mut self,
        kind: impl FallibleSupplier<NodeKind, E>,
    ) -> Self {
        self.kind.set_from(kind);
        self
    }

    #[must_use]
    pub fn set_factory(mut self, factory: impl Into<String>) -> Self {
        self.factory.set(factory.into());
        self
    }

    #[must_use]
    pub fn set_factory_from<E: Into<SupplyError>>(
        mut self,
        factory: impl FallibleSupplier<String, E>,
    ) -> Self {
        self.factory.set_from(factory);
        self
    }

    #[must_use]
    pub fn set_bounds(mut self, bounds: BoundsDef) -> Self {
        self.bounds.set(bounds);
        self
    }

    #[must_use]
    pub fn set_bounds_from<E: Into<SupplyError>>(
        mut self,
        bounds: impl FallibleSupplier<BoundsDef, E>,
    ) -> Self {
        self.bounds.set_from(bounds);
        self
    }

    #[must_use]
    pub fn set_annotation(mut self, annotation: AnnotationDef) -> Self {
        self.annotation.set(annotation);
        self
    }

    #[must_use]
    pub fn set_annotation_from<E: Into<SupplyError>>(
        mut self,
        annotation: impl FallibleSupplier<AnnotationDef, E>,
    ) -> Self {
        self.annotation.set_from(annotation);
        self
    }

    #[must_use]
    pub fn set_in_ports(mut self, ports: Vec<PortDef>) -> Self {
        self.in_ports.set(ports);
        self
    }

    #[must_use]
    pub fn set_in_ports_from<E: Into<SupplyError>>(
        mut self,
        ports: impl FallibleSupplier<Vec<PortDef>, E>,
    ) -> Self {
        self.in_ports.set_from(ports);
        self
    }

    #[must_use]
    pub fn add_to_in_ports(mut self, port: PortDef) -> Self {
        self.in_ports.add(port);
        self
    }

    #[must_use]
    pub fn add_to_in_ports_from<E: Into<SupplyError>>(
        mut self,
        port: impl FallibleSupplier<PortDef, E>,
        fallback: PortDef,
    ) -> Self {
        self.in_ports.add_from(port, fallback);
        self
    }

    #[must_use]
    pub fn set_out_ports(mut self, ports: Vec<PortDef>) -> Self {
        self.out_ports.set(ports);
        self
    }

    #[must_use]
    pub fn set_out_ports_from<E: Into<SupplyError>>(
        mut self,
        ports: impl FallibleSupplier<Vec<PortDef>, E>,
    ) -> Self {
        self.out_ports.set_from(ports);
        self
    }

    #[must_use]
    pub fn add_to_out_ports(mut self, port: PortDef) -> Self {
        self.out_ports.add(port);
        self
    }

    #[must_use]
    pub fn add_to_out_ports_from<E: Into<SupplyError>>(
        mut self,
        port: impl FallibleSupplier<PortDef, E>,
        fallback: PortDef,
    ) -> Self {
        self.out_ports.add_from(port, fallback);
        self
    }

    #[must_use]
    pub fn set_properties(mut self, properties: IndexMap<String, String>) -> Self {
        self.properties.set(properties);
        self
    }

    #[must_use]
    pub fn set_properties_from<E: Into<SupplyError>>(
        mut self,
        properties: impl FallibleSupplier<IndexMap<String, String>, E>,
    ) -> Self {
        self.properties.set_from(properties);
        self
    }

    #[must_use]
    pub fn put_to_properties(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.properties.put(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn put_to_properties_from<E: Into<SupplyError>>(
        mut self,
        key: impl Into<String>,
        value: impl FallibleSupplier<String, E>,
        fallback: String,
    ) -> Self {
        self.properties.put_from(key.into(), value, fallback);
        self
    }
}

impl DefBuilder for NodeDefBuilder {
    type Def = NodeDef;

    fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    fn build(self) -> Result<NodeDef, BuildError> {
        let mut a = RecordAssembler::<NodeDef>::new(self.mode);
        let id = a.required(NodeAttribute::Id, self.id, || 0);
        let name = a.required(NodeAttribute::Name, self.name, String::new);
        let kind = a.required(NodeAttribute::Kind, self.kind, NodeKind::default);
        let factory = a.optional(NodeAttribute::Factory, self.factory);
        let bounds = a.required(NodeAttribute::Bounds, self.bounds, BoundsDef::placeholder);
        let annotation = a.optional(NodeAttribute::Annotation, self.annotation);
        let in_ports = a.list(NodeAttribute::InPorts, self.in_ports);
        let out_ports = a.list(NodeAttribute::OutPorts, self.out_ports);
        let properties = a.map(NodeAttribute::Properties, self.properties);
        Ok(NodeDef {
            id,
            name,
            kind,
            factory,
            bounds,
            annotation,
            in_ports,
            out_ports,
            properties,
            load_exception_tree: Arc::new(a.finish()?),
        })
    }
}
