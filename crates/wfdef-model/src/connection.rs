//! Connections between node ports

use std::sync::Arc;

use serde::Serialize;
use wfdef_builder::{
    BuildError, BuildMode, Def, DefBuilder, FieldKind, FieldSlot, FieldSpec, ListSlot,
    RecordAssembler, Shape,
};
use wfdef_tree::{ExceptionTree, FallibleSupplier, SupplyError};

use crate::coordinate::CoordinateDef;

/// Fields of [`ConnectionDef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum ConnectionAttribute {
    SourceId,
    SourcePort,
    DestId,
    DestPort,
    Deletable,
    Bendpoints,
}

/// Edge from an output port to an input port
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionDef {
    source_id: i32,
    source_port: i32,
    dest_id: i32,
    dest_port: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    deletable: Option<bool>,
    bendpoints: Vec<CoordinateDef>,
    #[serde(skip)]
    load_exception_tree: Arc<ExceptionTree<ConnectionAttribute>>,
}

impl ConnectionDef {
    /// Dangling connection standing in for one that failed to load
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            source_id: 0,
            source_port: 0,
            dest_id: 0,
            dest_port: 0,
            deletable: None,
            bendpoints: Vec::new(),
            load_exception_tree: Arc::default(),
        }
    }

    #[must_use]
    pub fn source_id(&self) -> i32 {
        self.source_id
    }

    #[must_use]
    pub fn source_port(&self) -> i32 {
        self.source_port
    }

    #[must_use]
    pub fn dest_id(&self) -> i32 {
        self.dest_id
    }

    #[must_use]
    pub fn dest_port(&self) -> i32 {
        self.dest_port
    }

    /// Absent means the persisted default (deletable)
    #[must_use]
    pub fn deletable(&self) -> Option<bool> {
        self.deletable
    }

    #[must_use]
    pub fn bendpoints(&self) -> &[CoordinateDef] {
        &self.bendpoints
    }

    #[must_use]
    pub fn source_id_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(ConnectionAttribute::SourceId)
    }

    #[must_use]
    pub fn source_port_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(ConnectionAttribute::SourcePort)
    }

    #[must_use]
    pub fn dest_id_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(ConnectionAttribute::DestId)
    }

    #[must_use]
    pub fn dest_port_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(ConnectionAttribute::DestPort)
    }

    #[must_use]
    pub fn deletable_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(ConnectionAttribute::Deletable)
    }

    #[must_use]
    pub fn bendpoints_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(ConnectionAttribute::Bendpoints)
    }

    #[must_use]
    pub fn bendpoints_exception_tree(&self) -> Option<&ExceptionTree<usize>> {
        self.exception_tree_as(ConnectionAttribute::Bendpoints)
    }
}

impl PartialEq for ConnectionDef {
    fn eq(&self, other: &Self) -> bool {
        self.source_id == other.source_id
            && self.source_port == other.source_port
            && self.dest_id == other.dest_id
            && self.dest_port == other.dest_port
            && self.deletable == other.deletable
            && self.bendpoints == other.bendpoints
    }
}

impl Shape for ConnectionDef {
    type Attribute = ConnectionAttribute;
    const NAME: &'static str = "ConnectionDef";
    const FIELDS: &'static [FieldSpec<ConnectionAttribute>] = &[
        FieldSpec::required(ConnectionAttribute::SourceId, FieldKind::Scalar),
        FieldSpec::required(ConnectionAttribute::SourcePort, FieldKind::Scalar),
        FieldSpec::required(ConnectionAttribute::DestId, FieldKind::Scalar),
        FieldSpec::required(ConnectionAttribute::DestPort, FieldKind::Scalar),
        FieldSpec::optional(ConnectionAttribute::Deletable, FieldKind::Scalar),
        FieldSpec::optional(ConnectionAttribute::Bendpoints, FieldKind::List),
    ];
}

crate::impl_def!(ConnectionDef, ConnectionDefBuilder, ConnectionAttribute);

/// Builder for [`ConnectionDef`]
#[derive(Debug, Default)]
pub struct ConnectionDefBuilder {
    mode: BuildMode,
    source_id: FieldSlot<i32>,
    source_port: FieldSlot<i32>,
    dest_id: FieldSlot<i32>,
    dest_port: FieldSlot<i32>,
    deletable: FieldSlot<bool>,
    bendpoints: ListSlot<CoordinateDef>,
}

impl ConnectionDefBuilder {
    #[must_use]
    pub fn set_source_id(mut self, id: i32) -> Self {
        self.source_id.set(id);
        self
    }

    #[must_use]
    pub fn set_source_id_from<E: Into<SupplyError>>(
        mut self,
        id: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.source_id.set_from(id);
        self
    }

    #[must_use]
    pub fn set_source_port(mut self, port: i32) -> Self {
        self.source_port.set(port);
        self
    }

    #[must_use]
    pub fn set_source_port_from<E: Into<SupplyError>>(
        mut self,
        port: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.source_port.set_from(port);
        self
    }

    #[must_use]
    pub fn set_dest_id(mut self, id: i32) -> Self {
        self.dest_id.set(id);
        self
    }

    #[must_use]
    pub fn set_dest_id_from<E: Into<SupplyError>>(
        mut self,
        id: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.dest_id.set_from(id);
        self
    }

    #[must_use]
    pub fn set_dest_port(mut self, port: i32) -> Self {
        self.dest_port.set(port);
        self
    }

    #[must_use]
    pub fn set_dest_port_from<E: Into<SupplyError>>(
        mut self,
        port: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.dest_port.set_from(port);
        self
    }

    #[must_use]
    pub fn set_deletable(mut self, deletable: bool) -> Self {
        self.deletable.set(deletable);
        self
    }

    #[must_use]
    pub fn set_deletable_from<E: Into<SupplyError>>(
        mut self,
        deletable: impl FallibleSupplier<bool, E>,
    ) -> Self {
        self.deletable.set_from(deletable);
        self
    }

    #[must_use]
    pub fn set_bendpoints(mut self, points: Vec<CoordinateDef>) -> Self {
        self.bendpoints.set(points);
        self
    }

    #[must_use]
    pub fn set_bendpoints_from<E: Into<SupplyError>>(
        mut self,
        points: impl FallibleSupplier<Vec<CoordinateDef>, E>,
    ) -> Self {
        self.bendpoints.set_from(points);
        self
    }

    #[must_use]
    pub fn add_to_bendpoints(mut self, point: CoordinateDef) -> Self {
        self.bendpoints.add(point);
        self
    }

    #[must_use]
    pub fn add_to_bendpoints_from<E: Into<SupplyError>>(
        mut self,
        point: impl FallibleSupplier<CoordinateDef, E>,
        fallback: CoordinateDef,
    ) -> Self {
        self.bendpoints.add_from(point, fallback);
        self
    }
}

impl DefBuilder for ConnectionDefBuilder {
    type Def = ConnectionDef;

    fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    fn build(self) -> Result<ConnectionDef, BuildError> {
        let mut a = RecordAssembler::<ConnectionDef>::new(self.mode);
        let source_id = a.required(ConnectionAttribute::SourceId, self.source_id, || 0);
        let source_port = a.required(ConnectionAttribute::SourcePort, self.source_port, || 0);
        let dest_id = a.required(ConnectionAttribute::DestId, self.dest_id, || 0);
        let dest_port = a.required(ConnectionAttribute::DestPort, self.dest_port, || 0);
        let deletable = a.optional(ConnectionAttribute::Deletable, self.deletable);
        let bendpoints = a.list(ConnectionAttribute::Bendpoints, self.bendpoints);
        Ok(ConnectionDef {
            source_id,
            source_port,
            dest_id,
            dest_port,
            deletable,
            bendpoints,
            load_exception_tree: Arc::new(a.finish()?),
        })
    }
}
