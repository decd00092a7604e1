//! Node ports

use std::sync::Arc;

use serde::Serialize;
use wfdef_builder::{
    BuildError, BuildMode, Def, DefBuilder, FieldKind, FieldSlot, FieldSpec, RecordAssembler, Shape,
};
use wfdef_tree::{ExceptionTree, FallibleSupplier, SupplyError};

/// Fields of [`PortDef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum PortAttribute {
    Index,
    PortType,
    Name,
}

/// One input or output port of a node
#[derive(Debug, Clone, Serialize)]
pub struct PortDef {
    index: i32,
    port_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip)]
    load_exception_tree: Arc<ExceptionTree<PortAttribute>>,
}

impl PortDef {
    /// Port with no load history
    #[must_use]
    pub fn new(index: i32, port_type: impl Into<String>) -> Self {
        Self {
            index,
            port_type: port_type.into(),
            name: None,
            load_exception_tree: Arc::default(),
        }
    }

    /// Untyped port standing in for one that failed to load
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(0, String::new())
    }

    #[must_use]
    pub fn index(&self) -> i32 {
        self.index
    }

    #[must_use]
    pub fn port_type(&self) -> &str {
        &self.port_type
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub fn index_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(PortAttribute::Index)
    }

    #[must_use]
    pub fn port_type_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(PortAttribute::PortType)
    }

    #[must_use]
    pub fn name_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(PortAttribute::Name)
    }
}

impl PartialEq for PortDef {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.port_type == other.port_type && self.name == other.name
    }
}

impl Shape for PortDef {
    type Attribute = PortAttribute;
    const NAME: &'static str = "PortDef";
    const FIELDS: &'static [FieldSpec<PortAttribute>] = &[
        FieldSpec::required(PortAttribute::Index, FieldKind::Scalar),
        FieldSpec::required(PortAttribute::PortType, FieldKind::Scalar),
        FieldSpec::optional(PortAttribute::Name, FieldKind::Scalar),
    ];
}

crate::impl_def!(PortDef, PortDefBuilder, PortAttribute);

/// Builder for [`PortDef`]
#[derive(Debug, Default)]
pub struct PortDefBuilder {
    mode: BuildMode,
    index: FieldSlot<i32>,
    port_type: FieldSlot<String>,
    name: FieldSlot<String>,
}

impl PortDefBuilder {
    #[must_use]
    pub fn set_index(mut self, index: i32) -> Self {
        self.index.set(index);
        self
    }

    #[must_use]
    pub fn set_index_from<E: Into<SupplyError>>(
        mut self,
        index: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.index.set_from(index);
        self
    }

    #[must_use]
    pub fn set_port_type(mut self, port_type: impl Into<String>) -> Self {
        self.port_type.set(port_type.into());
        self
    }

    #[must_use]
    pub fn set_port_type_from<E: Into<SupplyError>>(
        mut self,
        port_type: impl FallibleSupplier<String, E>,
    ) -> Self {
        self.port_type.set_from(port_type);
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
}

impl DefBuilder for PortDefBuilder {
    type Def = PortDef;

    fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    fn build(self) -> Result<PortDef, BuildError> {
        let mut a = RecordAssembler::<PortDef>::new(self.mode);
        let index = a.required(PortAttribute::Index, self.index, || 0);
        let port_type = a.required(PortAttribute::PortType, self.port_type, String::new);
        let name = a.optional(PortAttribute::Name, self.name);
        Ok(PortDef {
            index,
            port_type,
            name,
            load_exception_tree: Arc::new(a.finish()?),
        })
    }
}
