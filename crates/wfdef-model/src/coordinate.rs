//! Canvas coordinates (connection bendpoints)

use std::sync::Arc;

use serde::Serialize;
use wfdef_builder::{
    BuildError, BuildMode, Def, DefBuilder, FieldKind, FieldSlot, FieldSpec, RecordAssembler, Shape,
};
use wfdef_tree::{ExceptionTree, FallibleSupplier, SupplyError};

/// Fields of [`CoordinateDef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum CoordinateAttribute {
    X,
    Y,
}

/// A point on the workflow canvas
#[derive(Debug, Clone, Serialize)]
pub struct CoordinateDef {
    x: i32,
    y: i32,
    #[serde(skip)]
    load_exception_tree: Arc<ExceptionTree<CoordinateAttribute>>,
}

impl CoordinateDef {
    /// Coordinate with no load history
    #[must_use]
    pub fn new(x: i32, y: i32) -> Self {
        Self {
            x,
            y,
            load_exception_tree: Arc::default(),
        }
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    #[must_use]
    pub fn x_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(CoordinateAttribute::X)
    }

    #[must_use]
    pub fn y_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(CoordinateAttribute::Y)
    }
}

impl PartialEq for CoordinateDef {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Shape for CoordinateDef {
    type Attribute = CoordinateAttribute;
    const NAME: &'static str = "CoordinateDef";
    const FIELDS: &'static [FieldSpec<CoordinateAttribute>] = &[
        FieldSpec::required(CoordinateAttribute::X, FieldKind::Scalar),
        FieldSpec::required(CoordinateAttribute::Y, FieldKind::Scalar),
    ];
}

crate::impl_def!(CoordinateDef, CoordinateDefBuilder, CoordinateAttribute);

/// Builder for [`CoordinateDef`]
#[derive(Debug, Default)]
pub struct CoordinateDefBuilder {
    mode: BuildMode,
    x: FieldSlot<i32>,
    y: FieldSlot<i32>,
}

impl CoordinateDefBuilder {
    #[must_use]
    pub fn set_x(mut self, x: i32) -> Self {
        self.x.set(x);
        self
    }

    #[must_use]
    pub fn set_x_from<E: Into<SupplyError>>(mut self, x: impl FallibleSupplier<i32, E>) -> Self {
        self.x.set_from(x);
        self
    }

    #[must_use]
    pub fn set_y(mut self, y: i32) -> Self {
        self.y.set(y);
        self
    }

    #[must_use]
    pub fn set_y_from<E: Into<SupplyError>>(mut self, y: impl FallibleSupplier<i32, E>) -> Self {
        self.y.set_from(y);
        self
    }
}

impl DefBuilder for CoordinateDefBuilder {
    type Def = CoordinateDef;

    fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    fn build(self) -> Result<CoordinateDef, BuildError> {
        let mut a = RecordAssembler::<CoordinateDef>::new(self.mode);
        let x = a.required(CoordinateAttribute::X, self.x, || 0);
        let y = a.required(CoordinateAttribute::Y, self.y, || 0);
        Ok(CoordinateDef {
            x,
            y,
            load_exception_tree: Arc::new(a.finish()?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::Corrupt;
    use wfdef_builder::Def;

    #[test]
    fn failed_supplier_keeps_placeholder_and_records_cause() {
        let c = CoordinateDef::builder()
            .set_x(4)
            .set_y_from(|| Err::<i32, _>(Corrupt("y")))
            .build()
            .unwrap();
        assert_eq!((c.x(), c.y()), (4, 0));
        assert!(c.x_supply_exception().is_none());
        assert_eq!(c.y_supply_exception().unwrap().to_string(), "corrupt y");
    }

    #[test]
    fn later_set_clears_recorded_failure() {
        let c = CoordinateDef::builder()
            .set_x_from(|| Err::<i32, _>(Corrupt("x")))
            .set_x(7)
            .set_y(1)
            .build()
            .unwrap();
        assert_eq!(c.x(), 7);
        assert!(!c.has_exceptions());
    }

    #[test]
    fn equality_ignores_load_history() {
        let loaded = CoordinateDef::builder()
            .set_x(0)
            .set_y_from(|| Err::<i32, _>(Corrupt("y")))
            .build()
            .unwrap();
        assert_eq!(loaded, CoordinateDef::new(0, 0));
    }
}
