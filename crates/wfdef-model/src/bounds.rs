//! Rectangular bounds of nodes and annotations

use std::sync::Arc;

use serde::Serialize;
use wfdef_builder::{
    BuildError, BuildMode, Def, DefBuilder, FieldKind, FieldSlot, FieldSpec, RecordAssembler, Shape,
};
use wfdef_tree::{ExceptionTree, FallibleSupplier, SupplyError};

/// Fields of [`BoundsDef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum BoundsAttribute {
    X,
    Y,
    Width,
    Height,
}

/// Position and size on the canvas
#[derive(Debug, Clone, Serialize)]
pub struct BoundsDef {
    x: i32,
    y: i32,
    width: i32,
    height: i32,
    #[serde(skip)]
    load_exception_tree: Arc<ExceptionTree<BoundsAttribute>>,
}

impl BoundsDef {
    /// Bounds with no load history
    #[must_use]
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            load_exception_tree: Arc::default(),
        }
    }

    /// All-zero bounds used when none could be loaded
    #[must_use]
    pub fn placeholder() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// `[x, y, width, height]`, the persisted array layout
    #[must_use]
    pub fn to_array(&self) -> [i32; 4] {
        [self.x, self.y, self.width, self.height]
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
    pub fn width(&self) -> i32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> i32 {
        self.height
    }

    #[must_use]
    pub fn x_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(BoundsAttribute::X)
    }

    #[must_use]
    pub fn y_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(BoundsAttribute::Y)
    }

    #[must_use]
    pub fn width_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(BoundsAttribute::Width)
    }

    #[must_use]
    pub fn height_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(BoundsAttribute::Height)
    }
}

impl PartialEq for BoundsDef {
    fn eq(&self, other: &Self) -> bool {
        self.to_array() == other.to_array()
    }
}

impl Shape for BoundsDef {
    type Attribute = BoundsAttribute;
    const NAME: &'static str = "BoundsDef";
    const FIELDS: &'static [FieldSpec<BoundsAttribute>] = &[
        FieldSpec::required(BoundsAttribute::X, FieldKind::Scalar),
        FieldSpec::required(BoundsAttribute::Y, FieldKind::Scalar),
        FieldSpec::required(BoundsAttribute::Width, FieldKind::Scalar),
        FieldSpec::required(BoundsAttribute::Height, FieldKind::Scalar),
    ];
}

crate::impl_def!(BoundsDef, BoundsDefBuilder, BoundsAttribute);

/// Builder for [`BoundsDef`]
#[derive(Debug, Default)]
pub struct BoundsDefBuilder {
    mode: BuildMode,
    x: FieldSlot<i32>,
    y: FieldSlot<i32>,
    width: FieldSlot<i32>,
    height: FieldSlot<i32>,
}

impl BoundsDefBuilder {
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

    #[must_use]
    pub fn set_width(mut self, width: i32) -> Self {
        self.width.set(width);
        self
    }

    #[must_use]
    pub fn set_width_from<E: Into<SupplyError>>(
        mut self,
        width: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.width.set_from(width);
        self
    }

    #[must_use]
    pub fn set_height(mut self, height: i32) -> Self {
        self.height.set(height);
        self
    }

    #[must_use]
    pub fn set_height_from<E: Into<SupplyError>>(
        mut self,
        height: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.height.set_from(height);
        self
    }
}

impl DefBuilder for BoundsDefBuilder {
    type Def = BoundsDef;

    fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    fn build(self) -> Result<BoundsDef, BuildError> {
        let mut a = RecordAssembler::<BoundsDef>::new(self.mode);
        let x = a.required(BoundsAttribute::X, self.x, || 0);
        let y = a.required(BoundsAttribute::Y, self.y, || 0);
        let width = a.required(BoundsAttribute::Width, self.width, || 0);
        let height = a.required(BoundsAttribute::Height, self.height, || 0);
        Ok(BoundsDef {
            x,
            y,
            width,
            height,
            load_exception_tree: Arc::new(a.finish()?),
        })
    }
}
