//! Styled text runs inside an annotation

use std::sync::Arc;

use serde::Serialize;
use wfdef_builder::{
    BuildError, BuildMode, Def, DefBuilder, FieldKind, FieldSlot, FieldSpec, RecordAssembler, Shape,
};
use wfdef_tree::{ExceptionTree, FallibleSupplier, SupplyError};

/// Fields of [`StyleRangeDef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum StyleRangeAttribute {
    Start,
    Length,
    FontStyle,
    Color,
}

/// A run of annotation text sharing one style
#[derive(Debug, Clone, Serialize)]
pub struct StyleRangeDef {
    start: i32,
    length: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    font_style: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    color: Option<i32>,
    #[serde(skip)]
    load_exception_tree: Arc<ExceptionTree<StyleRangeAttribute>>,
}

impl StyleRangeDef {
    /// Empty range standing in for one that failed to load
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            start: 0,
            length: 0,
            font_style: None,
            color: None,
            load_exception_tree: Arc::default(),
        }
    }

    #[must_use]
    pub fn start(&self) -> i32 {
        self.start
    }

    #[must_use]
    pub fn length(&self) -> i32 {
        self.length
    }

    /// Exclusive end offset
    #[must_use]
    pub fn end(&self) -> i32 {
        self.start.saturating_add(self.length)
    }

    #[must_use]
    pub fn font_style(&self) -> Option<i32> {
        self.font_style
    }

    #[must_use]
    pub fn color(&self) -> Option<i32> {
        self.color
    }

    #[must_use]
    pub fn start_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(StyleRangeAttribute::Start)
    }

    #[must_use]
    pub fn length_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(StyleRangeAttribute::Length)
    }

    #[must_use]
    pub fn font_style_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(StyleRangeAttribute::FontStyle)
    }

    #[must_use]
    pub fn color_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(StyleRangeAttribute::Color)
    }
}

impl PartialEq for StyleRangeDef {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start
            && self.length == other.length
            && self.font_style == other.font_style
            && self.color == other.color
    }
}

impl Shape for StyleRangeDef {
    type Attribute = StyleRangeAttribute;
    const NAME: &'static str = "StyleRangeDef";
    const FIELDS: &'static [FieldSpec<StyleRangeAttribute>] = &[
        FieldSpec::required(StyleRangeAttribute::Start, FieldKind::Scalar),
        FieldSpec::required(StyleRangeAttribute::Length, FieldKind::Scalar),
        FieldSpec::optional(StyleRangeAttribute::FontStyle, FieldKind::Scalar),
        FieldSpec::optional(StyleRangeAttribute::Color, FieldKind::Scalar),
    ];
}

crate::impl_def!(StyleRangeDef, StyleRangeDefBuilder, StyleRangeAttribute);

/// Builder for [`StyleRangeDef`]
#[derive(Debug, Default)]
pub struct StyleRangeDefBuilder {
    mode: BuildMode,
    start: FieldSlot<i32>,
    length: FieldSlot<i32>,
    font_style: FieldSlot<i32>,
    color: FieldSlot<i32>,
}

impl StyleRangeDefBuilder {
    #[must_use]
    pub fn set_start(mut self, start: i32) -> Self {
        self.start.set(start);
        self
    }

    #[must_use]
    pub fn set_start_from<E: Into<SupplyError>>(
        mut self,
        start: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.start.set_from(start);
        self
    }

    #[must_use]
    pub fn set_length(mut self, length: i32) -> Self {
        self.length.set(length);
        self
    }

    #[must_use]
    pub fn set_length_from<E: Into<SupplyError>>(
        mut self,
        length: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.length.set_from(length);
        self
    }

    #[must_use]
    pub fn set_font_style(mut self, font_style: i32) -> Self {
        self.font_style.set(font_style);
        self
    }

    #[must_use]
    pub fn set_font_style_from<E: Into<SupplyError>>(
        mut self,
        font_style: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.font_style.set_from(font_style);
        self
    }

    #[must_use]
    pub fn set_color(mut self, color: i32) -> Self {
        self.color.set(color);
        self
    }

    #[must_use]
    pub fn set_color_from<E: Into<SupplyError>>(
        mut self,
        color: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.color.set_from(color);
        self
    }
}

impl DefBuilder for StyleRangeDefBuilder {
    type Def = StyleRangeDef;

    fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    fn build(self) -> Result<StyleRangeDef, BuildError> {
        let mut a = RecordAssembler::<StyleRangeDef>::new(self.mode);
        let start = a.required(StyleRangeAttribute::Start, self.start, || 0);
        let length = a.required(StyleRangeAttribute::Length, self.length, || 0);
        let font_style = a.optional(StyleRangeAttribute::FontStyle, self.font_style);
        let color = a.optional(StyleRangeAttribute::Color, self.color);
        Ok(StyleRangeDef {
            start,
            length,
            font_style,
            color,
            load_exception_tree: Arc::new(a.finish()?),
        })
    }
}
