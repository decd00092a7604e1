//! Free-text annotations, on the canvas or attached to a node

use std::sync::Arc;

use serde::Serialize;
use wfdef_builder::{
    BuildError, BuildMode, Def, DefBuilder, FieldKind, FieldSlot, FieldSpec, ListSlot,
    RecordAssembler, Shape,
};
use wfdef_tree::{ExceptionTree, FallibleSupplier, SupplyError};

use crate::bounds::{BoundsAttribute, BoundsDef};
use crate::style_range::StyleRangeDef;

/// Fields of [`AnnotationDef`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum AnnotationAttribute {
    Text,
    Bounds,
    BackgroundColor,
    BorderSize,
    Alignment,
    StyleRanges,
}

/// Annotation text, placement and styling
#[derive(Debug, Clone, Serialize)]
pub struct AnnotationDef {
    text: String,
    bounds: BoundsDef,
    #[serde(skip_serializing_if = "Option::is_none")]
    background_color: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    border_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    alignment: Option<String>,
    style_ranges: Vec<StyleRangeDef>,
    #[serde(skip)]
    load_exception_tree: Arc<ExceptionTree<AnnotationAttribute>>,
}

impl AnnotationDef {
    /// Empty annotation standing in for one that failed to load
    #[must_use]
    pub fn placeholder() -> Self {
        Self {
            text: String::new(),
            bounds: BoundsDef::placeholder(),
            background_color: None,
            border_size: None,
            alignment: None,
            style_ranges: Vec::new(),
            load_exception_tree: Arc::default(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn bounds(&self) -> &BoundsDef {
        &self.bounds
    }

    #[must_use]
    pub fn background_color(&self) -> Option<i32> {
        self.background_color
    }

    #[must_use]
    pub fn border_size(&self) -> Option<i32> {
        self.border_size
    }

    #[must_use]
    pub fn alignment(&self) -> Option<&str> {
        self.alignment.as_deref()
    }

    #[must_use]
    pub fn style_ranges(&self) -> &[StyleRangeDef] {
        &self.style_ranges
    }

    #[must_use]
    pub fn text_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(AnnotationAttribute::Text)
    }

    #[must_use]
    pub fn bounds_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(AnnotationAttribute::Bounds)
    }

    /// Failures inside the bounds record
    #[must_use]
    pub fn bounds_exception_tree(&self) -> Option<&ExceptionTree<BoundsAttribute>> {
        self.exception_tree_as(AnnotationAttribute::Bounds)
    }

    #[must_use]
    pub fn background_color_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(AnnotationAttribute::BackgroundColor)
    }

    #[must_use]
    pub fn border_size_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(AnnotationAttribute::BorderSize)
    }

    #[must_use]
    pub fn alignment_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(AnnotationAttribute::Alignment)
    }

    /// Bulk failure of the style range list
    #[must_use]
    pub fn style_ranges_supply_exception(&self) -> Option<&SupplyError> {
        self.supply_exception(AnnotationAttribute::StyleRanges)
    }

    /// Per-index failures of the style range list
    #[must_use]
    pub fn style_ranges_exception_tree(&self) -> Option<&ExceptionTree<usize>> {
        self.exception_tree_as(AnnotationAttribute::StyleRanges)
    }
}

impl PartialEq for AnnotationDef {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
            && self.bounds == other.bounds
            && self.background_color == other.background_color
            && self.border_size == other.border_size
            && self.alignment == other.alignment
            && self.style_ranges == other.style_ranges
    }
}

impl Shape for AnnotationDef {
    type Attribute = AnnotationAttribute;
    const NAME: &'static str = "AnnotationDef";
    const FIELDS: &'static [FieldSpec<AnnotationAttribute>] = &[
        FieldSpec::required(AnnotationAttribute::Text, FieldKind::Scalar),
        FieldSpec::required(AnnotationAttribute::Bounds, FieldKind::Record),
        FieldSpec::optional(AnnotationAttribute::BackgroundColor, FieldKind::Scalar),
        FieldSpec::optional(AnnotationAttribute::BorderSize, FieldKind::Scalar),
        FieldSpec::optional(AnnotationAttribute::Alignment, FieldKind::Scalar),
        FieldSpec::optional(AnnotationAttribute::StyleRanges, FieldKind::List),
    ];
}

crate::impl_def!(AnnotationDef, AnnotationDefBuilder, AnnotationAttribute);

/// Builder for [`AnnotationDef`]
#[derive(Debug, Default)]
pub struct AnnotationDefBuilder {
    mode: BuildMode,
    text: FieldSlot<String>,
    bounds: FieldSlot<BoundsDef>,
    background_color: FieldSlot<i32>,
    border_size: FieldSlot<i32>,
    alignment: FieldSlot<String>,
    style_ranges: ListSlot<StyleRangeDef>,
}

impl AnnotationDefBuilder {
    #[must_use]
    pub fn set_text(mut self, text: impl Into<String>) -> Self {
        self.text.set(text.into());
        self
    }

    #[must_use]
    pub fn set_text_from<E: Into<SupplyError>>(
        mut self,
        text: impl FallibleSupplier<String, E>,
    ) -> Self {
        self.text.set_from(text);
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
    pub fn set_background_color(mut self, color: i32) -> Self {
        self.background_color.set(color);
        self
    }

    #[must_use]
    pub fn set_background_color_from<E: Into<SupplyError>>(
        mut self,
        color: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.background_color.set_from(color);
        self
    }

    #[must_use]
    pub fn set_border_size(mut self, size: i32) -> Self {
        self.border_size.set(size);
        self
    }

    #[must_use]
    pub fn set_border_size_from<E: Into<SupplyError>>(
        mut self,
        size: impl FallibleSupplier<i32, E>,
    ) -> Self {
        self.border_size.set_from(size);
        self
    }

    #[must_use]
    pub fn set_alignment(mut self, alignment: impl Into<String>) -> Self {
        self.alignment.set(alignment.into());
        self
    }

    #[must_use]
    pub fn set_alignment_from<E: Into<SupplyError>>(
        mut self,
        alignment: impl FallibleSupplier<String, E>,
    ) -> Self {
        self.alignment.set_from(alignment);
        self
    }

    #[must_use]
    pub fn set_style_ranges(mut self, ranges: Vec<StyleRangeDef>) -> Self {
        self.style_ranges.set(ranges);
        self
    }

    #[must_use]
    pub fn set_style_ranges_from<E: Into<SupplyError>>(
        mut self,
        ranges: impl FallibleSupplier<Vec<StyleRangeDef>, E>,
    ) -> Self {
        self.style_ranges.set_from(ranges);
        self
    }

    #[must_use]
    pub fn add_to_style_ranges(mut self, range: StyleRangeDef) -> Self {
        self.style_ranges.add(range);
        self
    }

    #[must_use]
    pub fn add_to_style_ranges_from<E: Into<SupplyError>>(
        mut self,
        range: impl FallibleSupplier<StyleRangeDef, E>,
        fallback: StyleRangeDef,
    ) -> Self {
        self.style_ranges.add_from(range, fallback);
        self
    }
}

impl DefBuilder for AnnotationDefBuilder {
    type Def = AnnotationDef;

    fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    fn build(self) -> Result<AnnotationDef, BuildError> {
        let mut a = RecordAssembler::<AnnotationDef>::new(self.mode);
        let text = a.required(AnnotationAttribute::Text, self.text, String::new);
        let bounds = a.required(
            AnnotationAttribute::Bounds,
            self.bounds,
            BoundsDef::placeholder,
        );
        let background_color =
            a.optional(AnnotationAttribute::BackgroundColor, self.background_color);
        let border_size = a.optional(AnnotationAttribute::BorderSize, self.border_size);
        let alignment = a.optional(AnnotationAttribute::Alignment, self.alignment);
        let style_ranges = a.list(AnnotationAttribute::StyleRanges, self.style_ranges);
        Ok(AnnotationDef {
            text,
            bounds,
            background_color,
            border_size,
            alignment,
            style_ranges,
            load_exception_tree: Arc::new(a.finish()?),
        })
    }
}
