//! Shape descriptors
//!
//! Every record shape declares its fields once; the assembler uses the
//! declaration to decide which fields strict mode requires.

use serde::{Deserialize, Serialize};
use wfdef_tree::TreeKey;

/// Construction mode of a builder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuildMode {
    /// Substitute defaults and record every failure (default)
    #[default]
    Lenient,
    /// Fail `build()` when a required field has no real value
    Strict,
}

impl BuildMode {
    /// True for [`BuildMode::Strict`]
    #[inline]
    #[must_use]
    pub fn is_strict(self) -> bool {
        matches!(self, Self::Strict)
    }
}

/// Container kind of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Leaf value (number, string, array of leaves)
    Scalar,
    /// Nested record with its own tree
    Record,
    /// Ordered sequence, children keyed by index
    List,
    /// Keyed entries, children keyed by map key
    Map,
}

/// Declaration of one field of a shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec<A> {
    /// Tree key of the field
    pub attribute: A,
    /// Must hold a real value in strict mode
    pub required: bool,
    /// Container kind
    pub kind: FieldKind,
}

impl<A> FieldSpec<A> {
    /// Required field
    #[must_use]
    pub const fn required(attribute: A, kind: FieldKind) -> Self {
        Self {
            attribute,
            required: true,
            kind,
        }
    }

    /// Optional field (lists and maps are always optional)
    #[must_use]
    pub const fn optional(attribute: A, kind: FieldKind) -> Self {
        Self {
            attribute,
            required: false,
            kind,
        }
    }
}

/// Static description of a record shape
pub trait Shape {
    /// Field identifier, used as the key of the record's exception tree
    type Attribute: TreeKey + Copy;

    /// Shape name used in diagnostics
    const NAME: &'static str;

    /// All fields, in declaration order
    const FIELDS: &'static [FieldSpec<Self::Attribute>];

    /// Declaration of `attribute`
    fn field(attribute: Self::Attribute) -> Option<&'static FieldSpec<Self::Attribute>> {
        Self::FIELDS.iter().find(|f| f.attribute == attribute)
    }

    /// Required fields, in declaration order
    fn required_fields() -> impl Iterator<Item = Self::Attribute> {
        Self::FIELDS
            .iter()
            .filter(|f| f.required)
            .map(|f| f.attribute)
    }
}
