//! Record and builder traits
//!
//! Implemented by every concrete record shape and its builder.

use std::sync::Arc;

use wfdef_tree::{ExceptionTree, LoadExceptionTree, LoadPath, SupplyError, TreeKey};

use crate::error::BuildError;
use crate::shape::{BuildMode, Shape};

/// Attribute enum of a record's shape
pub type AttributeOf<D> = <<D as Def>::Shape as Shape>::Attribute;

/// Immutable record reconstructed from settings
pub trait Def: Sized {
    /// Shape descriptor
    type Shape: Shape;

    /// Builder producing this record
    type Builder: DefBuilder<Def = Self>;

    /// Tree of everything that failed while loading this record
    fn load_exception_tree(&self) -> &Arc<ExceptionTree<AttributeOf<Self>>>;

    /// Fresh lenient builder
    fn builder() -> Self::Builder {
        Self::Builder::default()
    }

    /// True if this record or anything below it failed to load
    fn has_exceptions(&self) -> bool {
        self.load_exception_tree().has_exceptions()
    }

    /// True if `attribute` or anything below it failed to load
    fn has_exceptions_at(&self, attribute: AttributeOf<Self>) -> bool {
        self.load_exception_tree().has_exceptions_at(&attribute)
    }

    /// Failure recorded for `attribute` itself
    fn supply_exception(&self, attribute: AttributeOf<Self>) -> Option<&SupplyError> {
        self.load_exception_tree().supply_exception_at(&attribute)
    }

    /// Subtree of `attribute`, present only if it has exceptions
    fn exception_tree(&self, attribute: AttributeOf<Self>) -> Option<&dyn LoadExceptionTree> {
        self.load_exception_tree().exception_tree(&attribute)
    }

    /// Subtree of `attribute` as a tree keyed by `C`
    fn exception_tree_as<C: TreeKey>(
        &self,
        attribute: AttributeOf<Self>,
    ) -> Option<&ExceptionTree<C>> {
        self.load_exception_tree().exception_tree_as(&attribute)
    }

    /// All failures, own fields before nested ones, in declaration order
    fn flattened_load_exceptions(&self) -> Vec<SupplyError> {
        self.load_exception_tree().flattened_load_exceptions()
    }

    /// All failures with their path from this record
    fn flattened_with_paths(&self) -> Vec<(LoadPath, SupplyError)> {
        self.load_exception_tree().flattened_with_paths()
    }
}

/// Mutable accumulator for a [`Def`]
pub trait DefBuilder: Default {
    /// Record produced by [`DefBuilder::build`]
    type Def: Def;

    /// Switch construction mode
    #[must_use]
    fn with_mode(self, mode: BuildMode) -> Self;

    /// Opt into fail-fast construction
    #[must_use]
    fn strict(self) -> Self {
        self.with_mode(BuildMode::Strict)
    }

    /// Produce the record and its exception tree
    ///
    /// # Errors
    /// Only in strict mode, when a required field has no real value.
    fn build(self) -> Result<Self::Def, BuildError>;
}
