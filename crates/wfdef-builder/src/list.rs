//! List field facet
//!
//! A list field can be filled in bulk or element by element, and either way
//! fallibly. Bulk and per-element failures are tracked independently.

use indexmap::IndexMap;
use wfdef_tree::{FallibleSupplier, SupplyError};

/// Builder storage for a list field
#[derive(Debug, Clone)]
pub struct ListSlot<T> {
    items: Vec<T>,
    bulk_error: Option<SupplyError>,
    element_errors: IndexMap<usize, SupplyError>,
}

impl<T> ListSlot<T> {
    /// Empty list
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            bulk_error: None,
            element_errors: IndexMap::new(),
        }
    }

    /// Replace the whole list
    ///
    /// Clears the bulk failure and per-index failures of replaced elements.
    pub fn set(&mut self, items: Vec<T>) {
        self.items = items;
        self.bulk_error = None;
        self.element_errors.clear();
    }

    /// Replace the whole list with the supplied one
    ///
    /// On failure the current items stay untouched and only the bulk failure
    /// is recorded. Returns `true` if the supplier succeeded.
    pub fn set_from<E, F>(&mut self, supplier: F) -> bool
    where
        F: FallibleSupplier<Vec<T>, E>,
        E: Into<SupplyError>,
    {
        match supplier() {
            Ok(items) => {
                self.set(items);
                true
            }
            Err(e) => {
                self.bulk_error = Some(e.into());
                false
            }
        }
    }

    /// Append `value`
    #[inline]
    pub fn add(&mut self, value: T) {
        self.items.push(value);
    }

    /// Append the supplied value, or `fallback` with the failure recorded at
    /// the index the fallback occupies
    ///
    /// Returns `true` if the supplier succeeded.
    pub fn add_from<E, F>(&mut self, supplier: F, fallback: T) -> bool
    where
        F: FallibleSupplier<T, E>,
        E: Into<SupplyError>,
    {
        match supplier() {
            Ok(value) => {
                self.items.push(value);
                true
            }
            Err(e) => {
                self.element_errors.insert(self.items.len(), e.into());
                self.items.push(fallback);
                false
            }
        }
    }

    /// Current items
    #[inline]
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Failure of the last bulk supplier
    #[inline]
    #[must_use]
    pub fn bulk_error(&self) -> Option<&SupplyError> {
        self.bulk_error.as_ref()
    }

    /// Per-index failures
    #[inline]
    #[must_use]
    pub fn element_errors(&self) -> &IndexMap<usize, SupplyError> {
        &self.element_errors
    }

    pub(crate) fn into_parts(
        self,
    ) -> (Vec<T>, Option<SupplyError>, IndexMap<usize, SupplyError>) {
        (self.items, self.bulk_error, self.element_errors)
    }
}

impl<T> Default for ListSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
