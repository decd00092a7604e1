//! Scalar and record field slots

use wfdef_tree::{FallibleSupplier, SupplyError};

/// Builder storage for a single field
///
/// Holds the value set so far and the failure of the last supplier, if it
/// failed. A failed supplier leaves the field at its default: `None` here,
/// which the assembler turns into `None` (optional) or the shape's
/// placeholder (required).
#[derive(Debug, Clone)]
pub struct FieldSlot<T> {
    value: Option<T>,
    error: Option<SupplyError>,
}

impl<T> FieldSlot<T> {
    /// Unset slot
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            value: None,
            error: None,
        }
    }

    /// Store `value`, clearing any recorded failure
    #[inline]
    pub fn set(&mut self, value: T) {
        self.value = Some(value);
        self.error = None;
    }

    /// Store the supplied value, or reset to the default and record the failure
    ///
    /// Returns `true` if the supplier succeeded.
    pub fn set_from<E, F>(&mut self, supplier: F) -> bool
    where
        F: FallibleSupplier<T, E>,
        E: Into<SupplyError>,
    {
        match supplier() {
            Ok(value) => {
                self.set(value);
                true
            }
            Err(e) => {
                self.value = None;
                self.error = Some(e.into());
                false
            }
        }
    }

    /// Current value, if any
    #[inline]
    #[must_use]
    pub fn value(&self) -> Option<&T> {
        self.value.as_ref()
    }

    /// Failure of the last supplier
    #[inline]
    #[must_use]
    pub fn error(&self) -> Option<&SupplyError> {
        self.error.as_ref()
    }

    /// True if the slot holds a real value
    #[inline]
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.value.is_some()
    }

    pub(crate) fn into_parts(self) -> (Option<T>, Option<SupplyError>) {
        (self.value, self.error)
    }
}

impl<T> Default for FieldSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
