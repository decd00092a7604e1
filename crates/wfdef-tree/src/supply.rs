//! Fallible suppliers
//!
//! A supplier is a deferred computation producing a value or an error,
//! typically a single read from a settings tree.

use crate::error::SupplyError;

/// Deferred computation that yields a value or an error
///
/// Implemented for every `FnOnce() -> Result<T, E>`.
pub trait FallibleSupplier<T, E>: FnOnce() -> Result<T, E> {}

impl<F, T, E> FallibleSupplier<T, E> for F where F: FnOnce() -> Result<T, E> {}

/// Result of resolving a supplier against a default
///
/// Holds either the supplied value, or the default together with the
/// captured error.
#[derive(Debug, Clone)]
pub struct Supplied<T> {
    value: T,
    error: Option<SupplyError>,
}

impl<T> Supplied<T> {
    /// Invoke `supplier`, falling back to `default` on failure
    pub fn resolve<E, F>(supplier: F, default: T) -> Self
    where
        F: FallibleSupplier<T, E>,
        E: Into<SupplyError>,
    {
        Self::resolve_with(supplier, || default)
    }

    /// Like [`Supplied::resolve`], computing the default only on failure
    pub fn resolve_with<E, F, D>(supplier: F, default: D) -> Self
    where
        F: FallibleSupplier<T, E>,
        E: Into<SupplyError>,
        D: FnOnce() -> T,
    {
        match supplier() {
            Ok(value) => Self { value, error: None },
            Err(e) => Self {
                value: default(),
                error: Some(e.into()),
            },
        }
    }

    /// Resolve into an optional value: `None` on failure
    pub fn resolve_optional<E, F>(supplier: F) -> Supplied<Option<T>>
    where
        F: FallibleSupplier<T, E>,
        E: Into<SupplyError>,
    {
        Supplied::resolve_with(|| supplier().map(Some), || None)
    }

    /// Resolved value (the default if the supplier failed)
    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    /// Captured failure, if any
    #[inline]
    pub fn error(&self) -> Option<&SupplyError> {
        self.error.as_ref()
    }

    /// True if the supplier succeeded
    #[inline]
    pub fn is_supplied(&self) -> bool {
        self.error.is_none()
    }

    /// Split into value and captured failure
    #[inline]
    pub fn into_parts(self) -> (T, Option<SupplyError>) {
        (self.value, self.error)
    }
}
