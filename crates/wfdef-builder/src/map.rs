//! Map field facet
//!
//! Same policy as the list facet, with failures keyed by map key instead of
//! index.

use indexmap::IndexMap;
use wfdef_tree::{FallibleSupplier, SupplyError, TreeKey};

/// Builder storage for a map field, in insertion order
#[derive(Debug, Clone)]
pub struct MapSlot<K: TreeKey, V> {
    entries: IndexMap<K, V>,
    bulk_error: Option<SupplyError>,
    entry_errors: IndexMap<K, SupplyError>,
}

impl<K: TreeKey, V> MapSlot<K, V> {
    /// Empty map
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
            bulk_error: None,
            entry_errors: IndexMap::new(),
        }
    }

    /// Replace all entries, clearing all recorded failures
    pub fn set(&mut self, entries: IndexMap<K, V>) {
        self.entries = entries;
        self.bulk_error = None;
        self.entry_errors.clear();
    }

    /// Replace all entries with the supplied map
    ///
    /// On failure the current entries stay untouched and only the bulk
    /// failure is recorded. Returns `true` if the supplier succeeded.
    pub fn set_from<E, F>(&mut self, supplier: F) -> bool
    where
        F: FallibleSupplier<IndexMap<K, V>, E>,
        E: Into<SupplyError>,
    {
        match supplier() {
            Ok(entries) => {
                self.set(entries);
                true
            }
            Err(e) => {
                self.bulk_error = Some(e.into());
                false
            }
        }
    }

    /// Insert `value` at `key`, clearing a failure recorded for `key`
    pub fn put(&mut self, key: K, value: V) {
        self.entry_errors.shift_remove(&key);
        self.entries.insert(key, value);
    }

    /// Insert the supplied value, or `fallback` with the failure recorded
    /// under `key`
    ///
    /// Returns `true` if the supplier succeeded.
    pub fn put_from<E, F>(&mut self, key: K, supplier: F, fallback: V) -> bool
    where
        F: FallibleSupplier<V, E>,
        E: Into<SupplyError>,
    {
        match supplier() {
            Ok(value) => {
                self.put(key, value);
                true
            }
            Err(e) => {
                self.entry_errors.insert(key.clone(), e.into());
                self.entries.insert(key, fallback);
                false
            }
        }
    }

    /// Current entries
    #[inline]
    #[must_use]
    pub fn entries(&self) -> &IndexMap<K, V> {
        &self.entries
    }

    /// Failure of the last bulk supplier
    #[inline]
    #[must_use]
    pub fn bulk_error(&self) -> Option<&SupplyError> {
        self.bulk_error.as_ref()
    }

    /// Per-key failures
    #[inline]
    #[must_use]
    pub fn entry_errors(&self) -> &IndexMap<K, SupplyError> {
        &self.entry_errors
    }

    pub(crate) fn into_parts(
        self,
    ) -> (IndexMap<K, V>, Option<SupplyError>, IndexMap<K, SupplyError>) {
        (self.entries, self.bulk_error, self.entry_errors)
    }
}

impl<K: TreeKey, V> Default for MapSlot<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
