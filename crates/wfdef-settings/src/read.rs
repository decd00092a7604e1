//! Settings-tree contract
//!
//! The builder layer only ever consumes these reads; every call is what a
//! fallible supplier typically wraps.

use crate::error::SettingsError;

/// Read access to a hierarchical, typed key-value settings tree
pub trait SettingsRead: Sized {
    /// Location of this subtree, for diagnostics
    fn path(&self) -> &str;

    /// True if `key` exists in this subtree
    fn has(&self, key: &str) -> bool;

    /// Child keys in document order
    fn keys(&self) -> Vec<String>;

    /// 32-bit integer entry
    ///
    /// # Errors
    /// Missing key, type mismatch or out-of-range value.
    fn get_int(&self, key: &str) -> Result<i32, SettingsError>;

    /// 64-bit integer entry
    ///
    /// # Errors
    /// Missing key or type mismatch.
    fn get_long(&self, key: &str) -> Result<i64, SettingsError>;

    /// Floating-point entry (integers are widened)
    ///
    /// # Errors
    /// Missing key or type mismatch.
    fn get_double(&self, key: &str) -> Result<f64, SettingsError>;

    /// Boolean entry
    ///
    /// # Errors
    /// Missing key or type mismatch.
    fn get_bool(&self, key: &str) -> Result<bool, SettingsError>;

    /// String entry
    ///
    /// # Errors
    /// Missing key or type mismatch.
    fn get_string(&self, key: &str) -> Result<String, SettingsError>;

    /// Password entry, returned as stored
    ///
    /// # Errors
    /// Missing key or type mismatch.
    fn get_password(&self, key: &str) -> Result<String, SettingsError>;

    /// Array of 32-bit integers
    ///
    /// # Errors
    /// Missing key, or an element of the wrong type.
    fn get_int_array(&self, key: &str) -> Result<Vec<i32>, SettingsError>;

    /// Array of floating-point numbers
    ///
    /// # Errors
    /// Missing key, or an element of the wrong type.
    fn get_double_array(&self, key: &str) -> Result<Vec<f64>, SettingsError>;

    /// Array of strings
    ///
    /// # Errors
    /// Missing key, or an element of the wrong type.
    fn get_string_array(&self, key: &str) -> Result<Vec<String>, SettingsError>;

    /// Nested subtree
    ///
    /// # Errors
    /// Missing key, or the entry is not a subtree.
    fn get_config(&self, key: &str) -> Result<Self, SettingsError>;

    /// Optional read: `Ok(None)` when `key` is absent
    ///
    /// # Errors
    /// Whatever `read` returns for an existing key.
    fn get_optional<T, F>(&self, key: &str, read: F) -> Result<Option<T>, SettingsError>
    where
        F: FnOnce(&Self, &str) -> Result<T, SettingsError>,
    {
        if self.has(key) {
            read(self, key).map(Some)
        } else {
            Ok(None)
        }
    }
}
