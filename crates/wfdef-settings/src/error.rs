//! Settings errors

use std::path::PathBuf;

/// Failures reading a settings tree
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Key not present
    #[error("no entry '{key}' in {path}")]
    Missing { path: String, key: String },

    /// Entry present but of another type
    #[error("entry '{key}' in {path}: expected {expected}, found {found}")]
    TypeMismatch {
        path: String,
        key: String,
        expected: &'static str,
        found: &'static str,
    },

    /// Number does not fit the requested type
    #[error("entry '{key}' in {path}: {value} out of range for {expected}")]
    OutOfRange {
        path: String,
        key: String,
        value: String,
        expected: &'static str,
    },

    /// Subtree does not deserialize into the requested type
    #[error("entry '{key}' in {path}: {source}")]
    Deserialize {
        path: String,
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Malformed JSON document
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    /// Malformed YAML document
    #[error("invalid YAML: {0}")]
    InvalidYaml(#[from] serde_yaml::Error),

    /// Document root is not a mapping
    #[error("settings root must be an object, found {0}")]
    NotAnObject(&'static str),

    /// File extension not recognised
    #[error("unsupported settings format: '{0}' (expected json, yaml or yml)")]
    UnsupportedFormat(String),

    /// IO error reading a settings file
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SettingsError {
    /// True if the entry simply does not exist
    #[inline]
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing { .. })
    }

    /// True for type and range mismatches of an existing entry
    #[inline]
    #[must_use]
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. } | Self::OutOfRange { .. })
    }

    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
