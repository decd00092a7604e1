//! Loader errors
//!
//! These surface as the cause of a recorded supply failure, or from
//! [`crate::load::load_workflow_file`] when the file itself is unusable.

use wfdef_builder::BuildError;
use wfdef_settings::SettingsError;

/// Failure to produce one value from a settings subtree
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// Node kind string not recognised
    #[error("unknown node kind '{0}'")]
    UnknownNodeKind(String),

    /// Bounds array without exactly four values
    #[error("bounds must hold [x, y, width, height], found {0} values")]
    BoundsArity(usize),

    /// Settings read failed
    #[error(transparent)]
    Settings(#[from] SettingsError),

    /// Nested record rejected in strict mode
    #[error(transparent)]
    Build(#[from] BuildError),
}

impl LoadError {
    /// True if the underlying settings entry was absent
    #[must_use]
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Settings(e) if e.is_missing())
    }
}
