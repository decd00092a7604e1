//! Loader configuration

use serde::{Deserialize, Serialize};
use wfdef_builder::BuildMode;
use wfdef_settings::{SettingsError, SettingsTree};

/// Default cap on exceptions written to the log and to reports
pub const DEFAULT_REPORT_LIMIT: usize = 100;

/// How workflows are loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Construction mode for every record
    pub mode: BuildMode,
    /// Maximum exceptions to log and report; `None` for all
    pub report_limit: Option<usize>,
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            mode: BuildMode::Lenient,
            report_limit: Some(DEFAULT_REPORT_LIMIT),
        }
    }
}

impl LoadConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With construction mode
    #[inline]
    #[must_use]
    pub fn with_mode(mut self, mode: BuildMode) -> Self {
        self.mode = mode;
        self
    }

    /// Strict construction
    #[inline]
    #[must_use]
    pub fn strict(self) -> Self {
        self.with_mode(BuildMode::Strict)
    }

    /// With report limit
    #[inline]
    #[must_use]
    pub fn with_report_limit(mut self, limit: Option<usize>) -> Self {
        self.report_limit = limit;
        self
    }

    /// Read from the `load` subtree of `settings`, defaults when absent
    ///
    /// # Errors
    /// The subtree exists but does not describe a configuration.
    pub fn from_settings(settings: &SettingsTree) -> Result<Self, SettingsError> {
        match settings.get_typed("load") {
            Err(e) if e.is_missing() => Ok(Self::default()),
            other => other,
        }
    }
}
