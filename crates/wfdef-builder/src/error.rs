//! Construction errors
//!
//! Only strict mode returns these. Field-level supply failures never
//! surface here; they are recorded in the record's exception tree, as
//! is [`IllegalArgumentError`] for a lenient build's unset required field.

/// Failure to construct a record
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    /// Strict build found required fields without a real value
    #[error("cannot build {shape}: {source}")]
    IllegalState {
        /// Record shape being built
        shape: &'static str,
        /// The offending fields
        #[source]
        source: IllegalArgumentError,
    },
}

impl BuildError {
    /// Missing-required-fields error for `shape`
    #[must_use]
    pub fn missing_required(shape: &'static str, fields: Vec<String>) -> Self {
        Self::IllegalState {
            shape,
            source: IllegalArgumentError { fields },
        }
    }

    /// Shape whose construction failed
    #[inline]
    #[must_use]
    pub fn shape(&self) -> &'static str {
        match self {
            Self::IllegalState { shape, .. } => shape,
        }
    }

    /// Names of the required fields that had no value
    #[inline]
    #[must_use]
    pub fn missing_fields(&self) -> &[String] {
        match self {
            Self::IllegalState { source, .. } => &source.fields,
        }
    }
}

/// Required fields left without a value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("required field(s) without a value: {}", .fields.join(", "))]
pub struct IllegalArgumentError {
    fields: Vec<String>,
}

impl IllegalArgumentError {
    /// A single required field left without a value
    #[must_use]
    pub fn required(field: &impl std::fmt::Display) -> Self {
        Self {
            fields: vec![field.to_string()],
        }
    }

    /// Offending field names, in declaration order
    #[inline]
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }
}
