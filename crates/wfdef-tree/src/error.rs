//! Supply errors
//!
//! A [`SupplyError`] is the recorded cause for why a loaded value is a
//! substituted default rather than the value found in the settings.

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::sync::Arc;

/// Captured failure of a fallible supplier
///
/// Type-erased so that trees built from suppliers with different error types
/// can be flattened into a single list. Cloning is cheap (shared cause).
#[derive(Clone)]
pub struct SupplyError {
    inner: Arc<anyhow::Error>,
}

impl SupplyError {
    /// Wrap a concrete error
    #[inline]
    pub fn new<E>(error: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Self::from_anyhow(anyhow::Error::new(error))
    }

    /// Create from a plain message
    #[inline]
    pub fn msg<M>(message: M) -> Self
    where
        M: Display + Debug + Send + Sync + 'static,
    {
        Self::from_anyhow(anyhow::Error::msg(message))
    }

    /// Adopt an already erased error, keeping its context chain
    #[inline]
    #[must_use]
    pub fn from_anyhow(error: anyhow::Error) -> Self {
        Self {
            inner: Arc::new(error),
        }
    }

    /// Outermost message, without the cause chain
    #[must_use]
    pub fn message(&self) -> String {
        self.inner.to_string()
    }

    /// Lowest-level cause in the chain
    #[must_use]
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        self.inner.root_cause()
    }

    /// Iterate the chain from outermost to root cause
    pub fn chain(&self) -> impl Iterator<Item = &(dyn StdError + 'static)> {
        self.inner.chain()
    }

    /// Attempt to view the outermost error as a concrete type
    #[must_use]
    pub fn downcast_ref<E>(&self) -> Option<&E>
    where
        E: Display + Debug + Send + Sync + 'static,
    {
        self.inner.downcast_ref::<E>()
    }

    /// True if both handles share the same captured cause
    #[inline]
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl<E> From<E> for SupplyError
where
    E: StdError + Send + Sync + 'static,
{
    fn from(error: E) -> Self {
        Self::new(error)
    }
}

impl Display for SupplyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // alternate form prints the whole chain: "outer: inner: root"
        write!(f, "{:#}", self.inner)
    }
}

impl Debug for SupplyError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("SupplyError")
            .field("message", &self.inner.to_string())
            .field("chain_len", &self.inner.chain().count())
            .finish()
    }
}

impl serde::Serialize for SupplyError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}
