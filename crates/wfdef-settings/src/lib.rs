//! wfdef Settings Trees
//!
//! The untyped, hierarchical key-value store that workflow definitions are
//! loaded from.
//!
//! # Core Concepts
//!
//! - [`SettingsRead`]: the read contract consumed by loaders (`has`, `get_<type>`, `get_config`)
//! - [`SettingsTree`]: JSON/YAML backed implementation preserving document order
//! - [`SettingsError`]: missing keys, type mismatches, malformed documents
//!
//! # Example
//!
//! ```rust
//! use wfdef_settings::{SettingsRead, SettingsTree};
//!
//! let settings = SettingsTree::from_json(r#"{"id": 3, "name": "Row Filter"}"#)?;
//! assert_eq!(settings.get_int("id")?, 3);
//! assert!(settings.get_int("name").unwrap_err().is_type_mismatch());
//! # Ok::<(), wfdef_settings::SettingsError>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

mod error;
mod read;
mod tree;

pub use error::SettingsError;
pub use read::SettingsRead;
pub use tree::SettingsTree;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
