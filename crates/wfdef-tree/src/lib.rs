//! wfdef Exception Trees
//!
//! Sparse trees recording which parts of a loaded record had to be replaced
//! by defaults, and why.
//!
//! # Core Concepts
//!
//! - [`SupplyError`]: captured cause of a failed value supplier
//! - [`Supplied`]: a supplier resolved against a default
//! - [`ExceptionTree<K>`]: node keyed by `K` holding its own failure and failing children
//! - [`LoadExceptionTree`]: type-erased view used for heterogeneous children
//! - [`HasLoadExceptionTree`]: implemented by values that carry a tree
//! - [`LoadPath`]: dotted address of a node from its root record
//!
//! # Example
//!
//! ```rust
//! use wfdef_tree::{ExceptionTree, SupplyError};
//!
//! let mut builder = ExceptionTree::<&str>::builder();
//! builder.attach_error("width", SupplyError::msg("not an int"));
//! let tree = builder.build();
//!
//! assert!(tree.has_exceptions_at(&"width"));
//! assert_eq!(tree.flattened_load_exceptions().len(), 1);
//! ```

#![warn(unreachable_pub)]

mod error;
mod path;
mod supply;
mod tree;

pub use error::SupplyError;
pub use path::{LoadPath, PathError};
pub use supply::{FallibleSupplier, Supplied};
pub use tree::{
    empty_tree, is_empty_singleton, ExceptionTree, ExceptionTreeBuilder, HasLoadExceptionTree,
    LeafExceptionTree, LoadExceptionTree, TreeKey,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
