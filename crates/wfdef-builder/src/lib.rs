//! wfdef Record Builders
//!
//! Generic engine behind every per-shape builder. A builder accumulates
//! field values, directly or through fallible suppliers, and `build()`
//! turns them into an immutable record plus its exception tree.
//!
//! # Core Concepts
//!
//! - [`Shape`]: static field declarations of a record shape
//! - [`FieldSlot`], [`ListSlot`], [`MapSlot`]: per-field storage with failure bookkeeping
//! - [`RecordAssembler`]: resolves slots and assembles the exception tree
//! - [`BuildMode`]: lenient (collect and default) or strict (fail fast)
//! - [`Def`] / [`DefBuilder`]: traits implemented by records and their builders
//!
//! # Example
//!
//! ```rust,ignore
//! let bounds = BoundsDef::builder()
//!     .set_x(10)
//!     .set_y_from(|| settings.get_int("y"))
//!     .build()?;
//!
//! for e in bounds.flattened_load_exceptions() {
//!     println!("{e}");
//! }
//! ```

#![warn(unreachable_pub)]

mod assemble;
mod def;
mod error;
mod list;
mod map;
mod shape;
mod slot;

pub use assemble::RecordAssembler;
pub use def::{AttributeOf, Def, DefBuilder};
pub use error::{BuildError, IllegalArgumentError};
pub use list::ListSlot;
pub use map::MapSlot;
pub use shape::{BuildMode, FieldKind, FieldSpec, Shape};
pub use slot::FieldSlot;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
