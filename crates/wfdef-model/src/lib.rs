//! Workflow definitions and their loaders
//!
//! Each record shape ([`WorkflowDef`], [`NodeDef`], ...) comes with a thin
//! builder over the generic engine in `wfdef-builder`, and a loader in
//! [`load`] that fills the builder from a settings subtree.
//!
//! ```
//! use wfdef_builder::Def;
//! use wfdef_model::{load_workflow, LoadConfig};
//! use wfdef_settings::SettingsTree;
//!
//! let settings = SettingsTree::from_json(r#"{
//!     "name": "etl",
//!     "version": "1.2",
//!     "nodes": {
//!         "node_1": {"id": 1, "name": "CSV Reader", "kind": "native", "bounds": [0, 0, 10, 10]},
//!         "node_2": {"id": 2, "name": "Row Filter", "kind": "native", "bounds": "oops"}
//!     }
//! }"#)?;
//!
//! let workflow = load_workflow(&settings, &LoadConfig::default())?;
//! assert_eq!(workflow.nodes().len(), 2);
//! let paths: Vec<String> = workflow
//!     .flattened_with_paths()
//!     .into_iter()
//!     .map(|(path, _)| path.to_string())
//!     .collect();
//! assert_eq!(paths, ["nodes.2.bounds"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

/// Trait impls shared by every record: exposing the tree to parents and
/// binding the shape to its builder
macro_rules! impl_def {
    ($def:ty, $builder:ty, $attribute:ty) => {
        impl ::wfdef_tree::HasLoadExceptionTree for $def {
            fn as_load_exception_tree(
                &self,
            ) -> Option<::std::sync::Arc<dyn ::wfdef_tree::LoadExceptionTree>> {
                let tree: ::std::sync::Arc<dyn ::wfdef_tree::LoadExceptionTree> =
                    self.load_exception_tree.clone();
                Some(tree)
            }
        }

        impl ::wfdef_builder::Def for $def {
            type Shape = $def;
            type Builder = $builder;

            fn load_exception_tree(
                &self,
            ) -> &::std::sync::Arc<::wfdef_tree::ExceptionTree<$attribute>> {
                &self.load_exception_tree
            }
        }
    };
}
pub(crate) use impl_def;

pub mod annotation;
pub mod bounds;
pub mod config;
pub mod connection;
pub mod coordinate;
pub mod error;
pub mod load;
pub mod node;
pub mod port;
pub mod report;
pub mod style_range;
pub mod workflow;

pub use annotation::{AnnotationAttribute, AnnotationDef, AnnotationDefBuilder};
pub use bounds::{BoundsAttribute, BoundsDef, BoundsDefBuilder};
pub use config::{LoadConfig, DEFAULT_REPORT_LIMIT};
pub use connection::{ConnectionAttribute, ConnectionDef, ConnectionDefBuilder};
pub use coordinate::{CoordinateAttribute, CoordinateDef, CoordinateDefBuilder};
pub use error::LoadError;
pub use load::{
    load_annotation, load_bounds, load_connection, load_coordinate, load_node, load_port,
    load_style_range, load_workflow, load_workflow_file,
};
pub use node::{NodeAttribute, NodeDef, NodeDefBuilder, NodeKind};
pub use port::{PortAttribute, PortDef, PortDefBuilder};
pub use report::{LoadReport, ReportedException};
pub use style_range::{StyleRangeAttribute, StyleRangeDef, StyleRangeDefBuilder};
pub use workflow::{WorkflowAttribute, WorkflowDef, WorkflowDefBuilder};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
