//! structgen-codegen - Emits Rust source for reflected datasets
//!
//! This crate turns [`structgen_core::Value`] trees into Rust declarations:
//! - [`LiteralEmitter`] renders values as expressions
//! - [`TypeRenderer`] renders shapes as type expressions
//! - [`ReferenceEngine`] replaces relationship fields with references to other records
//! - [`Generator`] drives a run over a primary dataset and its reference datasets
//!
//! # Output layout
//!
//! For each dataset, in order: identifier constants, one item per record, and one
//! collection of every record.

pub mod dataset;
pub mod generator;
pub mod identifier;
pub mod link;
pub mod literal;
pub mod naming;
pub mod naming_table;
pub mod reference;
pub mod render;
pub mod types;

pub use dataset::Dataset;
pub use generator::{GeneratedSource, Generator};
pub use identifier::IdentifierResolver;
pub use link::{Edge, LinkGraph};
pub use literal::{LiteralEmitter, RelationResolver};
pub use naming_table::{DatasetNaming, NamingTable};
pub use reference::{ReferenceBinding, ReferenceEngine, Resolution, SkipKind, SkipReason};
pub use render::render_file;
pub use types::TypeRenderer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{GeneratedSource, Generator, SkipKind, SkipReason};
}
