//! # structgen
//!
//! Generate Rust source declarations that reproduce in-memory record datasets.
//!
//! structgen reflects a collection of records and writes them out as named `static` items,
//! providing:
//! - One item per record, named from the record's identifying fields
//! - Identifier constants and an "all records" collection per dataset
//! - Relationship fields rewritten as references to other generated items
//! - Cyclic relationships between datasets resolved in a single run
//!
//! ## Quick Start
//!
//! ```
//! use structgen::prelude::*;
//!
//! #[derive(Reflect)]
//! pub struct Tag {
//!     pub id: String,
//!     pub slug: String,
//! }
//!
//! let tags = vec![
//!     Tag { id: "t1".into(), slug: "go".into() },
//!     Tag { id: "t2".into(), slug: "rust".into() },
//! ];
//!
//! let mut generator = Generator::new(GeneratorConfig::default(), &tags);
//! let output = generator.render()?;
//!
//! assert!(output.source.contains("pub static TAG_T1"));
//! assert!(output.source.contains("pub static ALL_TAGS"));
//! # Ok::<(), structgen::GenerateError>(())
//! ```
//!
//! ## Relationships
//!
//! ```ignore
//! #[derive(Reflect)]
//! pub struct Post {
//!     pub id: String,
//!     pub tag_slugs: Vec<String>,
//!     #[structgen(source = "tag_slugs")]
//!     pub tags: Vec<&'static Tag>,
//! }
//!
//! Generator::new(GeneratorConfig::default(), &posts)
//!     .reference(&tags)
//!     .generate()?;
//! ```
//!
//! ## Crate Structure
//!
//! This is a facade crate that re-exports from:
//! - [`structgen_core`] - Value model, `Reflect`, configuration, and errors
//! - [`structgen_codegen`] - Literal emission, reference resolution, and rendering
//! - [`structgen_macros`] - `#[derive(Reflect)]`

// Re-export core types
pub use structgen_core::{
    DeclarationStyle, FieldValue, FloatKind, GenerateError, GenerateResult, GenerationPhase,
    GeneratorConfig, IntKind, MapKind, PointerKind, Reflect, Relation, ResolvedConfig, SeqKind,
    ShapeKind, StructRef, StructValue, TypeShape, Value,
};

// Re-export codegen types
pub use structgen_codegen::{
    GeneratedSource, Generator, LiteralEmitter, SkipKind, SkipReason, TypeRenderer,
};

// Re-export the derive macro
pub use structgen_macros::Reflect;

// Re-export common dependencies that generated code needs
pub use chrono;
pub use tracing;

/// Lower-level building blocks for custom emitters
pub mod codegen {
    pub use structgen_codegen::*;
}

/// Prelude module for convenient imports.
///
/// Use `use structgen::prelude::*;` to import commonly used types.
///
/// This includes:
/// - The `Reflect` trait and derive macro
/// - `Generator`, `GeneratorConfig`, and `DeclarationStyle`
/// - Results: `GeneratedSource`, `GenerateError`, `GenerateResult`, `SkipReason`
pub mod prelude {
    pub use crate::{
        DeclarationStyle, GenerateError, GenerateResult, GeneratedSource, Generator,
        GeneratorConfig, Reflect, SkipKind, SkipReason,
    };
}
