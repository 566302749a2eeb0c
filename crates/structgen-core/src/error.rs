//! Error types for structgen runs

use crate::value::ShapeKind;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for generation operations
pub type GenerateResult<T> = Result<T, GenerateError>;

/// Error type for generation runs
///
/// Unresolved relationships are not errors; they degrade to placeholders and are
/// reported on the generated output instead.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// A dataset was not an array, slice, or vec
    #[error("dataset {dataset} is not a sequence (got {kind})")]
    NotASequence { dataset: String, kind: ShapeKind },

    /// A dataset had no records
    #[error("dataset {dataset} is empty")]
    EmptySequence { dataset: String },

    /// Dataset elements are not structs (or pointers to structs), or mix several kinds
    #[error("dataset {dataset} has unsupported element kind {kind}")]
    UnsupportedElementKind { dataset: String, kind: String },

    /// The assembled token stream did not parse as a Rust file
    #[error("render error: {0}")]
    Render(String),

    /// Writing the output file failed
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration could not be parsed
    #[error("configuration error: {0}")]
    Config(String),
}

impl GenerateError {
    /// Whether the run failed before anything was rendered
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GenerateError::NotASequence { .. }
                | GenerateError::EmptySequence { .. }
                | GenerateError::UnsupportedElementKind { .. }
        )
    }
}

impl From<serde_json::Error> for GenerateError {
    fn from(err: serde_json::Error) -> Self {
        GenerateError::Config(err.to_string())
    }
}

impl From<toml::de::Error> for GenerateError {
    fn from(err: toml::de::Error) -> Self {
        GenerateError::Config(err.to_string())
    }
}

#[cfg(test)]
#[path = "error/error_tests.rs"]
mod error_tests;
