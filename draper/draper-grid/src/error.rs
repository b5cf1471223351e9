//! Error types for grid operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for grid operations.
pub type GridResult<T> = Result<T, GridError>;

/// Errors that can occur while reading, writing, or querying a grid.
#[derive(Debug, Error)]
pub enum GridError {
    /// A named field exists neither as cell data nor as point data.
    #[error("unknown field: {name}")]
    UnknownField {
        /// Name of the missing field.
        name: String,
    },

    /// A field exists but holds the wrong array type for the request.
    #[error("field {name} is not a {expected} array")]
    FieldType {
        /// Name of the field.
        name: String,
        /// The array type the caller asked for.
        expected: &'static str,
    },

    /// An array's length does not match the grid.
    #[error("array {name} has length {got}, grid has {expected} entries")]
    LengthMismatch {
        /// Name of the offending array.
        name: String,
        /// Required length.
        expected: usize,
        /// Actual length.
        got: usize,
    },

    /// The grid contains no cells.
    #[error("grid contains no cells")]
    EmptyMesh,

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// Invalid file content (parse error).
    #[error("invalid VTK content: {message}")]
    InvalidContent {
        /// Description of what was invalid.
        message: String,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GridError {
    /// Create an unknown-field error.
    #[must_use]
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }

    /// Create an `InvalidContent` error with the given message.
    #[must_use]
    pub fn invalid_content(message: impl Into<String>) -> Self {
        Self::InvalidContent {
            message: message.into(),
        }
    }
}
