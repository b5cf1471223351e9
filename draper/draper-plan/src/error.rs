//! Error types for laminate plan loading and compilation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that can occur while loading or compiling a laminate plan.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A datum's samples are malformed (too few, or x not strictly increasing).
    #[error("invalid datum {name}: {reason}")]
    InvalidDatum {
        /// Name of the datum.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// An operator token was not recognized.
    #[error("unknown operator: `{token}`")]
    UnknownOperator {
        /// The unrecognized token.
        token: String,
    },

    /// An operator was paired with an operand of the wrong shape.
    #[error("operator {operator} cannot take {operand} operand")]
    OperandArityMismatch {
        /// The operator token.
        operator: String,
        /// Description of the operand shape.
        operand: String,
    },

    /// A thickness expression failed to parse.
    #[error("parse error in `{expression}` at offset {offset}: {message}")]
    ParseError {
        /// The offending expression text.
        expression: String,
        /// Byte offset of the failure.
        offset: usize,
        /// What the parser expected.
        message: String,
    },

    /// An expression references a field absent from the evaluation table.
    #[error("unknown field in expression: {name}")]
    UnknownField {
        /// Name of the missing field.
        name: String,
    },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML document error.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON document error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document extension is not a supported plan format.
    #[error("unknown plan format: .{extension}")]
    UnknownFormat {
        /// The unrecognized extension.
        extension: String,
    },
}

impl PlanError {
    /// Create an invalid-datum error.
    #[must_use]
    pub fn invalid_datum(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDatum {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an unknown-operator error.
    #[must_use]
    pub fn unknown_operator(token: impl Into<String>) -> Self {
        Self::UnknownOperator {
            token: token.into(),
        }
    }

    /// Create an operand-arity error.
    #[must_use]
    pub fn operand_arity(operator: impl Into<String>, operand: impl Into<String>) -> Self {
        Self::OperandArityMismatch {
            operator: operator.into(),
            operand: operand.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PlanError::invalid_datum("te", "needs at least two samples");
        assert!(format!("{err}").contains("te"));

        let err = PlanError::unknown_operator("~=");
        assert!(format!("{err}").contains("~="));

        let err = PlanError::operand_arity("in_range", "scalar");
        assert!(format!("{err}").contains("in_range"));
    }
}
