//! Error types for the draping engine.

use draper_grid::GridError;
use draper_plan::PlanError;
use thiserror::Error;

/// Result type alias for draping operations.
pub type DrapeResult<T> = Result<T, DrapeError>;

/// Errors that can occur while validating or draping a laminate plan.
#[derive(Debug, Error)]
pub enum DrapeError {
    /// A ply references a material absent from the database.
    #[error("unknown material: {name}")]
    UnknownMaterial {
        /// The missing material name.
        name: String,
    },

    /// A required field exists neither as cell nor as point data.
    #[error("unknown field: {name}")]
    UnknownField {
        /// The missing field name.
        name: String,
    },

    /// A condition operand or thickness spec references a missing datum.
    #[error("unknown datum: {name}")]
    UnknownDatum {
        /// The missing datum name.
        name: String,
    },

    /// Two outputs would be written under the same cell-array name.
    #[error("duplicate output name: {name}")]
    DuplicatePlyName {
        /// The colliding name.
        name: String,
    },

    /// The grid contains no cells.
    #[error("grid contains no cells")]
    EmptyMesh,

    /// A plan-level error (datum shape, operator, operand arity, expression).
    #[error(transparent)]
    Plan(PlanError),

    /// A grid-level error (array types, lengths, I/O).
    #[error(transparent)]
    Grid(GridError),
}

impl DrapeError {
    /// Create an unknown-material error.
    #[must_use]
    pub fn unknown_material(name: impl Into<String>) -> Self {
        Self::UnknownMaterial { name: name.into() }
    }

    /// Create an unknown-field error.
    #[must_use]
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField { name: name.into() }
    }

    /// Create an unknown-datum error.
    #[must_use]
    pub fn unknown_datum(name: impl Into<String>) -> Self {
        Self::UnknownDatum { name: name.into() }
    }
}

impl From<GridError> for DrapeError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::UnknownField { name } => Self::UnknownField { name },
            GridError::EmptyMesh => Self::EmptyMesh,
            other => Self::Grid(other),
        }
    }
}

impl From<PlanError> for DrapeError {
    fn from(err: PlanError) -> Self {
        match err {
            PlanError::UnknownField { name } => Self::UnknownField { name },
            other => Self::Plan(other),
        }
    }
}
