//! Ply coverage conditions: field, operator, operand.

use crate::error::{PlanError, PlanResult};

/// Comparison operator applied between a cell field and an operand.
///
/// `Eq` and `Ne` compare floats exactly (IEEE-754, no tolerance). That is
/// fragile against computed fields; prefer `InRange` with a tight window when
/// the field is not known to hold exact values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// Strictly less than.
    Lt,
    /// Less than or equal.
    Le,
    /// Strictly greater than.
    Gt,
    /// Greater than or equal.
    Ge,
    /// Exactly equal.
    Eq,
    /// Not equal.
    Ne,
    /// Inside a closed interval `[lo, hi]`.
    InRange,
    /// Outside a closed interval `[lo, hi]`.
    NotInRange,
}

impl CompareOp {
    /// Map a document token to an operator.
    ///
    /// Both symbol tokens (`<`, `<=`, ...) and word tokens (`lt`, `le`, ...)
    /// are accepted.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnknownOperator`] for anything else.
    pub fn from_token(token: &str) -> PlanResult<Self> {
        match token {
            "<" | "lt" => Ok(Self::Lt),
            "<=" | "le" => Ok(Self::Le),
            ">" | "gt" => Ok(Self::Gt),
            ">=" | "ge" => Ok(Self::Ge),
            "==" | "eq" => Ok(Self::Eq),
            "!=" | "ne" => Ok(Self::Ne),
            "in_range" => Ok(Self::InRange),
            "not_in_range" => Ok(Self::NotInRange),
            other => Err(PlanError::unknown_operator(other)),
        }
    }

    /// The canonical document token for this operator.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::InRange => "in_range",
            Self::NotInRange => "not_in_range",
        }
    }

    /// Whether this operator takes a `[lo, hi]` operand.
    #[must_use]
    pub const fn is_range(self) -> bool {
        matches!(self, Self::InRange | Self::NotInRange)
    }

    /// Apply a scalar comparison.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn compare(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Lt => lhs < rhs,
            Self::Le => lhs <= rhs,
            Self::Gt => lhs > rhs,
            Self::Ge => lhs >= rhs,
            Self::Eq => lhs == rhs,
            Self::Ne => lhs != rhs,
            // Range ops never reach scalar comparison.
            Self::InRange | Self::NotInRange => false,
        }
    }

    /// Apply a range test against a closed interval.
    #[must_use]
    pub fn compare_range(self, lhs: f64, lo: f64, hi: f64) -> bool {
        let inside = lhs >= lo && lhs <= hi;
        match self {
            Self::InRange => inside,
            Self::NotInRange => !inside,
            _ => false,
        }
    }
}

/// The right-hand side of a condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// A literal scalar, broadcast over all cells.
    Scalar(f64),
    /// A closed interval, only valid with range operators.
    Range(f64, f64),
    /// A datum name, resolved per cell against the datum's base field.
    Datum(String),
}

impl Operand {
    /// A short description of the operand shape, for diagnostics.
    #[must_use]
    pub const fn shape(&self) -> &'static str {
        match self {
            Self::Scalar(_) => "scalar",
            Self::Range(_, _) => "range",
            Self::Datum(_) => "datum",
        }
    }
}

/// A single coverage predicate over a named cell field.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// The cell field on the left-hand side.
    pub field: String,
    /// The comparison operator.
    pub operator: CompareOp,
    /// The right-hand operand.
    pub operand: Operand,
}

impl Condition {
    /// Check that the operator and operand shapes agree.
    ///
    /// Range operators require a `Range` operand; all other operators take a
    /// `Scalar` or `Datum` operand.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::OperandArityMismatch`] on any other pairing.
    pub fn check_arity(&self) -> PlanResult<()> {
        let ok = if self.operator.is_range() {
            matches!(self.operand, Operand::Range(_, _))
        } else {
            !matches!(self.operand, Operand::Range(_, _))
        };
        if ok {
            Ok(())
        } else {
            Err(PlanError::operand_arity(
                self.operator.token(),
                self.operand.shape(),
            ))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_token_mapping() {
        assert_eq!(CompareOp::from_token("<").unwrap(), CompareOp::Lt);
        assert_eq!(CompareOp::from_token("le").unwrap(), CompareOp::Le);
        assert_eq!(CompareOp::from_token("==").unwrap(), CompareOp::Eq);
        assert_eq!(
            CompareOp::from_token("not_in_range").unwrap(),
            CompareOp::NotInRange
        );
    }

    #[test]
    fn test_unknown_operator() {
        let err = CompareOp::from_token("~=").unwrap_err();
        assert!(matches!(err, PlanError::UnknownOperator { .. }));
    }

    #[test]
    fn test_scalar_comparisons() {
        assert!(CompareOp::Lt.compare(1.0, 2.0));
        assert!(!CompareOp::Lt.compare(2.0, 2.0));
        assert!(CompareOp::Le.compare(2.0, 2.0));
        assert!(CompareOp::Gt.compare(3.0, 2.0));
        assert!(CompareOp::Ge.compare(2.0, 2.0));
        assert!(CompareOp::Eq.compare(2.0, 2.0));
        assert!(CompareOp::Ne.compare(2.0, 2.5));
    }

    #[test]
    fn test_range_comparisons() {
        assert!(CompareOp::InRange.compare_range(1.0, 0.5, 1.5));
        assert!(CompareOp::InRange.compare_range(0.5, 0.5, 1.5));
        assert!(CompareOp::InRange.compare_range(1.5, 0.5, 1.5));
        assert!(!CompareOp::InRange.compare_range(2.0, 0.5, 1.5));
        assert!(CompareOp::NotInRange.compare_range(2.0, 0.5, 1.5));
    }

    #[test]
    fn test_degenerate_range_selects_exact() {
        assert!(CompareOp::InRange.compare_range(1.0, 1.0, 1.0));
        assert!(!CompareOp::InRange.compare_range(1.0 + 1e-9, 1.0, 1.0));
    }

    #[test]
    fn test_arity_range_op_needs_range() {
        let cond = Condition {
            field: "r".to_string(),
            operator: CompareOp::InRange,
            operand: Operand::Scalar(1.0),
        };
        let err = cond.check_arity().unwrap_err();
        assert!(matches!(err, PlanError::OperandArityMismatch { .. }));
    }

    #[test]
    fn test_arity_scalar_op_rejects_range() {
        let cond = Condition {
            field: "r".to_string(),
            operator: CompareOp::Gt,
            operand: Operand::Range(0.0, 1.0),
        };
        assert!(cond.check_arity().is_err());
    }

    #[test]
    fn test_arity_datum_operand() {
        let cond = Condition {
            field: "distance_from_te".to_string(),
            operator: CompareOp::Gt,
            operand: Operand::Datum("te".to_string()),
        };
        assert!(cond.check_arity().is_ok());
    }
}
