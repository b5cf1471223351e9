//! Vectorized condition evaluation.

use std::collections::BTreeMap;

use draper_grid::CellGrid;
use draper_plan::{Condition, Datum, Operand};

use crate::error::{DrapeError, DrapeResult};

/// Evaluate one condition against the grid, producing a per-cell mask.
///
/// The left-hand side is the condition's cell field. A scalar operand is
/// broadcast; a datum operand is interpolated per cell against the datum's
/// base field; a range operand tests membership in the closed interval.
pub(crate) fn condition_mask(
    condition: &Condition,
    grid: &CellGrid,
    datums: &BTreeMap<String, Datum>,
) -> DrapeResult<Vec<bool>> {
    condition.check_arity()?;
    let lhs = grid.cell_field(&condition.field)?;
    let op = condition.operator;

    match &condition.operand {
        Operand::Scalar(value) => Ok(lhs.iter().map(|&x| op.compare(x, *value)).collect()),
        Operand::Range(lo, hi) => Ok(lhs
            .iter()
            .map(|&x| op.compare_range(x, *lo, *hi))
            .collect()),
        Operand::Datum(name) => {
            let datum = datums
                .get(name)
                .ok_or_else(|| DrapeError::unknown_datum(name))?;
            let base = grid.cell_field(datum.base())?;
            let rhs = datum.interpolate_many(base);
            Ok(lhs
                .iter()
                .zip(&rhs)
                .map(|(&x, &threshold)| op.compare(x, threshold))
                .collect())
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use draper_grid::CellArray;
    use draper_plan::CompareOp;

    fn grid_with_r() -> CellGrid {
        let mut grid = CellGrid::from_parts(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [2.0, 0.0, 0.0],
                [3.0, 0.0, 0.0],
            ],
            vec![vec![0, 1], vec![1, 2], vec![2, 3]],
        );
        grid.set_cell_field("r", CellArray::Float(vec![0.0, 1.0, 2.0]))
            .unwrap();
        grid
    }

    fn cond(field: &str, operator: CompareOp, operand: Operand) -> Condition {
        Condition {
            field: field.to_string(),
            operator,
            operand,
        }
    }

    #[test]
    fn test_scalar_operand() {
        let grid = grid_with_r();
        let datums = BTreeMap::new();

        let mask = condition_mask(
            &cond("r", CompareOp::Gt, Operand::Scalar(0.5)),
            &grid,
            &datums,
        )
        .unwrap();
        assert_eq!(mask, vec![false, true, true]);
    }

    #[test]
    fn test_range_operand() {
        let grid = grid_with_r();
        let datums = BTreeMap::new();

        let mask = condition_mask(
            &cond("r", CompareOp::InRange, Operand::Range(0.5, 1.5)),
            &grid,
            &datums,
        )
        .unwrap();
        assert_eq!(mask, vec![false, true, false]);

        let mask = condition_mask(
            &cond("r", CompareOp::NotInRange, Operand::Range(0.5, 1.5)),
            &grid,
            &datums,
        )
        .unwrap();
        assert_eq!(mask, vec![true, false, true]);
    }

    #[test]
    fn test_degenerate_range_selects_equality() {
        let grid = grid_with_r();
        let datums = BTreeMap::new();

        let mask = condition_mask(
            &cond("r", CompareOp::InRange, Operand::Range(1.0, 1.0)),
            &grid,
            &datums,
        )
        .unwrap();
        assert_eq!(mask, vec![false, true, false]);
    }

    #[test]
    fn test_datum_operand() {
        // Per-cell threshold interpolated from r: [0.1, 0.15, 0.2].
        let mut grid = grid_with_r();
        grid.set_cell_field(
            "distance_from_te",
            CellArray::Float(vec![0.05, 0.25, 0.15]),
        )
        .unwrap();

        let mut datums = BTreeMap::new();
        datums.insert(
            "te".to_string(),
            Datum::new("r", vec![(0.0, 0.1), (2.0, 0.2)]).unwrap(),
        );

        let mask = condition_mask(
            &cond(
                "distance_from_te",
                CompareOp::Gt,
                Operand::Datum("te".to_string()),
            ),
            &grid,
            &datums,
        )
        .unwrap();
        assert_eq!(mask, vec![false, true, false]);
    }

    #[test]
    fn test_unknown_field() {
        let grid = grid_with_r();
        let datums = BTreeMap::new();

        let err = condition_mask(
            &cond("ghost", CompareOp::Gt, Operand::Scalar(0.0)),
            &grid,
            &datums,
        )
        .unwrap_err();
        assert!(matches!(err, DrapeError::UnknownField { .. }));
    }

    #[test]
    fn test_unknown_datum() {
        let grid = grid_with_r();
        let datums = BTreeMap::new();

        let err = condition_mask(
            &cond("r", CompareOp::Gt, Operand::Datum("ghost".to_string())),
            &grid,
            &datums,
        )
        .unwrap_err();
        assert!(matches!(err, DrapeError::UnknownDatum { .. }));
    }

    #[test]
    fn test_arity_guard() {
        let grid = grid_with_r();
        let datums = BTreeMap::new();

        let err = condition_mask(
            &cond("r", CompareOp::InRange, Operand::Scalar(1.0)),
            &grid,
            &datums,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            DrapeError::Plan(draper_plan::PlanError::OperandArityMismatch { .. })
        ));
    }
}
