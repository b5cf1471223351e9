//! Exhaustive pre-flight validation.
//!
//! Validation runs before any evaluation so a misconfigured plan fails fast
//! with one actionable message and the grid is never partially mutated.

use std::collections::BTreeSet;

use draper_grid::CellGrid;
use draper_plan::{LaminatePlan, MaterialDb, Operand, ThicknessSpec};
use tracing::debug;

use crate::error::{DrapeError, DrapeResult};

/// What validation established about a plan/grid/matdb triple.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    /// Every cell field evaluation will read, deduplicated and sorted.
    ///
    /// The orchestrator materializes each of these exactly once via
    /// [`CellGrid::ensure_cell_field`] before the plies are evaluated.
    pub required_fields: BTreeSet<String>,
}

/// Validate the plan against the grid and material database.
///
/// Checks, in order: every ply's material exists; every condition's
/// operator/operand arity agrees; every datum referenced by an operand or
/// thickness spec exists; every field referenced by a condition, a thickness
/// expression, or any datum's base is obtainable as a cell field (directly or
/// via point-data translation).
///
/// # Errors
///
/// Returns the first [`DrapeError`] encountered; nothing is evaluated and the
/// grid is not touched.
pub fn validate(
    plan: &LaminatePlan,
    grid: &CellGrid,
    matdb: &MaterialDb,
) -> DrapeResult<ValidationReport> {
    let mut required_fields = BTreeSet::new();

    // Every datum in the plan must rest on a resolvable base field, whether
    // or not a ply currently references it.
    for (name, datum) in &plan.datums {
        debug!(datum = %name, base = %datum.base(), "datum base required");
        required_fields.insert(datum.base().to_string());
    }

    for (index, ply) in plan.plies.iter().enumerate() {
        if !matdb.contains(&ply.mat) {
            return Err(DrapeError::unknown_material(&ply.mat));
        }

        for condition in &ply.conditions {
            condition.check_arity()?;
            required_fields.insert(condition.field.clone());
            if let Operand::Datum(datum_name) = &condition.operand {
                if !plan.datums.contains_key(datum_name) {
                    return Err(DrapeError::unknown_datum(datum_name));
                }
            }
        }

        match &ply.thickness {
            ThicknessSpec::Constant(_) => {}
            ThicknessSpec::DatumRef(datum_name) => {
                if !plan.datums.contains_key(datum_name) {
                    return Err(DrapeError::unknown_datum(datum_name));
                }
            }
            ThicknessSpec::Expression(expr) => {
                for field in expr.field_names() {
                    required_fields.insert(field.to_string());
                }
            }
        }

        debug!(
            ply = index,
            parent = %ply.parent,
            key = ply.key,
            mat = %ply.mat,
            conditions = ply.conditions.len(),
            "ply validated"
        );
    }

    for field in &required_fields {
        if !grid.has_cell_field(field) && !grid.has_point_field(field) {
            return Err(DrapeError::unknown_field(field));
        }
    }

    debug!(
        fields = required_fields.len(),
        plies = plan.plies.len(),
        "validation complete"
    );
    Ok(ValidationReport { required_fields })
}
