//! The draping orchestrator.

use std::collections::BTreeMap;

use draper_grid::{CellArray, CellGrid};
use draper_plan::{LaminatePlan, MaterialDb};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{DrapeError, DrapeResult};
use crate::order::{order_plies, PlacedPly, PLY_SUFFIXES};
use crate::ply::{evaluate_ply, PlyArrays};
use crate::report::{DrapeReport, PlyPlacement};
use crate::validate::validate;

/// Name of the per-cell total thickness array.
pub const TOTAL_THICKNESS_FIELD: &str = "total_thickness";

/// Name of the per-cell ply count array.
pub const N_PLIES_FIELD: &str = "n_plies";

/// Assign every ply in the plan to the grid.
///
/// Pipeline: validate → materialize required cell fields → sort plies →
/// evaluate plies (in parallel over an immutable view) → write per-ply
/// arrays in sorted order → write aggregates.
///
/// Per placed ply `i`, the cell arrays `ply_{i:06}_{parent}_{key}_material`
/// (id, 0 uncovered), `..._angle`, and `..._thickness` are attached; the
/// aggregates `total_thickness`, `n_plies`, and one `{parent}_thickness` per
/// distinct parent label are summed in sorted ply order, so repeated runs on
/// identical inputs produce bit-identical arrays.
///
/// # Errors
///
/// Any [`DrapeError`] aborts the run before the grid is mutated; evaluation
/// anomalies (NaN/∞ thickness) are data, not errors.
///
/// # Example
///
/// ```
/// use draper_engine::drape;
/// use draper_grid::{CellArray, CellGrid};
/// use draper_plan::{LaminatePlan, MaterialDb};
///
/// let mut grid = CellGrid::from_parts(
///     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]],
///     vec![vec![0, 1], vec![1, 2], vec![2, 3]],
/// );
/// grid.set_cell_field("r", CellArray::Float(vec![0.0, 1.0, 2.0])).unwrap();
///
/// let plan = LaminatePlan::from_yaml_str(r"
/// plies:
///   - { mat: carbon, angle: 0, thickness: 0.001, parent: plate, conditions: [], key: 1 }
/// ").unwrap();
/// let matdb = MaterialDb::from_json_str(r#"{"carbon": {"id": 7}}"#).unwrap();
///
/// let report = drape(&plan, &mut grid, &matdb).unwrap();
/// assert_eq!(report.ply_count(), 1);
/// assert_eq!(grid.cell_field("total_thickness").unwrap(), &[0.001, 0.001, 0.001]);
/// ```
pub fn drape(
    plan: &LaminatePlan,
    grid: &mut CellGrid,
    matdb: &MaterialDb,
) -> DrapeResult<DrapeReport> {
    let n = grid.num_cells();
    if n == 0 {
        return Err(DrapeError::EmptyMesh);
    }

    info!(cells = n, plies = plan.plies.len(), "starting drape");

    let validation = validate(plan, grid, matdb)?;
    for field in &validation.required_fields {
        debug!(field = %field, "materializing cell field");
        grid.ensure_cell_field(field)?;
    }

    let placed = order_plies(&plan.plies);
    check_output_names(&placed)?;

    // Fan out over an immutable view; the grid is only written after the join.
    let grid_view: &CellGrid = grid;
    let results: Vec<PlyArrays> = placed
        .par_iter()
        .map(|p| evaluate_ply(p.ply, grid_view, &plan.datums, matdb))
        .collect::<DrapeResult<Vec<_>>>()?;

    let mut total = vec![0.0_f64; n];
    let mut counts = vec![0_i64; n];
    let mut parent_totals: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    let mut placements = Vec::with_capacity(placed.len());

    for (p, arrays) in placed.iter().zip(results) {
        let parent_total = parent_totals
            .entry(p.ply.parent.as_str())
            .or_insert_with(|| vec![0.0_f64; n]);
        for cell in 0..n {
            total[cell] += arrays.thickness[cell];
            parent_total[cell] += arrays.thickness[cell];
            counts[cell] += i64::from(arrays.mask[cell]);
        }

        placements.push(PlyPlacement {
            prefix: p.prefix.clone(),
            parent: p.ply.parent.clone(),
            key: p.ply.key,
            mat: p.ply.mat.clone(),
            covered: arrays.covered(),
        });

        grid.set_cell_field(p.field_name("material"), CellArray::Int(arrays.material))?;
        grid.set_cell_field(p.field_name("angle"), CellArray::Float(arrays.angle))?;
        grid.set_cell_field(p.field_name("thickness"), CellArray::Float(arrays.thickness))?;
    }

    let min_total = total.iter().copied().fold(f64::INFINITY, f64::min);
    let max_total = total.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    grid.set_cell_field(TOTAL_THICKNESS_FIELD, CellArray::Float(total))?;
    grid.set_cell_field(N_PLIES_FIELD, CellArray::Int(counts))?;
    for (parent, values) in parent_totals {
        grid.set_cell_field(format!("{parent}_thickness"), CellArray::Float(values))?;
    }

    info!(
        plies = placements.len(),
        max_total_thickness = max_total,
        "drape complete"
    );

    Ok(DrapeReport {
        cells: n,
        plies: placements,
        min_total_thickness: min_total,
        max_total_thickness: max_total,
    })
}

/// Reject colliding output names before any work is done.
///
/// Ranks make per-ply names unique by construction; the set check also guards
/// the aggregates against pathological parent labels (a parent named `total`
/// would collide with `total_thickness`).
fn check_output_names(placed: &[PlacedPly<'_>]) -> DrapeResult<()> {
    let mut names = std::collections::BTreeSet::new();
    let mut claim = move |name: String| -> DrapeResult<()> {
        if names.insert(name.clone()) {
            Ok(())
        } else {
            Err(DrapeError::DuplicatePlyName { name })
        }
    };

    for p in placed {
        for suffix in PLY_SUFFIXES {
            claim(p.field_name(suffix))?;
        }
    }
    claim(TOTAL_THICKNESS_FIELD.to_string())?;
    claim(N_PLIES_FIELD.to_string())?;

    let parents: std::collections::BTreeSet<&str> =
        placed.iter().map(|p| p.ply.parent.as_str()).collect();
    for parent in parents {
        claim(format!("{parent}_thickness"))?;
    }
    Ok(())
}
