//! Per-ply evaluation: mask, material, angle, thickness arrays.

use std::collections::BTreeMap;

use draper_grid::CellGrid;
use draper_plan::{Datum, MaterialDb, Ply};
use tracing::debug;

use crate::error::{DrapeError, DrapeResult};
use crate::mask::condition_mask;
use crate::thickness::resolve_thickness;

/// The output arrays of one evaluated ply.
///
/// Where the mask is false, material is 0, angle is 0, and thickness is
/// exactly 0 — uncovered cells contribute nothing to any aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct PlyArrays {
    /// Coverage mask.
    pub mask: Vec<bool>,
    /// Material id where covered, else 0.
    pub material: Vec<i64>,
    /// Ply angle in degrees where covered, else 0.
    pub angle: Vec<f64>,
    /// Thickness where covered, else 0.
    pub thickness: Vec<f64>,
}

impl PlyArrays {
    /// Number of covered cells.
    #[must_use]
    pub fn covered(&self) -> usize {
        self.mask.iter().filter(|&&m| m).count()
    }
}

/// Evaluate a single ply against the grid.
///
/// Conditions are ANDed into the coverage mask; the thickness spec is
/// resolved for every cell and zeroed where the mask is false. Plies are
/// independent, so this function can run for many plies in parallel over a
/// shared immutable grid.
pub fn evaluate_ply(
    ply: &Ply,
    grid: &CellGrid,
    datums: &BTreeMap<String, Datum>,
    matdb: &MaterialDb,
) -> DrapeResult<PlyArrays> {
    let n = grid.num_cells();
    let mat_id = matdb
        .get(&ply.mat)
        .ok_or_else(|| DrapeError::unknown_material(&ply.mat))?
        .id;

    let mut mask = vec![true; n];
    for condition in &ply.conditions {
        let m = condition_mask(condition, grid, datums)?;
        for (acc, v) in mask.iter_mut().zip(&m) {
            *acc &= v;
        }
    }

    let thickness_full = resolve_thickness(&ply.thickness, grid, datums)?;

    let material = mask.iter().map(|&m| if m { mat_id } else { 0 }).collect();
    let angle = mask.iter().map(|&m| if m { ply.angle } else { 0.0 }).collect();
    let thickness = mask
        .iter()
        .zip(&thickness_full)
        .map(|(&m, &t)| if m { t } else { 0.0 })
        .collect();

    let arrays = PlyArrays {
        mask,
        material,
        angle,
        thickness,
    };
    debug!(
        parent = %ply.parent,
        key = ply.key,
        mat = %ply.mat,
        covered = arrays.covered(),
        cells = n,
        "evaluated ply"
    );
    Ok(arrays)
}
