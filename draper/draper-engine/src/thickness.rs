//! Thickness resolution: [`ThicknessSpec`] to per-cell float array.

use std::collections::BTreeMap;

use draper_grid::CellGrid;
use draper_plan::{Datum, ThicknessSpec};
use hashbrown::HashMap;

use crate::error::{DrapeError, DrapeResult};

/// Resolve a ply's thickness spec to one value per cell.
///
/// Constants broadcast; datum references interpolate against the datum's base
/// field; expressions evaluate vectorized over their referenced cell fields.
/// NaN/∞ produced by expression arithmetic are carried through, not masked.
pub(crate) fn resolve_thickness(
    spec: &ThicknessSpec,
    grid: &CellGrid,
    datums: &BTreeMap<String, Datum>,
) -> DrapeResult<Vec<f64>> {
    let n = grid.num_cells();
    match spec {
        ThicknessSpec::Constant(value) => Ok(vec![*value; n]),
        ThicknessSpec::DatumRef(name) => {
            let datum = datums
                .get(name)
                .ok_or_else(|| DrapeError::unknown_datum(name))?;
            let base = grid.cell_field(datum.base())?;
            Ok(datum.interpolate_many(base))
        }
        ThicknessSpec::Expression(expr) => {
            let mut fields: HashMap<&str, &[f64]> = HashMap::new();
            for name in expr.field_names() {
                fields.insert(name, grid.cell_field(name)?);
            }
            Ok(expr.evaluate(n, &fields)?)
        }
    }
}
