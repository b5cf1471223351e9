//! SVG rendering of a scalar cell field.
//!
//! Cells are drawn as filled polygons in a chosen coordinate plane, colored
//! by a scalar cell array over a two-color gradient. This is a quick-look
//! plot for draping results, not a rendering pipeline.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{bail, Context, Result};
use tracing::info;

use draper::grid::{CellArray, CellGrid};
use draper::prelude::load_grid;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;
const PADDING: f64 = 20.0;

/// Low end of the color ramp.
const COLOR_LO: (u8, u8, u8) = (0x4a, 0x90, 0xd9);
/// High end of the color ramp.
const COLOR_HI: (u8, u8, u8) = (0xd9, 0x53, 0x4a);

/// Render `scalar` of the grid at `grid_path` into an SVG at `output`.
pub fn run_plot(
    grid_path: &Path,
    output: &Path,
    scalar: &str,
    x_axis: &str,
    y_axis: &str,
) -> Result<()> {
    let grid = load_grid(grid_path)?;
    let ix = axis_index(x_axis)?;
    let iy = axis_index(y_axis)?;

    let values = scalar_values(&grid, scalar)?;
    let svg = render_svg(&grid, &values, scalar, ix, iy);

    std::fs::write(output, svg)
        .with_context(|| format!("writing plot to {}", output.display()))?;
    info!(output = %output.display(), scalar, "plot written");
    Ok(())
}

fn axis_index(axis: &str) -> Result<usize> {
    match axis {
        "x" => Ok(0),
        "y" => Ok(1),
        "z" => Ok(2),
        other => bail!("unknown axis `{other}` (expected x, y, or z)"),
    }
}

/// Fetch a cell array as floats, converting integer arrays.
fn scalar_values(grid: &CellGrid, scalar: &str) -> Result<Vec<f64>> {
    let array = grid
        .cell_array(scalar)
        .with_context(|| format!("scalar field `{scalar}` not found in grid"))?;
    Ok(match array {
        CellArray::Float(values) => values.clone(),
        #[allow(clippy::cast_precision_loss)]
        CellArray::Int(values) => values.iter().map(|&v| v as f64).collect(),
    })
}

fn render_svg(grid: &CellGrid, values: &[f64], scalar: &str, ix: usize, iy: usize) -> String {
    if grid.num_cells() == 0 {
        return format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\">\n\
  <text x=\"50%\" y=\"50%\" text-anchor=\"middle\" fill=\"#999\">Empty grid</text>\n\
</svg>"
        );
    }

    // Value range for the color ramp; NaN values render at the low end.
    let finite: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    let v_min = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let v_max = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Content bounds over all points in the chosen plane.
    let (mut min_x, mut max_x) = (f64::INFINITY, f64::NEG_INFINITY);
    let (mut min_y, mut max_y) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in grid.points() {
        min_x = min_x.min(p[ix]);
        max_x = max_x.max(p[ix]);
        min_y = min_y.min(p[iy]);
        max_y = max_y.max(p[iy]);
    }

    let content_w = max_x - min_x;
    let content_h = max_y - min_y;
    let available_w = f64::from(WIDTH) - 2.0 * PADDING;
    let available_h = f64::from(HEIGHT) - 2.0 * PADDING;
    let scale = if content_w > 0.0 && content_h > 0.0 {
        (available_w / content_w).min(available_h / content_h)
    } else if content_w > 0.0 {
        available_w / content_w
    } else {
        1.0
    };
    let offset_x = PADDING + (available_w - content_w * scale) / 2.0;
    let offset_y = PADDING + (available_h - content_h * scale) / 2.0;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{WIDTH}\" height=\"{HEIGHT}\" \
         viewBox=\"0 0 {WIDTH} {HEIGHT}\">\n  \
         <rect width=\"100%\" height=\"100%\" fill=\"#f5f5f5\"/>\n"
    );

    for (cell, points) in grid.cells().iter().enumerate() {
        if points.len() < 2 {
            continue;
        }
        let mut path = String::new();
        for &p in points {
            let Some(point) = grid.points().get(p as usize) else {
                continue;
            };
            // SVG y grows downward.
            let sx = (point[ix] - min_x) * scale + offset_x;
            let sy = f64::from(HEIGHT) - ((point[iy] - min_y) * scale + offset_y);
            let _ = write!(path, "{sx:.2},{sy:.2} ");
        }

        let color = ramp(values.get(cell).copied().unwrap_or(0.0), v_min, v_max);
        let _ = writeln!(
            svg,
            "  <polygon points=\"{}\" fill=\"{color}\" stroke=\"#2d5986\" stroke-width=\"0.5\"/>",
            path.trim_end()
        );
    }

    let _ = write!(
        svg,
        "  <text x=\"10\" y=\"20\" font-family=\"monospace\" font-size=\"12\" fill=\"#666\">\n    \
         {scalar}: {v_min:.6} .. {v_max:.6}\n  </text>\n</svg>"
    );
    svg
}

/// Two-color linear ramp; out-of-range and NaN clamp to the ends.
fn ramp(value: f64, v_min: f64, v_max: f64) -> String {
    let t = if v_max > v_min {
        ((value - v_min) / (v_max - v_min)).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let t = if t.is_nan() { 0.0 } else { t };
    let lerp = |a: u8, b: u8| -> u8 {
        let v = f64::from(a) + (f64::from(b) - f64::from(a)) * t;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        {
            v.round() as u8
        }
    };
    format!(
        "#{:02x}{:02x}{:02x}",
        lerp(COLOR_LO.0, COLOR_HI.0),
        lerp(COLOR_LO.1, COLOR_HI.1),
        lerp(COLOR_LO.2, COLOR_HI.2)
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn quad_grid() -> CellGrid {
        let mut grid = CellGrid::from_parts(
            vec![
                [0.0, 0.0, 0.0],
                [1.0, 0.0, 0.0],
                [1.0, 1.0, 0.0],
                [0.0, 1.0, 0.0],
                [2.0, 0.0, 0.0],
                [2.0, 1.0, 0.0],
            ],
            vec![vec![0, 1, 2, 3], vec![1, 4, 5, 2]],
        );
        grid.set_cell_field("total_thickness", CellArray::Float(vec![0.001, 0.003]))
            .unwrap();
        grid
    }

    #[test]
    fn test_axis_index() {
        assert_eq!(axis_index("x").unwrap(), 0);
        assert_eq!(axis_index("z").unwrap(), 2);
        assert!(axis_index("w").is_err());
    }

    #[test]
    fn test_ramp_endpoints() {
        assert_eq!(ramp(0.0, 0.0, 1.0), "#4a90d9");
        assert_eq!(ramp(1.0, 0.0, 1.0), "#d9534a");
        // Degenerate range pins to the low end.
        assert_eq!(ramp(0.5, 0.5, 0.5), "#4a90d9");
    }

    #[test]
    fn test_render_contains_polygons() {
        let grid = quad_grid();
        let values = scalar_values(&grid, "total_thickness").unwrap();
        let svg = render_svg(&grid, &values, "total_thickness", 0, 1);

        assert!(svg.contains("<svg"));
        assert!(svg.contains("</svg>"));
        assert_eq!(svg.matches("<polygon").count(), 2);
        assert!(svg.contains("total_thickness"));
    }

    #[test]
    fn test_render_empty_grid() {
        let grid = CellGrid::new();
        let svg = render_svg(&grid, &[], "total_thickness", 0, 1);
        assert!(svg.contains("Empty grid"));
    }

    #[test]
    fn test_int_scalar_converts() {
        let mut grid = quad_grid();
        grid.set_cell_field("n_plies", CellArray::Int(vec![1, 2]))
            .unwrap();
        let values = scalar_values(&grid, "n_plies").unwrap();
        assert_eq!(values, vec![1.0, 2.0]);
    }
}
