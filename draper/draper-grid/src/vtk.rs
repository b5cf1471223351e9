//! Legacy ASCII VTK unstructured-grid reader and writer.
//!
//! Supports the subset of the legacy format the draping pipeline needs:
//! `POINTS`, `CELLS`, `CELL_TYPES`, and `SCALARS` arrays under `POINT_DATA`
//! and `CELL_DATA`. Float arrays are written as `double`, integer arrays as
//! `long`; on read, `int`/`long`/`vtktypeint64` map to integer arrays and
//! `float`/`double` to float arrays. Point scalars are always stored as
//! floats, integral or not, since the engine only averages them.

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::error::{GridError, GridResult};
use crate::grid::{CellArray, CellGrid};

/// Load a grid from a legacy ASCII VTK file.
///
/// # Errors
///
/// Returns [`GridError::FileNotFound`] if the path does not exist, or
/// [`GridError::InvalidContent`] if the file is not a legacy ASCII
/// unstructured grid.
///
/// # Example
///
/// ```no_run
/// use draper_grid::load_grid;
///
/// let grid = load_grid("draped.vtk").unwrap();
/// println!("{} cells", grid.num_cells());
/// ```
pub fn load_grid<P: AsRef<Path>>(path: P) -> GridResult<CellGrid> {
    let path = path.as_ref();
    let mut file = File::open(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            GridError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            GridError::Io(e)
        }
    })?;
    let mut content = String::new();
    file.read_to_string(&mut content)?;
    parse_grid(&content)
}

/// Save a grid as a legacy ASCII VTK file.
///
/// Arrays are written in sorted name order so repeated saves of the same grid
/// are byte-identical.
///
/// # Errors
///
/// Returns [`GridError::Io`] if the file cannot be written.
pub fn save_grid<P: AsRef<Path>>(grid: &CellGrid, path: P) -> GridResult<()> {
    let file = File::create(path)?;
    let mut w = BufWriter::new(file);

    writeln!(w, "# vtk DataFile Version 3.0")?;
    writeln!(w, "draper grid")?;
    writeln!(w, "ASCII")?;
    writeln!(w, "DATASET UNSTRUCTURED_GRID")?;

    writeln!(w, "POINTS {} double", grid.num_points())?;
    for p in grid.points() {
        writeln!(w, "{} {} {}", fmt_f64(p[0]), fmt_f64(p[1]), fmt_f64(p[2]))?;
    }

    let total: usize = grid.cells().iter().map(|c| c.len() + 1).sum();
    writeln!(w, "CELLS {} {}", grid.num_cells(), total)?;
    for cell in grid.cells() {
        write!(w, "{}", cell.len())?;
        for idx in cell {
            write!(w, " {idx}")?;
        }
        writeln!(w)?;
    }

    writeln!(w, "CELL_TYPES {}", grid.num_cells())?;
    for cell in grid.cells() {
        writeln!(w, "{}", cell_type_for(cell.len()))?;
    }

    if !grid.cell_field_names().is_empty() {
        writeln!(w, "CELL_DATA {}", grid.num_cells())?;
        for name in grid.cell_field_names() {
            match grid.cell_array(name)? {
                CellArray::Float(values) => write_scalars(&mut w, name, "double", values, fmt_f64)?,
                CellArray::Int(values) => {
                    write_scalars(&mut w, name, "long", values, |v: i64| v.to_string())?;
                }
            }
        }
    }

    let point_names = grid.point_field_names();
    if !point_names.is_empty() {
        writeln!(w, "POINT_DATA {}", grid.num_points())?;
        for name in point_names {
            // Point arrays are float-only in this container.
            let values = grid.point_field(name)?;
            write_scalars(&mut w, name, "double", values, fmt_f64)?;
        }
    }

    w.flush()?;
    Ok(())
}

/// VTK cell type code for a cell with `n` points.
fn cell_type_for(n: usize) -> u8 {
    match n {
        1 => 1,  // VTK_VERTEX
        2 => 3,  // VTK_LINE
        3 => 5,  // VTK_TRIANGLE
        4 => 9,  // VTK_QUAD
        _ => 7,  // VTK_POLYGON
    }
}

/// Format a float the way VTK tooling expects (no trailing noise, roundtrip-safe).
fn fmt_f64(v: f64) -> String {
    // {:?} keeps enough digits for an exact f64 round-trip.
    format!("{v:?}")
}

fn write_scalars<W: Write, T: Copy>(
    w: &mut W,
    name: &str,
    vtk_type: &str,
    values: &[T],
    fmt: impl Fn(T) -> String,
) -> GridResult<()> {
    writeln!(w, "SCALARS {name} {vtk_type} 1")?;
    writeln!(w, "LOOKUP_TABLE default")?;
    for v in values {
        writeln!(w, "{}", fmt(*v))?;
    }
    Ok(())
}

// ============================================================================
// Parsing
// ============================================================================

/// Whitespace token cursor over the file content.
struct Tokens<'a> {
    iter: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(content: &'a str) -> Self {
        Self {
            iter: content.split_whitespace(),
        }
    }

    fn next(&mut self) -> GridResult<&'a str> {
        self.iter
            .next()
            .ok_or_else(|| GridError::invalid_content("unexpected end of file"))
    }

    fn peek(&self) -> Option<&'a str> {
        self.iter.clone().next()
    }

    fn next_usize(&mut self, what: &str) -> GridResult<usize> {
        let tok = self.next()?;
        tok.parse()
            .map_err(|_| GridError::invalid_content(format!("expected {what}, found `{tok}`")))
    }

    fn next_f64(&mut self, what: &str) -> GridResult<f64> {
        let tok = self.next()?;
        tok.parse()
            .map_err(|_| GridError::invalid_content(format!("expected {what}, found `{tok}`")))
    }

    fn next_i64(&mut self, what: &str) -> GridResult<i64> {
        let tok = self.next()?;
        tok.parse()
            .map_err(|_| GridError::invalid_content(format!("expected {what}, found `{tok}`")))
    }
}

fn parse_grid(content: &str) -> GridResult<CellGrid> {
    // Header: two comment-ish lines, then ASCII, then DATASET.
    let mut lines = content.lines();
    let magic = lines
        .next()
        .ok_or_else(|| GridError::invalid_content("empty file"))?;
    if !magic.starts_with("# vtk DataFile") {
        return Err(GridError::invalid_content("missing `# vtk DataFile` header"));
    }
    let _title = lines.next();
    let body: String = lines.collect::<Vec<_>>().join("\n");
    let mut t = Tokens::new(&body);

    match t.next()? {
        "ASCII" => {}
        "BINARY" => {
            return Err(GridError::invalid_content(
                "binary VTK files are not supported",
            ))
        }
        other => {
            return Err(GridError::invalid_content(format!(
                "expected ASCII or BINARY, found `{other}`"
            )))
        }
    }
    if t.next()? != "DATASET" || t.next()? != "UNSTRUCTURED_GRID" {
        return Err(GridError::invalid_content(
            "only DATASET UNSTRUCTURED_GRID is supported",
        ));
    }

    let mut points = Vec::new();
    let mut cells: Vec<Vec<u32>> = Vec::new();
    let mut grid: Option<CellGrid> = None;
    // Which data section SCALARS blocks currently belong to.
    #[derive(Clone, Copy)]
    enum Section {
        None,
        PointData(usize),
        CellData(usize),
    }
    let mut section = Section::None;

    while let Some(keyword) = t.peek() {
        match keyword {
            "POINTS" => {
                let _ = t.next()?;
                let n = t.next_usize("point count")?;
                let _dtype = t.next()?;
                points.reserve(n);
                for _ in 0..n {
                    let x = t.next_f64("point coordinate")?;
                    let y = t.next_f64("point coordinate")?;
                    let z = t.next_f64("point coordinate")?;
                    points.push([x, y, z]);
                }
            }
            "CELLS" => {
                let _ = t.next()?;
                let m = t.next_usize("cell count")?;
                let _total = t.next_usize("cell list size")?;
                cells.reserve(m);
                for _ in 0..m {
                    let len = t.next_usize("cell point count")?;
                    let mut cell = Vec::with_capacity(len);
                    for _ in 0..len {
                        let idx = t.next_usize("point index")?;
                        let idx = u32::try_from(idx).map_err(|_| {
                            GridError::invalid_content(format!("point index {idx} out of range"))
                        })?;
                        cell.push(idx);
                    }
                    cells.push(cell);
                }
            }
            "CELL_TYPES" => {
                let _ = t.next()?;
                let m = t.next_usize("cell type count")?;
                for _ in 0..m {
                    let _ = t.next_usize("cell type")?;
                }
            }
            "POINT_DATA" => {
                let _ = t.next()?;
                let n = t.next_usize("point data count")?;
                section = Section::PointData(n);
                grid.get_or_insert_with(|| {
                    CellGrid::from_parts(std::mem::take(&mut points), std::mem::take(&mut cells))
                });
            }
            "CELL_DATA" => {
                let _ = t.next()?;
                let m = t.next_usize("cell data count")?;
                section = Section::CellData(m);
                grid.get_or_insert_with(|| {
                    CellGrid::from_parts(std::mem::take(&mut points), std::mem::take(&mut cells))
                });
            }
            "SCALARS" => {
                let _ = t.next()?;
                let name = t.next()?.to_string();
                let dtype = t.next()?;
                let is_int = matches!(dtype, "int" | "long" | "vtktypeint64" | "short" | "bit");
                // Optional component count.
                if let Some(tok) = t.peek() {
                    if let Ok(comps) = tok.parse::<usize>() {
                        let _ = t.next()?;
                        if comps != 1 {
                            return Err(GridError::invalid_content(format!(
                                "SCALARS {name}: only 1 component supported, found {comps}"
                            )));
                        }
                    }
                }
                if t.peek() == Some("LOOKUP_TABLE") {
                    let _ = t.next()?;
                    let _table = t.next()?;
                }

                let grid_ref = grid.as_mut().ok_or_else(|| {
                    GridError::invalid_content("SCALARS before POINT_DATA/CELL_DATA")
                })?;
                match section {
                    Section::None => {
                        return Err(GridError::invalid_content(
                            "SCALARS before POINT_DATA/CELL_DATA",
                        ))
                    }
                    Section::PointData(n) => {
                        let mut values = Vec::with_capacity(n);
                        for _ in 0..n {
                            values.push(t.next_f64("point scalar")?);
                        }
                        grid_ref.set_point_field(name, values)?;
                    }
                    Section::CellData(m) => {
                        let array = if is_int {
                            let mut values = Vec::with_capacity(m);
                            for _ in 0..m {
                                values.push(t.next_i64("cell scalar")?);
                            }
                            CellArray::Int(values)
                        } else {
                            let mut values = Vec::with_capacity(m);
                            for _ in 0..m {
                                values.push(t.next_f64("cell scalar")?);
                            }
                            CellArray::Float(values)
                        };
                        grid_ref.set_cell_field(name, array)?;
                    }
                }
            }
            other => {
                return Err(GridError::invalid_content(format!(
                    "unsupported VTK section `{other}`"
                )));
            }
        }
    }

    Ok(grid.unwrap_or_else(|| CellGrid::from_parts(points, cells)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_grid() -> CellGrid {
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
        grid.set_cell_field("r", CellArray::Float(vec![0.5, 1.5]))
            .unwrap();
        grid.set_cell_field("mat", CellArray::Int(vec![7, 0])).unwrap();
        grid.set_point_field("height", vec![0.0, 0.1, 0.2, 0.3, 0.4, 0.5])
            .unwrap();
        grid
    }

    #[test]
    fn test_roundtrip() {
        let grid = sample_grid();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.vtk");

        save_grid(&grid, &path).unwrap();
        let loaded = load_grid(&path).unwrap();

        assert_eq!(loaded.num_points(), 6);
        assert_eq!(loaded.num_cells(), 2);
        assert_eq!(loaded.cells(), grid.cells());
        assert_eq!(loaded.cell_field("r").unwrap(), &[0.5, 1.5]);
        assert_eq!(
            loaded.cell_array("mat").unwrap().as_int().unwrap(),
            &[7, 0]
        );
        for (a, b) in loaded.points().iter().zip(grid.points()) {
            assert_relative_eq!(a[0], b[0]);
            assert_relative_eq!(a[1], b[1]);
        }
    }

    #[test]
    fn test_roundtrip_is_deterministic() {
        let grid = sample_grid();
        let dir = tempfile::tempdir().unwrap();
        let path_a = dir.path().join("a.vtk");
        let path_b = dir.path().join("b.vtk");

        save_grid(&grid, &path_a).unwrap();
        save_grid(&grid, &path_b).unwrap();

        let a = std::fs::read(&path_a).unwrap();
        let b = std::fs::read(&path_b).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_grid("/nonexistent/grid.vtk").unwrap_err();
        assert!(matches!(err, GridError::FileNotFound { .. }));
    }

    #[test]
    fn test_reject_non_vtk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.vtk");
        std::fs::write(&path, "not a vtk file\n").unwrap();
        let err = load_grid(&path).unwrap_err();
        assert!(matches!(err, GridError::InvalidContent { .. }));
    }

    #[test]
    fn test_reject_binary() {
        let content = "# vtk DataFile Version 3.0\nt\nBINARY\nDATASET UNSTRUCTURED_GRID\n";
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bin.vtk");
        std::fs::write(&path, content).unwrap();
        let err = load_grid(&path).unwrap_err();
        assert!(format!("{err}").contains("binary"));
    }

    #[test]
    fn test_parse_int_scalars_as_int() {
        let content = "\
# vtk DataFile Version 3.0
grid
ASCII
DATASET UNSTRUCTURED_GRID
POINTS 3 double
0 0 0
1 0 0
2 0 0
CELLS 2 6
2 0 1
2 1 2
CELL_TYPES 2
3
3
CELL_DATA 2
SCALARS ids int 1
LOOKUP_TABLE default
4
-2
";
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ints.vtk");
        std::fs::write(&path, content).unwrap();
        let grid = load_grid(&path).unwrap();
        assert_eq!(grid.cell_array("ids").unwrap().as_int().unwrap(), &[4, -2]);
    }
}
