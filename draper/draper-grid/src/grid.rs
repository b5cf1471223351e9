//! Unstructured-grid container with named scalar arrays.

use hashbrown::HashMap;

use crate::error::{GridError, GridResult};

/// A per-cell scalar array.
///
/// Cell data is either floating point (field values, angles, thicknesses) or
/// integral (material ids, ply counts). Keeping the two apart means integer
/// arrays survive a write/read round-trip without being degraded to floats.
#[derive(Debug, Clone, PartialEq)]
pub enum CellArray {
    /// Floating-point values, one per cell.
    Float(Vec<f64>),
    /// Integer values, one per cell.
    Int(Vec<i64>),
}

impl CellArray {
    /// Number of entries in the array.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
        }
    }

    /// Whether the array is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow the float values, if this is a float array.
    #[must_use]
    pub fn as_float(&self) -> Option<&[f64]> {
        match self {
            Self::Float(v) => Some(v),
            Self::Int(_) => None,
        }
    }

    /// Borrow the integer values, if this is an integer array.
    #[must_use]
    pub fn as_int(&self) -> Option<&[i64]> {
        match self {
            Self::Int(v) => Some(v),
            Self::Float(_) => None,
        }
    }
}

/// An unstructured grid: points, cells, and named scalar arrays.
///
/// Cells are stored as lists of point indices. The container does not
/// interpret cell topology beyond membership — the draping engine works
/// purely on per-cell scalar arrays.
///
/// # Example
///
/// ```
/// use draper_grid::{CellArray, CellGrid};
///
/// let mut grid = CellGrid::from_parts(
///     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
///     vec![vec![0, 1, 2, 3]],
/// );
/// assert_eq!(grid.num_cells(), 1);
///
/// grid.set_cell_field("r", CellArray::Float(vec![0.5])).unwrap();
/// assert_eq!(grid.cell_field("r").unwrap(), &[0.5]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CellGrid {
    /// Point coordinates.
    points: Vec<[f64; 3]>,
    /// Cells as point-index lists.
    cells: Vec<Vec<u32>>,
    /// Named per-cell arrays.
    cell_data: HashMap<String, CellArray>,
    /// Named per-point float arrays.
    point_data: HashMap<String, Vec<f64>>,
}

impl CellGrid {
    /// Create an empty grid.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid from points and cell connectivity.
    #[must_use]
    pub fn from_parts(points: Vec<[f64; 3]>, cells: Vec<Vec<u32>>) -> Self {
        Self {
            points,
            cells,
            cell_data: HashMap::new(),
            point_data: HashMap::new(),
        }
    }

    /// Number of cells.
    #[must_use]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Number of points.
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Point coordinates.
    #[must_use]
    pub fn points(&self) -> &[[f64; 3]] {
        &self.points
    }

    /// Cell connectivity (point indices per cell).
    #[must_use]
    pub fn cells(&self) -> &[Vec<u32>] {
        &self.cells
    }

    /// Whether a cell array exists under `name`.
    #[must_use]
    pub fn has_cell_field(&self, name: &str) -> bool {
        self.cell_data.contains_key(name)
    }

    /// Whether a point array exists under `name`.
    #[must_use]
    pub fn has_point_field(&self, name: &str) -> bool {
        self.point_data.contains_key(name)
    }

    /// Borrow a float cell array.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownField`] if no cell array exists under
    /// `name`, or [`GridError::FieldType`] if the array is integral.
    pub fn cell_field(&self, name: &str) -> GridResult<&[f64]> {
        let array = self
            .cell_data
            .get(name)
            .ok_or_else(|| GridError::unknown_field(name))?;
        array.as_float().ok_or(GridError::FieldType {
            name: name.to_string(),
            expected: "float",
        })
    }

    /// Borrow a raw cell array of either type.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownField`] if no cell array exists under `name`.
    pub fn cell_array(&self, name: &str) -> GridResult<&CellArray> {
        self.cell_data
            .get(name)
            .ok_or_else(|| GridError::unknown_field(name))
    }

    /// Add or overwrite a cell array.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::LengthMismatch`] if the array length differs from
    /// the cell count.
    pub fn set_cell_field(&mut self, name: impl Into<String>, array: CellArray) -> GridResult<()> {
        let name = name.into();
        if array.len() != self.cells.len() {
            return Err(GridError::LengthMismatch {
                expected: self.cells.len(),
                got: array.len(),
                name,
            });
        }
        self.cell_data.insert(name, array);
        Ok(())
    }

    /// Add or overwrite a point array.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::LengthMismatch`] if the array length differs from
    /// the point count.
    pub fn set_point_field(&mut self, name: impl Into<String>, values: Vec<f64>) -> GridResult<()> {
        let name = name.into();
        if values.len() != self.points.len() {
            return Err(GridError::LengthMismatch {
                expected: self.points.len(),
                got: values.len(),
                name,
            });
        }
        self.point_data.insert(name, values);
        Ok(())
    }

    /// Borrow a point array.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownField`] if no point array exists under `name`.
    pub fn point_field(&self, name: &str) -> GridResult<&[f64]> {
        self.point_data
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| GridError::unknown_field(name))
    }

    /// Make `name` available as a cell field.
    ///
    /// If a cell array already exists the call is a no-op. Otherwise, a point
    /// array under the same name is averaged over each cell's points and
    /// stored as a float cell array. Calling this twice yields identical
    /// field values.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::UnknownField`] if the name exists neither as cell
    /// nor as point data.
    pub fn ensure_cell_field(&mut self, name: &str) -> GridResult<()> {
        if self.cell_data.contains_key(name) {
            return Ok(());
        }
        let point_values = self
            .point_data
            .get(name)
            .ok_or_else(|| GridError::unknown_field(name))?;

        let cell_values: Vec<f64> = self
            .cells
            .iter()
            .map(|cell| {
                if cell.is_empty() {
                    return 0.0;
                }
                let sum: f64 = cell
                    .iter()
                    .filter_map(|&p| point_values.get(p as usize))
                    .sum();
                #[allow(clippy::cast_precision_loss)]
                {
                    sum / cell.len() as f64
                }
            })
            .collect();

        self.cell_data
            .insert(name.to_string(), CellArray::Float(cell_values));
        Ok(())
    }

    /// Names of all cell arrays, sorted.
    #[must_use]
    pub fn cell_field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.cell_data.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Names of all point arrays, sorted.
    #[must_use]
    pub fn point_field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.point_data.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
