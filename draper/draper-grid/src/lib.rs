//! Cell-field grid container for composite draping.
//!
//! This crate provides [`CellGrid`], an unstructured-grid container that
//! carries named scalar arrays on cells and points, plus a reader/writer for
//! the legacy ASCII VTK unstructured-grid format.
//!
//! The draping engine only ever consumes *cell* fields. Point fields are
//! translated on demand by [`CellGrid::ensure_cell_field`], which averages a
//! point array over each cell's points. The translation is idempotent: once a
//! cell field exists under a name, further calls leave it untouched.
//!
//! # Example
//!
//! ```
//! use draper_grid::{CellArray, CellGrid};
//!
//! let mut grid = CellGrid::from_parts(
//!     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]],
//!     vec![vec![0, 1], vec![1, 2]],
//! );
//! grid.set_point_field("r", vec![0.0, 1.0, 2.0]).unwrap();
//!
//! // Translate the point field to a cell field (mean over cell points).
//! grid.ensure_cell_field("r").unwrap();
//! assert_eq!(grid.cell_field("r").unwrap(), &[0.5, 1.5]);
//!
//! grid.set_cell_field("thickness", CellArray::Float(vec![0.001, 0.002]))
//!     .unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod error;
mod grid;
mod vtk;

pub use error::{GridError, GridResult};
pub use grid::{CellArray, CellGrid};
pub use vtk::{load_grid, save_grid};
