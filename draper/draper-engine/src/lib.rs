//! Vectorized ply assignment for finite-element grids.
//!
//! Given a laminate plan, a grid with named scalar cell fields, and a
//! material database, the engine decides which plies cover each cell, in what
//! order, and with what thickness and angle, and writes the result back onto
//! the grid as per-ply cell arrays.
//!
//! # Pipeline
//!
//! [`drape`] drives the run: exhaustive validation first (so misconfiguration
//! fails before anything is evaluated or written), then cell-field
//! materialization, stable ply ordering by `(key, definition_index)`,
//! data-parallel evaluation across plies, and finally sequential write-back
//! with `total_thickness`, `n_plies`, and per-parent thickness aggregates.
//!
//! # Example
//!
//! ```
//! use draper_engine::drape;
//! use draper_grid::{CellArray, CellGrid};
//! use draper_plan::{LaminatePlan, MaterialDb};
//!
//! let mut grid = CellGrid::from_parts(
//!     vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [3.0, 0.0, 0.0]],
//!     vec![vec![0, 1], vec![1, 2], vec![2, 3]],
//! );
//! grid.set_cell_field("r", CellArray::Float(vec![0.0, 1.0, 2.0])).unwrap();
//!
//! let plan = LaminatePlan::from_yaml_str(r"
//! plies:
//!   - mat: carbon
//!     angle: 0
//!     thickness: 0.001
//!     parent: plate
//!     conditions:
//!       - { field: r, operator: in_range, operand: [0.5, 1.5] }
//!     key: 1
//! ").unwrap();
//! let matdb = MaterialDb::from_json_str(r#"{"carbon": {"id": 7}}"#).unwrap();
//!
//! let report = drape(&plan, &mut grid, &matdb).unwrap();
//! assert_eq!(report.plies[0].covered, 1);
//! assert_eq!(grid.cell_field("total_thickness").unwrap(), &[0.0, 0.001, 0.0]);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod drape;
mod error;
mod mask;
mod order;
mod ply;
mod report;
mod thickness;
mod validate;

pub use drape::{drape, N_PLIES_FIELD, TOTAL_THICKNESS_FIELD};
pub use error::{DrapeError, DrapeResult};
pub use order::{order_plies, PlacedPly, PLY_SUFFIXES};
pub use ply::{evaluate_ply, PlyArrays};
pub use report::{DrapeReport, PlyPlacement};
pub use validate::{validate, ValidationReport};
