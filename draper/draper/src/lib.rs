//! Composite ply draping toolkit.
//!
//! This umbrella crate re-exports the draper crates behind one name:
//!
//! - [`grid`] - Cell-field grid container and legacy VTK I/O
//! - [`plan`] - Laminate plan model, datums, thickness expressions, materials
//! - [`engine`] - Validation, ply evaluation, ordering, orchestration
//!
//! # Quick Start
//!
//! ```no_run
//! use draper::prelude::*;
//!
//! let plan = LaminatePlan::load("lamplan.yaml").unwrap();
//! let matdb = MaterialDb::load("matdb.json").unwrap();
//! let mut grid = load_grid("blade.vtk").unwrap();
//!
//! let report = drape(&plan, &mut grid, &matdb).unwrap();
//! println!("{report}");
//!
//! save_grid(&grid, "draped.vtk").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

/// Cell-field grid container and VTK I/O.
pub mod grid {
    pub use draper_grid::*;
}

/// Laminate plan model and material database.
pub mod plan {
    pub use draper_plan::*;
}

/// Validation, evaluation, and orchestration.
pub mod engine {
    pub use draper_engine::*;
}

/// The common imports for driving a draping run.
pub mod prelude {
    pub use draper_engine::{drape, validate, DrapeError, DrapeReport, DrapeResult};
    pub use draper_grid::{load_grid, save_grid, CellArray, CellGrid};
    pub use draper_plan::{LaminatePlan, MaterialDb};
}
