//! Laminate plan model for composite draping.
//!
//! This crate holds everything the draping engine needs to know about *what*
//! to drape: the plan document model and its compiled form, named datum
//! interpolation tables, coverage conditions, thickness expressions, and the
//! material database.
//!
//! # Document model
//!
//! Plans are written as YAML or JSON:
//!
//! ```yaml
//! datums:
//!   te:
//!     base: r
//!     values: [[0, 0.1], [2, 0.2]]
//! plies:
//!   - mat: carbon
//!     angle: 45
//!     thickness: 0.001
//!     parent: sparcap
//!     conditions:
//!       - { field: r, operator: in_range, operand: [0.5, 1.5] }
//!     key: 10
//! ```
//!
//! Loading compiles the loose document into typed structures once: operator
//! tokens to [`CompareOp`], operands to [`Operand`], thickness entries to
//! [`ThicknessSpec`] (number → constant, datum name → datum reference,
//! anything else → parsed [`Expr`]).
//!
//! # Example
//!
//! ```
//! use draper_plan::{LaminatePlan, MaterialDb, ThicknessSpec};
//!
//! let plan = LaminatePlan::from_yaml_str(r"
//! plies:
//!   - { mat: carbon, angle: 0, thickness: 0.001, parent: plate, conditions: [], key: 1 }
//! ").unwrap();
//! assert_eq!(plan.plies[0].thickness, ThicknessSpec::Constant(0.001));
//!
//! let matdb = MaterialDb::from_json_str(r#"{"carbon": {"id": 7}}"#).unwrap();
//! assert!(matdb.contains("carbon"));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

mod condition;
mod datum;
mod error;
mod expr;
mod matdb;
mod plan;

pub use condition::{CompareOp, Condition, Operand};
pub use datum::Datum;
pub use error::{PlanError, PlanResult};
pub use expr::{BinaryOp, Expr};
pub use matdb::{Material, MaterialDb};
pub use plan::{LaminatePlan, Ply, ThicknessSpec};
