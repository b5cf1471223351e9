//! Programmatic draping: build a plan and grid in code, run the pipeline,
//! and write the annotated grid.
//!
//! ```bash
//! cargo run -p draper --example blade_drape
//! ```

use std::collections::BTreeMap;

use draper::plan::{
    CompareOp, Condition, Datum, LaminatePlan, Material, Operand, Ply, ThicknessSpec,
};
use draper::prelude::*;

fn main() -> anyhow::Result<()> {
    // A short strip of quad cells along the span, with the fields a blade
    // mesher would normally provide.
    let mut grid = CellGrid::from_parts(
        vec![
            [0.0, 0.0, 0.0],
            [10.0, 0.0, 0.0],
            [20.0, 0.0, 0.0],
            [30.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [10.0, 1.0, 0.0],
            [20.0, 1.0, 0.0],
            [30.0, 1.0, 0.0],
        ],
        vec![vec![0, 1, 5, 4], vec![1, 2, 6, 5], vec![2, 3, 7, 6]],
    );
    grid.set_cell_field("r", CellArray::Float(vec![5.0, 15.0, 25.0]))?;
    grid.set_cell_field("distance_from_te", CellArray::Float(vec![0.2, 0.2, 0.05]))?;

    let mut datums = BTreeMap::new();
    datums.insert(
        "te_offset".to_string(),
        Datum::new("r", vec![(0.0, 0.0), (20.0, 0.1), (40.0, 0.2)])?,
    );

    let plan = LaminatePlan {
        datums,
        plies: vec![
            Ply {
                mat: "carbon".to_string(),
                angle: 45.0,
                thickness: ThicknessSpec::Constant(0.45e-3),
                parent: "sparcap".to_string(),
                conditions: vec![Condition {
                    field: "r".to_string(),
                    operator: CompareOp::InRange,
                    operand: Operand::Range(10.0, 20.0),
                }],
                key: 100,
            },
            Ply {
                mat: "glass".to_string(),
                angle: 0.0,
                thickness: ThicknessSpec::Constant(1.2e-3),
                parent: "allover".to_string(),
                conditions: vec![Condition {
                    field: "distance_from_te".to_string(),
                    operator: CompareOp::Gt,
                    operand: Operand::Datum("te_offset".to_string()),
                }],
                key: 102,
            },
        ],
    };

    let mut matdb = MaterialDb::new();
    matdb.insert("carbon", Material { id: 1 });
    matdb.insert("glass", Material { id: 2 });

    let report = drape(&plan, &mut grid, &matdb)?;
    print!("{report}");

    save_grid(&grid, "blade_draped.vtk")?;
    println!("annotated grid written to blade_draped.vtk");
    Ok(())
}
