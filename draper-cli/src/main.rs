//! Command-line interface for the draper toolkit.
//!
//! # Commands
//!
//! - `draper drape` - Assign composite plies from a laminate plan to a grid
//! - `draper plot` - Render a scalar cell field of a grid as an SVG
//!
//! ```bash
//! draper drape --lamplan lamplan.yaml --grid blade.vtk --matdb matdb.json \
//!     --output draped.vtk
//! draper plot --grid draped.vtk --output thickness.svg
//! ```
//!
//! Both commands exit non-zero with a single diagnostic line on any error.

mod plot;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use draper::prelude::*;

/// Assign composite material plies to FEA model elements.
#[derive(Parser)]
#[command(name = "draper")]
#[command(about = "Assign composite material plies to FEA model elements", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the draping pipeline: plan + grid + material database -> annotated grid
    Drape {
        /// Laminate plan file (YAML or JSON)
        #[arg(long)]
        lamplan: PathBuf,

        /// Input grid file (legacy ASCII VTK)
        #[arg(long)]
        grid: PathBuf,

        /// Material database file (JSON)
        #[arg(long, short)]
        matdb: PathBuf,

        /// Output grid file
        #[arg(long, short)]
        output: PathBuf,

        /// Verbose output (per-ply coverage, validation trace)
        #[arg(long, short)]
        verbose: bool,
    },

    /// Plot a scalar cell field of a grid as an SVG
    Plot {
        /// Input grid file (legacy ASCII VTK)
        #[arg(long)]
        grid: PathBuf,

        /// Output SVG file
        #[arg(long, short)]
        output: PathBuf,

        /// Scalar cell field to color by
        #[arg(long, short, default_value = "total_thickness")]
        scalar: String,

        /// Point coordinate to use as plot x axis (x, y, or z)
        #[arg(long, short = 'x', default_value = "x")]
        x_axis: String,

        /// Point coordinate to use as plot y axis (x, y, or z)
        #[arg(long, short = 'y', default_value = "y")]
        y_axis: String,

        /// Verbose output
        #[arg(long, short)]
        verbose: bool,
    },
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    fmt().with_env_filter(filter).with_target(false).init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Drape {
            lamplan,
            grid,
            matdb,
            output,
            verbose,
        } => {
            init_tracing(verbose);
            run_drape(&lamplan, &grid, &matdb, &output)
        }
        Commands::Plot {
            grid,
            output,
            scalar,
            x_axis,
            y_axis,
            verbose,
        } => {
            init_tracing(verbose);
            plot::run_plot(&grid, &output, &scalar, &x_axis, &y_axis)
        }
    }
}

fn run_drape(lamplan: &Path, grid_path: &Path, matdb: &Path, output: &Path) -> Result<()> {
    let plan = LaminatePlan::load(lamplan)?;
    let matdb = MaterialDb::load(matdb)?;
    let mut grid = load_grid(grid_path)?;

    let report = drape(&plan, &mut grid, &matdb)?;
    save_grid(&grid, output)?;

    info!(output = %output.display(), "annotated grid written");
    print!("{report}");
    Ok(())
}
