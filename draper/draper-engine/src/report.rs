//! Result types for a draping run.

/// One placed ply in the final order.
#[derive(Debug, Clone, PartialEq)]
pub struct PlyPlacement {
    /// Field-name prefix `ply_{rank:06}_{parent}_{key}`.
    pub prefix: String,
    /// Grouping label.
    pub parent: String,
    /// Ordering key.
    pub key: i64,
    /// Material name.
    pub mat: String,
    /// Number of cells the ply covers.
    pub covered: usize,
}

/// Summary of a completed draping run.
///
/// # Example
///
/// ```
/// use draper_engine::DrapeReport;
///
/// let report = DrapeReport::default();
/// assert_eq!(report.ply_count(), 0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrapeReport {
    /// Number of cells in the grid.
    pub cells: usize,
    /// Placed plies in output order.
    pub plies: Vec<PlyPlacement>,
    /// Minimum of the `total_thickness` array.
    pub min_total_thickness: f64,
    /// Maximum of the `total_thickness` array.
    pub max_total_thickness: f64,
}

impl DrapeReport {
    /// Number of placed plies.
    #[must_use]
    pub fn ply_count(&self) -> usize {
        self.plies.len()
    }

    /// Plies that cover no cells at all.
    ///
    /// Usually a sign of a condition that never holds; worth a look even
    /// though it is not an error.
    #[must_use]
    pub fn empty_plies(&self) -> Vec<&PlyPlacement> {
        self.plies.iter().filter(|p| p.covered == 0).collect()
    }
}

impl std::fmt::Display for DrapeReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Draping complete:")?;
        writeln!(f, "  Cells: {}", self.cells)?;
        writeln!(f, "  Plies placed: {}", self.plies.len())?;
        for ply in &self.plies {
            writeln!(
                f,
                "    {} ({}, {} cells)",
                ply.prefix, ply.mat, ply.covered
            )?;
        }
        writeln!(
            f,
            "  Total thickness: {:.6} .. {:.6}",
            self.min_total_thickness, self.max_total_thickness
        )?;
        let empty = self.empty_plies().len();
        if empty > 0 {
            writeln!(f, "  Plies covering no cells: {empty}")?;
        }
        Ok(())
    }
}
