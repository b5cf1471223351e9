//! Ply ordering and output field naming.
//!
//! Plies are placed in the stable order `(key, definition_index)`, both
//! ascending. The 1-based rank of a ply under that order appears zero-padded
//! in its output field names: `ply_{rank:06}_{parent}_{key}_{suffix}`.

use draper_plan::Ply;

/// Output-array suffixes emitted per ply.
pub const PLY_SUFFIXES: [&str; 3] = ["material", "angle", "thickness"];

/// A ply with its placement rank and name prefix.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedPly<'a> {
    /// 1-based rank under the stable `(key, definition_index)` order.
    pub rank: usize,
    /// Position of the ply in the plan's definition order.
    pub def_index: usize,
    /// The ply itself.
    pub ply: &'a Ply,
    /// Field-name prefix `ply_{rank:06}_{parent}_{key}`.
    pub prefix: String,
}

impl PlacedPly<'_> {
    /// Full output field name for one of the [`PLY_SUFFIXES`].
    #[must_use]
    pub fn field_name(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }
}

/// Sort plies into placement order and assign ranks and name prefixes.
///
/// The sort is stable, so plies sharing a key keep their definition order.
#[must_use]
pub fn order_plies(plies: &[Ply]) -> Vec<PlacedPly<'_>> {
    let mut indexed: Vec<(usize, &Ply)> = plies.iter().enumerate().collect();
    indexed.sort_by_key(|&(_, ply)| ply.key);

    indexed
        .into_iter()
        .enumerate()
        .map(|(i, (def_index, ply))| {
            let rank = i + 1;
            PlacedPly {
                rank,
                def_index,
                ply,
                prefix: format!("ply_{:06}_{}_{}", rank, ply.parent, ply.key),
            }
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use draper_plan::ThicknessSpec;

    fn ply(parent: &str, key: i64) -> Ply {
        Ply {
            mat: "carbon".to_string(),
            angle: 0.0,
            thickness: ThicknessSpec::Constant(0.001),
            parent: parent.to_string(),
            conditions: vec![],
            key,
        }
    }

    #[test]
    fn test_sort_by_key() {
        let plies = vec![ply("a", 20), ply("b", 10), ply("c", 30)];
        let placed = order_plies(&plies);

        assert_eq!(placed[0].ply.parent, "b");
        assert_eq!(placed[1].ply.parent, "a");
        assert_eq!(placed[2].ply.parent, "c");
        assert_eq!(placed[0].rank, 1);
        assert_eq!(placed[2].rank, 3);
    }

    #[test]
    fn test_equal_keys_keep_definition_order() {
        let plies = vec![ply("first", 5), ply("second", 5)];
        let placed = order_plies(&plies);
        assert_eq!(placed[0].ply.parent, "first");
        assert_eq!(placed[1].ply.parent, "second");

        // Swapping the definition order swaps the ranks.
        let swapped = vec![ply("second", 5), ply("first", 5)];
        let placed = order_plies(&swapped);
        assert_eq!(placed[0].ply.parent, "second");
        assert_eq!(placed[1].ply.parent, "first");
    }

    #[test]
    fn test_def_index_survives_sorting() {
        let plies = vec![ply("a", 20), ply("b", 10)];
        let placed = order_plies(&plies);
        assert_eq!(placed[0].def_index, 1);
        assert_eq!(placed[1].def_index, 0);
    }

    #[test]
    fn test_name_format() {
        let plies = vec![ply("sparcap", 12)];
        let placed = order_plies(&plies);
        assert_eq!(placed[0].prefix, "ply_000001_sparcap_12");
        assert_eq!(
            placed[0].field_name("material"),
            "ply_000001_sparcap_12_material"
        );
        assert_eq!(placed[0].field_name("angle"), "ply_000001_sparcap_12_angle");
        assert_eq!(
            placed[0].field_name("thickness"),
            "ply_000001_sparcap_12_thickness"
        );
    }

    #[test]
    fn test_negative_keys_sort_first() {
        let plies = vec![ply("a", 1), ply("b", -4)];
        let placed = order_plies(&plies);
        assert_eq!(placed[0].ply.parent, "b");
        assert_eq!(placed[0].prefix, "ply_000001_b_-4");
    }
}
