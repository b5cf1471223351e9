//! Laminate plan documents and their compiled form.
//!
//! Plans are written as YAML or JSON documents (see [`LaminatePlan::load`]).
//! The loosely-typed document is compiled once into the typed form the engine
//! consumes: operator tokens become [`CompareOp`] variants, operands and
//! thickness specs become tagged enums, and datums are validated.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::condition::{CompareOp, Condition, Operand};
use crate::datum::Datum;
use crate::error::{PlanError, PlanResult};
use crate::expr::Expr;

/// How a ply's thickness is obtained.
#[derive(Debug, Clone, PartialEq)]
pub enum ThicknessSpec {
    /// A constant thickness for every covered cell.
    Constant(f64),
    /// Interpolate the named datum against its base field.
    DatumRef(String),
    /// Evaluate an arithmetic expression over cell fields.
    Expression(Expr),
}

/// A single ply: material, orientation, thickness, and coverage conditions.
///
/// Conditions conjunct: a cell is covered when every condition holds. An
/// empty condition list covers all cells.
#[derive(Debug, Clone, PartialEq)]
pub struct Ply {
    /// Material name, validated against the material database.
    pub mat: String,
    /// Fiber angle in degrees.
    pub angle: f64,
    /// Thickness specification.
    pub thickness: ThicknessSpec,
    /// Grouping label, appears in output field names.
    pub parent: String,
    /// Coverage conditions (conjunctive).
    pub conditions: Vec<Condition>,
    /// Ordering tag; primary sort key for placement order.
    pub key: i64,
}

/// A compiled laminate plan: datums plus plies in definition order.
///
/// The position of a ply in [`plies`](Self::plies) is its *definition index*,
/// the tie-breaker when two plies share a key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaminatePlan {
    /// Named interpolation tables.
    pub datums: BTreeMap<String, Datum>,
    /// Plies in definition order.
    pub plies: Vec<Ply>,
}

impl LaminatePlan {
    /// Load a plan from a YAML (`.yaml`/`.yml`) or JSON (`.json`) file.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::FileNotFound`] for a missing path,
    /// [`PlanError::UnknownFormat`] for an unrecognized extension, and any
    /// compilation error from [`LaminatePlan::from_yaml_str`].
    pub fn load<P: AsRef<Path>>(path: P) -> PlanResult<Self> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();

        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlanError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PlanError::Io(e)
            }
        })?;

        match extension.as_str() {
            "yaml" | "yml" => Self::from_yaml_str(&content),
            "json" => Self::from_json_str(&content),
            _ => Err(PlanError::UnknownFormat { extension }),
        }
    }

    /// Parse and compile a plan from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Yaml`] for a malformed document and any error
    /// from compilation (bad datum, unknown operator, operand arity,
    /// thickness parse failure).
    pub fn from_yaml_str(content: &str) -> PlanResult<Self> {
        let doc: PlanDoc = serde_yaml::from_str(content)?;
        doc.compile()
    }

    /// Parse and compile a plan from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Json`] for a malformed document and any error
    /// from compilation.
    pub fn from_json_str(content: &str) -> PlanResult<Self> {
        let doc: PlanDoc = serde_json::from_str(content)?;
        doc.compile()
    }
}

// ============================================================================
// Document model
// ============================================================================

/// The loosely-typed plan document as written on disk.
#[derive(Debug, Deserialize)]
struct PlanDoc {
    #[serde(default)]
    datums: BTreeMap<String, DatumDoc>,
    plies: Vec<PlyDoc>,
}

#[derive(Debug, Deserialize)]
struct DatumDoc {
    base: String,
    values: Vec<(f64, f64)>,
}

#[derive(Debug, Deserialize)]
struct PlyDoc {
    mat: String,
    angle: f64,
    thickness: ThicknessDoc,
    parent: String,
    #[serde(default)]
    conditions: Vec<ConditionDoc>,
    key: i64,
}

/// Thickness as written: a number, or a string naming a datum or expression.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ThicknessDoc {
    Number(f64),
    Text(String),
}

#[derive(Debug, Deserialize)]
struct ConditionDoc {
    field: String,
    operator: String,
    operand: OperandDoc,
}

/// Operand as written: a number, a `[lo, hi]` pair, or a datum name.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OperandDoc {
    Number(f64),
    Pair(Vec<f64>),
    Text(String),
}

impl PlanDoc {
    fn compile(self) -> PlanResult<LaminatePlan> {
        let mut datums = BTreeMap::new();
        for (name, doc) in self.datums {
            let datum = Datum::new(doc.base, doc.values).map_err(|e| match e {
                PlanError::InvalidDatum { reason, .. } => PlanError::InvalidDatum {
                    name: name.clone(),
                    reason,
                },
                other => other,
            })?;
            datums.insert(name, datum);
        }

        let mut plies = Vec::with_capacity(self.plies.len());
        for doc in self.plies {
            let mut conditions = Vec::with_capacity(doc.conditions.len());
            for cond in doc.conditions {
                let operator = CompareOp::from_token(&cond.operator)?;
                let operand = compile_operand(operator, cond.operand)?;
                let condition = Condition {
                    field: cond.field,
                    operator,
                    operand,
                };
                condition.check_arity()?;
                conditions.push(condition);
            }

            let thickness = compile_thickness(doc.thickness, &datums)?;
            plies.push(Ply {
                mat: doc.mat,
                angle: doc.angle,
                thickness,
                parent: doc.parent,
                conditions,
                key: doc.key,
            });
        }

        Ok(LaminatePlan { datums, plies })
    }
}

fn compile_operand(operator: CompareOp, doc: OperandDoc) -> PlanResult<Operand> {
    match doc {
        OperandDoc::Number(v) => Ok(Operand::Scalar(v)),
        OperandDoc::Pair(values) => {
            if values.len() == 2 {
                Ok(Operand::Range(values[0], values[1]))
            } else {
                Err(PlanError::operand_arity(
                    operator.token(),
                    format!("a {}-element list", values.len()),
                ))
            }
        }
        OperandDoc::Text(name) => Ok(Operand::Datum(name)),
    }
}

/// Disambiguate a thickness entry.
///
/// A number is a constant. A string naming a datum is a datum reference —
/// the datum wins even if the string would also parse as an expression.
/// Anything else must parse as an expression.
fn compile_thickness(
    doc: ThicknessDoc,
    datums: &BTreeMap<String, Datum>,
) -> PlanResult<ThicknessSpec> {
    match doc {
        ThicknessDoc::Number(v) => Ok(ThicknessSpec::Constant(v)),
        ThicknessDoc::Text(text) => {
            if datums.contains_key(&text) {
                if let Ok(expr) = Expr::parse(&text) {
                    if !expr.is_trivial() {
                        warn!(
                            thickness = %text,
                            "thickness string matches a datum name but also parses \
                             as an expression; the datum takes precedence"
                        );
                    }
                }
                return Ok(ThicknessSpec::DatumRef(text));
            }
            let expr = Expr::parse(&text)?;
            Ok(ThicknessSpec::Expression(expr))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;

    const PLAN_YAML: &str = r"
datums:
  te:
    base: r
    values: [[0, 0.1], [2, 0.2]]
plies:
  - mat: carbon
    angle: 45
    thickness: 0.001
    parent: sparcap
    conditions:
      - { field: r, operator: in_range, operand: [0.5, 1.5] }
      - { field: distance_from_te, operator: '>', operand: te }
    key: 10
  - mat: glass
    angle: 0
    thickness: te
    parent: shell
    conditions: []
    key: 5
";

    #[test]
    fn test_compile_yaml_plan() {
        let plan = LaminatePlan::from_yaml_str(PLAN_YAML).unwrap();
        assert_eq!(plan.datums.len(), 1);
        assert_eq!(plan.plies.len(), 2);

        let first = &plan.plies[0];
        assert_eq!(first.mat, "carbon");
        assert_eq!(first.angle, 45.0);
        assert_eq!(first.thickness, ThicknessSpec::Constant(0.001));
        assert_eq!(first.key, 10);
        assert_eq!(first.conditions.len(), 2);
        assert_eq!(first.conditions[0].operator, CompareOp::InRange);
        assert_eq!(first.conditions[0].operand, Operand::Range(0.5, 1.5));
        assert_eq!(
            first.conditions[1].operand,
            Operand::Datum("te".to_string())
        );

        let second = &plan.plies[1];
        assert_eq!(second.thickness, ThicknessSpec::DatumRef("te".to_string()));
        assert!(second.conditions.is_empty());
    }

    #[test]
    fn test_thickness_expression() {
        let yaml = r"
plies:
  - mat: carbon
    angle: 0
    thickness: 0.001 + r * 0.0005
    parent: plate
    conditions: []
    key: 1
";
        let plan = LaminatePlan::from_yaml_str(yaml).unwrap();
        match &plan.plies[0].thickness {
            ThicknessSpec::Expression(expr) => {
                assert_eq!(expr.field_names().into_iter().collect::<Vec<_>>(), vec!["r"]);
            }
            other => panic!("expected expression, got {other:?}"),
        }
    }

    #[test]
    fn test_datum_wins_over_expression() {
        let yaml = r"
datums:
  t_root:
    base: r
    values: [[0, 0.001], [1, 0.002]]
plies:
  - mat: carbon
    angle: 0
    thickness: t_root
    parent: plate
    conditions: []
    key: 1
";
        let plan = LaminatePlan::from_yaml_str(yaml).unwrap();
        assert_eq!(
            plan.plies[0].thickness,
            ThicknessSpec::DatumRef("t_root".to_string())
        );
    }

    #[test]
    fn test_word_operator_tokens() {
        let yaml = r"
plies:
  - mat: carbon
    angle: 0
    thickness: 0.001
    parent: plate
    conditions:
      - { field: r, operator: ge, operand: 0.5 }
    key: 1
";
        let plan = LaminatePlan::from_yaml_str(yaml).unwrap();
        assert_eq!(plan.plies[0].conditions[0].operator, CompareOp::Ge);
    }

    #[test]
    fn test_unknown_operator() {
        let yaml = r"
plies:
  - mat: carbon
    angle: 0
    thickness: 0.001
    parent: plate
    conditions:
      - { field: r, operator: '~=', operand: 0.5 }
    key: 1
";
        let err = LaminatePlan::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, PlanError::UnknownOperator { .. }));
    }

    #[test]
    fn test_range_op_with_scalar_operand() {
        let yaml = r"
plies:
  - mat: carbon
    angle: 0
    thickness: 0.001
    parent: plate
    conditions:
      - { field: r, operator: in_range, operand: 0.5 }
    key: 1
";
        let err = LaminatePlan::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, PlanError::OperandArityMismatch { .. }));
    }

    #[test]
    fn test_three_element_operand_list() {
        let yaml = r"
plies:
  - mat: carbon
    angle: 0
    thickness: 0.001
    parent: plate
    conditions:
      - { field: r, operator: in_range, operand: [0, 1, 2] }
    key: 1
";
        let err = LaminatePlan::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, PlanError::OperandArityMismatch { .. }));
    }

    #[test]
    fn test_invalid_datum_names_the_datum() {
        let yaml = r"
datums:
  broken:
    base: r
    values: [[0, 0.1]]
plies: []
";
        let err = LaminatePlan::from_yaml_str(yaml).unwrap_err();
        match err {
            PlanError::InvalidDatum { name, .. } => assert_eq!(name, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_thickness_expression() {
        let yaml = r"
plies:
  - mat: carbon
    angle: 0
    thickness: 0.001 + (r *
    parent: plate
    conditions: []
    key: 1
";
        let err = LaminatePlan::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, PlanError::ParseError { .. }));
    }

    #[test]
    fn test_json_plan() {
        let json = r#"{
  "plies": [
    {
      "mat": "carbon",
      "angle": 0,
      "thickness": 0.001,
      "parent": "plate",
      "conditions": [],
      "key": 1
    }
  ]
}"#;
        let plan = LaminatePlan::from_json_str(json).unwrap();
        assert_eq!(plan.plies.len(), 1);
    }

    #[test]
    fn test_load_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.yaml");
        std::fs::write(&path, PLAN_YAML).unwrap();
        let plan = LaminatePlan::load(&path).unwrap();
        assert_eq!(plan.plies.len(), 2);

        let bad = dir.path().join("plan.toml");
        std::fs::write(&bad, "x = 1").unwrap();
        let err = LaminatePlan::load(&bad).unwrap_err();
        assert!(matches!(err, PlanError::UnknownFormat { .. }));
    }
}
