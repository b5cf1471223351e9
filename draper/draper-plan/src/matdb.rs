//! Material database: name to material-record mapping.

use std::path::Path;

use hashbrown::HashMap;
use serde::Deserialize;

use crate::error::{PlanError, PlanResult};

/// A material record.
///
/// The draping engine only consumes the id; any further document fields
/// (stiffness, density, supplier notes) are ignored on load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Material {
    /// Integer id written into the per-ply material arrays.
    pub id: i64,
}

/// A finite mapping from material name to material record.
///
/// # Example
///
/// ```
/// use draper_plan::MaterialDb;
///
/// let db = MaterialDb::from_json_str(r#"{"carbon": {"id": 7, "E11": 135e9}}"#).unwrap();
/// assert_eq!(db.get("carbon").unwrap().id, 7);
/// assert!(db.get("kevlar").is_none());
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct MaterialDb {
    materials: HashMap<String, Material>,
}

impl MaterialDb {
    /// Create an empty database.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a database from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::FileNotFound`] if the path does not exist, or
    /// [`PlanError::Json`] if the document is malformed.
    pub fn load<P: AsRef<Path>>(path: P) -> PlanResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PlanError::FileNotFound {
                    path: path.to_path_buf(),
                }
            } else {
                PlanError::Io(e)
            }
        })?;
        Self::from_json_str(&content)
    }

    /// Parse a database from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Json`] if the document is malformed.
    pub fn from_json_str(content: &str) -> PlanResult<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Look up a material by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Material> {
        self.materials.get(name)
    }

    /// Whether a material exists under `name`.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.materials.contains_key(name)
    }

    /// Add or replace a material.
    pub fn insert(&mut self, name: impl Into<String>, material: Material) {
        self.materials.insert(name.into(), material);
    }

    /// Number of materials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Whether the database is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.materials.is_empty()
    }

    /// Material names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.materials.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
