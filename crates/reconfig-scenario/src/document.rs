//! JSON scenario documents.
//!
//! ```json
//! {
//!   "name": "L-shape",
//!   "order": 2,
//!   "axisSize": 3,
//!   "modules": [
//!     { "position": [0, 0], "static": false,
//!       "properties": { "colorProperty": [255, 0, 0] } }
//!   ],
//!   "boundaries": [[2, 2]]
//! }
//! ```
//!
//! Positions are interior lattice coordinates. Optional keys:
//! `description`, `moduleType`, `tensorPadding`, `adjacencyOffsets`,
//! `boundaries`, and per-module `static` and `properties`.

use crate::error::ScenarioError;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Description used when a scenario does not provide one.
pub const DEFAULT_DESCRIPTION: &str = "Scenario file generated by pathfinder.";

/// Module type used when a scenario does not provide one.
pub const DEFAULT_MODULE_TYPE: &str = "CUBE";

/// One module entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModuleDoc {
    /// Interior coordinates.
    pub position: Vec<i32>,

    /// Whether the module never moves.
    #[serde(rename = "static", default)]
    pub is_static: bool,

    /// Property definitions keyed by property name.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

/// A whole scenario (initial state) or goal file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioDoc {
    /// Scene name for export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Scene description for export.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Module shape for export (`CUBE`, `RHOMBIC_DODECAHEDRON`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module_type: Option<String>,

    /// Lattice order.
    pub order: usize,

    /// Interior extent per axis.
    pub axis_size: u32,

    /// Boundary margin per side.
    #[serde(default)]
    pub tensor_padding: u32,

    /// Custom adjacency offsets. Cube adjacency when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjacency_offsets: Option<Vec<Vec<i32>>>,

    /// Modules, movable and static, in file order.
    pub modules: Vec<ModuleDoc>,

    /// Extra boundary cells.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boundaries: Vec<Vec<i32>>,
}

impl ScenarioDoc {
    /// Parse a document from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Read and parse `path`.
    pub fn from_path(path: &Path) -> Result<Self, ScenarioError> {
        let file = File::open(path).map_err(|e| ScenarioError::io(path, e))?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| ScenarioError::json(path, e))
    }

    /// The scene name, or `fallback`'s file stem with `_initial` removed.
    pub fn scene_name(&self, fallback: &Path) -> String {
        self.name.clone().unwrap_or_else(|| {
            let stem = fallback
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            stem.replacen("_initial", "", 1)
        })
    }

    /// The description, or [`DEFAULT_DESCRIPTION`].
    pub fn scene_description(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
    }

    /// The module type, or [`DEFAULT_MODULE_TYPE`].
    pub fn module_type(&self) -> &str {
        self.module_type.as_deref().unwrap_or(DEFAULT_MODULE_TYPE)
    }

    /// Number of movable modules.
    pub fn movable_count(&self) -> usize {
        self.modules.iter().filter(|m| !m.is_static).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = r#"{
        "order": 2,
        "axisSize": 3,
        "modules": [
            { "position": [0, 0], "static": false },
            { "position": [1, 0] },
            { "position": [2, 0], "static": true,
              "properties": { "colorProperty": 255 } }
        ]
    }"#;

    #[test]
    fn optional_keys_default() {
        let doc = ScenarioDoc::from_reader(MINIMAL.as_bytes()).unwrap();
        assert_eq!(doc.order, 2);
        assert_eq!(doc.tensor_padding, 0);
        assert!(doc.adjacency_offsets.is_none());
        assert!(doc.boundaries.is_empty());
        assert_eq!(doc.movable_count(), 2);
        assert!(!doc.modules[1].is_static);
        assert_eq!(doc.modules[2].properties.len(), 1);
        assert_eq!(doc.scene_description(), DEFAULT_DESCRIPTION);
        assert_eq!(doc.module_type(), "CUBE");
    }

    #[test]
    fn scene_name_falls_back_to_trimmed_stem() {
        let mut doc = ScenarioDoc::from_reader(MINIMAL.as_bytes()).unwrap();
        assert_eq!(doc.scene_name(Path::new("dir/tower_initial.json")), "tower");
        assert_eq!(doc.scene_name(Path::new("plain.json")), "plain");
        doc.name = Some("Named".into());
        assert_eq!(doc.scene_name(Path::new("x_initial.json")), "Named");
    }

    #[test]
    fn missing_required_key_is_a_json_error() {
        let err = ScenarioDoc::from_reader(r#"{ "order": 2, "modules": [] }"#.as_bytes())
            .unwrap_err();
        assert!(matches!(err, ScenarioError::Json { path: None, .. }));
    }

    #[test]
    fn camel_case_round_trip() {
        let doc = ScenarioDoc::from_reader(MINIMAL.as_bytes()).unwrap();
        let text = serde_json::to_string(&doc).unwrap();
        assert!(text.contains("\"axisSize\":3"));
        assert!(text.contains("\"static\":true"));
        assert_eq!(ScenarioDoc::from_reader(text.as_bytes()).unwrap(), doc);
    }
}
