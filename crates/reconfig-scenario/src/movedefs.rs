//! JSON move definitions.
//!
//! A move file holds one definition or an array of them:
//!
//! ```json
//! {
//!   "name": "slide",
//!   "def": ["##",
//!           "SF"],
//!   "animSeq": [{ "kind": "slide", "offset": [1, 0] }]
//! }
//! ```
//!
//! `def` is a character grid (see [`Move::from_grid`]); 3D moves give a
//! list of layers instead, lowest layer first. `animSeq` is optional and
//! defaults to one straight slide.

use crate::error::ScenarioError;
use log::{debug, warn};
use reconfig_core::Coord;
use reconfig_moves::{AnimKind, AnimStep, Move};
use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GridDef {
    Flat(Vec<String>),
    Layered(Vec<Vec<String>>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
enum AnimDef {
    Slide { offset: Vec<i32> },
    Pivot { offset: Vec<i32>, anchor: Vec<i32> },
}

impl From<AnimDef> for AnimStep {
    fn from(def: AnimDef) -> Self {
        match def {
            AnimDef::Slide { offset } => AnimStep {
                kind: AnimKind::Slide,
                offset: Coord::from_vec(offset),
            },
            AnimDef::Pivot { offset, anchor } => AnimStep {
                kind: AnimKind::Pivot {
                    anchor: Coord::from_vec(anchor),
                },
                offset: Coord::from_vec(offset),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MoveDef {
    name: String,
    #[serde(default)]
    order: Option<usize>,
    def: GridDef,
    #[serde(default)]
    anim_seq: Vec<AnimDef>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MoveFile {
    One(MoveDef),
    Many(Vec<MoveDef>),
}

impl MoveDef {
    fn into_move(self) -> Result<Move, ScenarioError> {
        let layers = match self.def {
            GridDef::Flat(rows) => vec![rows],
            GridDef::Layered(layers) => layers,
        };
        let order = self
            .order
            .unwrap_or(if layers.len() > 1 { 3 } else { 2 });
        let anim = self.anim_seq.into_iter().map(AnimStep::from).collect();
        Ok(Move::from_grid(&self.name, order, &layers, anim)?)
    }
}

impl MoveFile {
    fn into_moves(self) -> Result<Vec<Move>, ScenarioError> {
        let defs = match self {
            MoveFile::One(def) => vec![def],
            MoveFile::Many(defs) => defs,
        };
        defs.into_iter().map(MoveDef::into_move).collect()
    }
}

/// Parse every move definition in `text`.
pub fn parse_move_defs(text: &str) -> Result<Vec<Move>, ScenarioError> {
    serde_json::from_str::<MoveFile>(text)?.into_moves()
}

/// Read and parse one move file.
pub fn load_move_file(path: &Path) -> Result<Vec<Move>, ScenarioError> {
    let text = fs::read_to_string(path).map_err(|e| ScenarioError::io(path, e))?;
    serde_json::from_str::<MoveFile>(&text)
        .map_err(|e| ScenarioError::json(path, e))?
        .into_moves()
}

/// Load every `*.json` file in `dir`, in file-name order.
///
/// Definitions of higher order than `order` are skipped with a warning;
/// lower-order ones are kept and lifted when the catalog is built.
pub fn load_moves_dir(dir: &Path, order: usize) -> Result<Vec<Move>, ScenarioError> {
    let mut paths: Vec<_> = fs::read_dir(dir)
        .map_err(|e| ScenarioError::io(dir, e))?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<_, _>>()
        .map_err(|e| ScenarioError::io(dir, e))?;
    paths.retain(|p| p.extension().is_some_and(|ext| ext == "json"));
    paths.sort();

    let mut out = Vec::new();
    for path in &paths {
        for mv in load_move_file(path)? {
            if mv.order() > order {
                warn!(
                    "[Moves] skipping {}-dimensional move '{}' from {}",
                    mv.order(),
                    mv.name(),
                    path.display()
                );
                continue;
            }
            out.push(mv);
        }
    }
    debug!(
        "[Moves] loaded {} definitions from {} files in {}",
        out.len(),
        paths.len(),
        dir.display()
    );
    Ok(out)
}
