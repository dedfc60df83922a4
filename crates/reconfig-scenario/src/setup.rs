//! Build a populated [`Lattice`] and goal [`Configuration`] from scenario
//! documents.

use crate::document::ScenarioDoc;
use crate::error::ScenarioError;
use crate::properties::{palette, PropertyRegistry};
use log::{debug, info, warn};
use reconfig_core::{Coord, PropertySet};
use reconfig_lattice::{
    AdjacencyMode, Configuration, Lattice, LatticeConfig, ModuleRegistry, Occupant,
};
use std::path::{Path, PathBuf};

/// Options that apply while reading scenario files.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    /// Drop all module properties (`--ignore-colors`).
    pub ignore_properties: bool,
    /// Use this adjacency instead of the file's `adjacencyOffsets`.
    pub adjacency_override: Option<AdjacencyMode>,
}

/// Header fields carried through to `.scen` export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScenInfo {
    /// First header line.
    pub name: String,
    /// Second header line.
    pub description: String,
    /// Third header line.
    pub module_type: String,
}

/// A loaded initial state.
#[derive(Clone, Debug)]
pub struct Scenario {
    /// Export header.
    pub info: ScenInfo,
    /// The populated lattice.
    pub lattice: Lattice,
    /// Whether properties take part in search and export.
    pub uses_properties: bool,
}

impl Scenario {
    /// Read `path` and build its lattice.
    pub fn load(
        path: &Path,
        registry: &PropertyRegistry,
        options: &LoadOptions,
    ) -> Result<Self, ScenarioError> {
        let doc = ScenarioDoc::from_path(path)?;
        info!("[Scenario] loading {}", path.display());
        Self::from_doc(&doc, path, registry, options)
    }

    /// Build from an already parsed document. `path` is only used for the
    /// scene-name fallback.
    pub fn from_doc(
        doc: &ScenarioDoc,
        path: &Path,
        registry: &PropertyRegistry,
        options: &LoadOptions,
    ) -> Result<Self, ScenarioError> {
        let lattice = build_lattice(doc, registry, options)?;
        let uses_properties = !options.ignore_properties && lattice.has_properties();
        Ok(Self {
            info: ScenInfo {
                name: doc.scene_name(path),
                description: doc.scene_description().to_string(),
                module_type: doc.module_type().to_string(),
            },
            lattice,
            uses_properties,
        })
    }

    /// Read a goal file against this scenario's lattice.
    pub fn load_goal(
        &self,
        path: &Path,
        registry: &PropertyRegistry,
    ) -> Result<Configuration, ScenarioError> {
        let doc = ScenarioDoc::from_path(path)?;
        goal_configuration(&doc, &self.lattice, registry, self.uses_properties)
    }
}

/// Lattice described by `doc`: geometry, adjacency, movable modules, then
/// static modules, then boundaries.
pub fn build_lattice(
    doc: &ScenarioDoc,
    registry: &PropertyRegistry,
    options: &LoadOptions,
) -> Result<Lattice, ScenarioError> {
    let config = LatticeConfig::new(doc.order, doc.axis_size).with_padding(doc.tensor_padding);
    let mut lattice = Lattice::new(&config)?;

    let adjacency = match (&options.adjacency_override, &doc.adjacency_offsets) {
        (Some(mode), _) => mode.clone(),
        (None, Some(offsets)) => AdjacencyMode::General(
            offsets.iter().map(|o| fit_to_order(o, doc.order)).collect(),
        ),
        (None, None) => AdjacencyMode::Cube,
    };
    lattice.register_adjacency(adjacency)?;

    let mut modules = ModuleRegistry::new();
    for m in &doc.modules {
        let properties = if options.ignore_properties {
            PropertySet::new()
        } else {
            registry.parse(&m.properties)?
        };
        modules.register_module(Coord::from_slice(&m.position), m.is_static, properties)?;
    }
    lattice.populate(modules)?;

    if !options.ignore_properties {
        match palette(lattice.movable_modules()).len() {
            0 => debug!("[Scenario] no module properties; matching disabled"),
            1 => warn!("[Scenario] only one color in use; ignoring properties would search faster"),
            n => debug!("[Scenario] palette of {n} colors"),
        }
    }

    for b in &doc.boundaries {
        lattice.add_boundary(b)?;
    }
    debug!(
        "[Scenario] lattice {}^{} with {} modules, {} boundaries",
        doc.axis_size,
        doc.order,
        lattice.modules().len(),
        doc.boundaries.len()
    );
    Ok(lattice)
}

/// Goal configuration described by `doc` for `lattice`.
///
/// Static entries are skipped. Properties are kept only when
/// `with_properties` is set.
pub fn goal_configuration(
    doc: &ScenarioDoc,
    lattice: &Lattice,
    registry: &PropertyRegistry,
    with_properties: bool,
) -> Result<Configuration, ScenarioError> {
    let geometry = lattice.geometry();
    let mut occupants = Vec::with_capacity(doc.modules.len());
    for m in doc.modules.iter().filter(|m| !m.is_static) {
        let cell = geometry.check_interior(&m.position)?;
        let properties = if with_properties {
            registry.parse(&m.properties)?
        } else {
            PropertySet::new()
        };
        occupants.push(Occupant { cell, properties });
    }
    if occupants.len() != lattice.movable_count() {
        return Err(ScenarioError::ModuleCountMismatch {
            expected: lattice.movable_count(),
            got: occupants.len(),
        });
    }
    Ok(Configuration::new(occupants)?)
}

/// Default `.scen` path for an initial-state file: same directory and
/// stem with `_initial` removed, `.scen` extension.
pub fn default_export_path(initial: &Path) -> PathBuf {
    let stem = initial
        .file_stem()
        .map(|s| s.to_string_lossy().replacen("_initial", "", 1))
        .unwrap_or_default();
    initial.with_file_name(format!("{stem}.scen"))
}

/// Truncate or zero-extend an offset to `order` axes.
fn fit_to_order(offset: &[i32], order: usize) -> Coord {
    let mut out = Coord::from_slice(offset);
    out.resize(order, 0);
    out
}
