//! Test utilities and lattice fixtures for reconfig development.
//!
//! [`TestLatticeBuilder`] assembles a populated [`Lattice`] from plain
//! coordinate arrays; [`fixtures`] holds the standard scenarios used across
//! the workspace's tests and benchmarks.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use reconfig_core::{Color, Coord, ModuleProperty, PropertySet};
use reconfig_lattice::{AdjacencyMode, Configuration, Lattice, LatticeConfig, ModuleRegistry};
use reconfig_moves::{builtin_moves, MoveCatalog, MoveManager};

/// Builder for small populated lattices.
///
/// Panics on invalid input; it is only meant for tests.
pub struct TestLatticeBuilder {
    config: LatticeConfig,
    adjacency: AdjacencyMode,
    modules: Vec<(Coord, bool, PropertySet)>,
    boundaries: Vec<Coord>,
}

impl TestLatticeBuilder {
    pub fn new(order: usize, axis_size: u32) -> Self {
        Self {
            config: LatticeConfig::new(order, axis_size),
            adjacency: AdjacencyMode::Cube,
            modules: Vec::new(),
            boundaries: Vec::new(),
        }
    }

    pub fn padding(mut self, padding: u32) -> Self {
        self.config = self.config.with_padding(padding);
        self
    }

    pub fn adjacency(mut self, mode: AdjacencyMode) -> Self {
        self.adjacency = mode;
        self
    }

    pub fn movable(mut self, cells: &[&[i32]]) -> Self {
        for c in cells {
            self.modules
                .push((Coord::from_slice(c), false, PropertySet::new()));
        }
        self
    }

    pub fn colored(mut self, cell: &[i32], rgb: u32) -> Self {
        let props = PropertySet::new().with(ModuleProperty::Color(Color::from_int(rgb)));
        self.modules.push((Coord::from_slice(cell), false, props));
        self
    }

    pub fn statics(mut self, cells: &[&[i32]]) -> Self {
        for c in cells {
            self.modules
                .push((Coord::from_slice(c), true, PropertySet::new()));
        }
        self
    }

    pub fn boundaries(mut self, cells: &[&[i32]]) -> Self {
        self.boundaries
            .extend(cells.iter().map(|c| Coord::from_slice(c)));
        self
    }

    pub fn build(self) -> Lattice {
        let mut lattice = Lattice::new(&self.config).expect("valid test geometry");
        lattice
            .register_adjacency(self.adjacency)
            .expect("valid test adjacency");
        let mut registry = ModuleRegistry::new();
        for (coords, is_static, props) in self.modules {
            registry
                .register_module(coords, is_static, props)
                .expect("distinct test modules");
        }
        lattice.populate(registry).expect("test modules fit");
        for b in &self.boundaries {
            lattice.add_boundary(b).expect("test boundary fits");
        }
        lattice
    }
}

/// Property-free configuration over `cells` of `lattice`.
pub fn config(lattice: &Lattice, cells: &[&[i32]]) -> Configuration {
    Configuration::from_coords(lattice.geometry(), cells.iter().copied())
        .expect("distinct in-grid test cells")
}

/// Catalog of the built-in moves for `order`.
pub fn builtin_catalog(order: usize) -> MoveCatalog {
    MoveCatalog::build(order, &builtin_moves(order).expect("order >= 2"))
        .expect("built-in templates are valid")
}

/// Manager over the built-in moves, using the lattice's adjacency.
pub fn builtin_manager(lattice: &Lattice) -> MoveManager {
    MoveManager::new(
        builtin_catalog(lattice.order()),
        lattice.adjacency().to_vec(),
    )
}
