//! Benchmark profiles for the reconfig planner.
//!
//! - [`line_to_column`]: a horizontal line of modules that must stand up
//!   into a column against a static wall
//! - [`random_goal`]: a reachable goal a fixed number of random moves away

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use reconfig_core::{Coord, PropertySet};
use reconfig_lattice::{Configuration, Lattice, LatticeConfig, ModuleRegistry};
use reconfig_moves::{builtin_moves, MoveCatalog};
use reconfig_search::{ConfigurationSpace, SearchConfig};

/// `n` modules in a row on the floor of an `(n + 1)`-wide grid, with a
/// static wall along the last column; the goal stacks them against the
/// wall.
pub fn line_to_column(n: i32) -> (Lattice, Configuration) {
    let axis = (n + 1) as u32;
    let mut lattice = Lattice::new(&LatticeConfig::new(2, axis)).unwrap();
    let mut registry = ModuleRegistry::new();
    for x in 0..n {
        registry
            .register_module(Coord::from_slice(&[x, 0]), false, PropertySet::new())
            .unwrap();
    }
    for y in 0..=n {
        registry
            .register_module(Coord::from_slice(&[n, y]), true, PropertySet::new())
            .unwrap();
    }
    lattice.populate(registry).unwrap();
    let goal_cells: Vec<[i32; 2]> = (0..n).map(|y| [n - 1, y]).collect();
    let goal = Configuration::from_coords(lattice.geometry(), goal_cells.iter().map(|c| &c[..]))
        .unwrap();
    (lattice, goal)
}

/// Catalog of the built-in moves for `order`.
pub fn catalog(order: usize) -> MoveCatalog {
    MoveCatalog::build(order, &builtin_moves(order).unwrap()).unwrap()
}

/// A goal `steps` random moves from `lattice`'s current state.
pub fn random_goal(lattice: &Lattice, steps: usize, seed: u64) -> Configuration {
    let mut space =
        ConfigurationSpace::new(lattice, catalog(lattice.order()), SearchConfig::default())
            .unwrap();
    let start = space.start();
    space.generate_random_final(&start, steps, seed).unwrap()
}
