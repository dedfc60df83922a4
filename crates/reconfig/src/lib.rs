//! Reconfiguration planning for lattice-based modular robots.
//!
//! This is the facade crate that re-exports the public API of the
//! `reconfig-*` sub-crates, and ships the `reconfig` command-line tool.
//!
//! # Quick start
//!
//! ```rust
//! use reconfig::prelude::*;
//!
//! // Three modules in an L on a 3x3 grid.
//! let mut lattice = Lattice::new(&LatticeConfig::new(2, 3)).unwrap();
//! let mut registry = ModuleRegistry::new();
//! for c in [[0, 0], [1, 0], [0, 1]] {
//!     registry
//!         .register_module(Coord::from_slice(&c), false, PropertySet::new())
//!         .unwrap();
//! }
//! lattice.populate(registry).unwrap();
//!
//! // The same L shifted one cell to the right.
//! let goal_cells = [[1, 0], [2, 0], [1, 1]];
//! let goal =
//!     Configuration::from_coords(lattice.geometry(), goal_cells.iter().map(|c| &c[..])).unwrap();
//!
//! let catalog = MoveCatalog::build(2, &builtin_moves(2).unwrap()).unwrap();
//! let mut space = ConfigurationSpace::new(&lattice, catalog, SearchConfig::default()).unwrap();
//! let report = space
//!     .search(SearchMethod::AStar, HeuristicKind::Mrsh1, &goal)
//!     .unwrap();
//! assert_eq!(report.outcome.path().unwrap().move_count(), 3);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `reconfig-core` | Module ids, coordinates, properties |
//! | [`lattice`] | `reconfig-lattice` | Geometry, occupancy, registry, configurations |
//! | [`moves`] | `reconfig-moves` | Move templates, catalog, legality |
//! | [`search`] | `reconfig-search` | Heuristics and the search driver |
//! | [`scenario`] | `reconfig-scenario` | Scenario files and `.scen` export |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Module ids, coordinates, and properties (`reconfig-core`).
pub use reconfig_core as types;

/// Lattice geometry, occupancy, module registry, and configurations
/// (`reconfig-lattice`).
pub use reconfig_lattice as lattice;

/// Move templates, the symmetry-expanded catalog, and move legality
/// (`reconfig-moves`).
pub use reconfig_moves as moves;

/// Heuristics and the A*/BFS/bidirectional search driver
/// (`reconfig-search`).
pub use reconfig_search as search;

/// JSON scenario and move-definition loading, `.scen` export
/// (`reconfig-scenario`).
pub use reconfig_scenario as scenario;

/// Common imports for typical usage.
///
/// ```rust
/// use reconfig::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use reconfig_core::{Color, Coord, ModuleId, ModuleProperty, PropertySet};

    // Lattice
    pub use reconfig_lattice::{
        AdjacencyMode, CellState, Configuration, Lattice, LatticeConfig, LatticeError,
        ModuleRegistry, Occupancy,
    };

    // Moves
    pub use reconfig_moves::{builtin_moves, Move, MoveCatalog, MoveError, MoveManager};

    // Search
    pub use reconfig_search::{
        ConfigurationSpace, HeuristicKind, SearchConfig, SearchError, SearchMethod,
        SearchOutcome, SearchPath, SearchReport,
    };

    // Scenario
    pub use reconfig_scenario::{
        ExportOptions, LoadOptions, PropertyRegistry, Scenario, ScenarioError,
    };
}
