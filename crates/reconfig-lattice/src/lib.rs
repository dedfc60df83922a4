//! Lattice occupancy and search-state types.
//!
//! This crate owns the dense N-dimensional occupancy grid ([`Lattice`]),
//! the [`ModuleRegistry`] that assigns module ids with deferred static
//! registration, and the canonical, order-independent [`Configuration`]
//! used as the search-state key.
//!
//! # Occupancy views
//!
//! Move legality is evaluated through the [`Occupancy`] trait. The live
//! [`Lattice`] implements it for replay and export; search expansion uses
//! an [`OccupancyGrid`] scratch view so that the shared lattice is never
//! mutated mid-search.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod adjacency;
pub mod configuration;
pub mod connectivity;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod lattice;
pub mod occupancy;
pub mod registry;

pub use adjacency::AdjacencyMode;
pub use configuration::{Configuration, Occupant};
pub use connectivity::{articulation_points, has_module_neighbour, is_connected};
pub use error::LatticeError;
pub use geometry::{Geometry, LatticeConfig};
pub use grid::OccupancyGrid;
pub use lattice::Lattice;
pub use occupancy::{CellState, Occupancy};
pub use registry::{ModuleRecord, ModuleRegistry};
