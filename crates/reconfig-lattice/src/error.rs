//! Error types for lattice setup and mutation.

use crate::occupancy::CellState;
use reconfig_core::{Coord, ModuleId};
use std::fmt;

/// Errors arising from lattice construction, module registration, or
/// configuration handling.
///
/// These are setup errors: they abort before any search starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LatticeError {
    /// Order, axis size, or padding describe an unusable grid.
    InvalidGeometry {
        /// What went wrong.
        reason: String,
    },
    /// A coordinate lies outside the usable region of the lattice.
    CoordOutOfBounds {
        /// The offending coordinate.
        coord: Coord,
        /// Human-readable description of the valid range.
        bounds: String,
    },
    /// A coordinate or offset has the wrong number of components.
    DimensionMismatch {
        /// Lattice order.
        expected: usize,
        /// Length that was supplied.
        got: usize,
    },
    /// The target cell already holds a module or boundary.
    CellOccupied {
        /// The contested coordinate.
        coord: Coord,
        /// What is already there.
        occupant: CellState,
    },
    /// Two modules were registered at the same coordinate.
    DuplicateModule {
        /// The contested coordinate.
        coord: Coord,
    },
    /// No module with this id is known.
    UnknownModule {
        /// The requested id.
        id: ModuleId,
    },
    /// A module record was inserted out of id order, or a movable module
    /// arrived after static modules.
    InvalidModuleOrder {
        /// The offending id.
        id: ModuleId,
        /// What went wrong.
        reason: String,
    },
    /// Registration was already finalized; no more modules may be added.
    RegistrationFinalized,
    /// Adjacency offsets are unusable for this lattice.
    InvalidAdjacency {
        /// What went wrong.
        reason: String,
    },
    /// A configuration does not fit the lattice it is applied to.
    ConfigurationMismatch {
        /// What went wrong.
        reason: String,
    },
}

impl fmt::Display for LatticeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidGeometry { reason } => write!(f, "invalid lattice geometry: {reason}"),
            Self::CoordOutOfBounds { coord, bounds } => {
                write!(f, "coordinate {coord:?} out of bounds: {bounds}")
            }
            Self::DimensionMismatch { expected, got } => {
                write!(f, "expected {expected}D coordinate, got {got}D")
            }
            Self::CellOccupied { coord, occupant } => {
                write!(f, "cell {coord:?} already occupied by {occupant:?}")
            }
            Self::DuplicateModule { coord } => {
                write!(f, "two modules registered at {coord:?}")
            }
            Self::UnknownModule { id } => write!(f, "unknown module {id}"),
            Self::InvalidModuleOrder { id, reason } => {
                write!(f, "module {id} inserted out of order: {reason}")
            }
            Self::RegistrationFinalized => write!(f, "module registration already finalized"),
            Self::InvalidAdjacency { reason } => write!(f, "invalid adjacency: {reason}"),
            Self::ConfigurationMismatch { reason } => {
                write!(f, "configuration does not match lattice: {reason}")
            }
        }
    }
}

impl std::error::Error for LatticeError {}
