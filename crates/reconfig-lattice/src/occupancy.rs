//! Cell states and the read-only occupancy abstraction.

use crate::geometry::Geometry;
use reconfig_core::ModuleId;

/// Contents of one lattice cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum CellState {
    /// Nothing here; a module may enter.
    #[default]
    Empty,
    /// Permanently impassable. Not a module and never an anchor.
    Boundary,
    /// Occupied by the module with this id.
    Module(ModuleId),
}

impl CellState {
    /// Whether the cell is empty.
    #[inline]
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The occupying module, if any.
    #[inline]
    pub fn module(self) -> Option<ModuleId> {
        match self {
            Self::Module(id) => Some(id),
            _ => None,
        }
    }
}

/// Read-only O(1) occupancy queries.
///
/// Implemented by the live [`Lattice`](crate::Lattice) and by the
/// [`OccupancyGrid`](crate::OccupancyGrid) scratch view used during
/// search. Move legality checks are written against this trait so the
/// same code runs in both contexts.
///
/// Coordinates outside the dense grid read as [`CellState::Boundary`].
pub trait Occupancy {
    /// The grid dimensions.
    fn geometry(&self) -> &Geometry;

    /// State of the cell at a flat index. `index` must be in range.
    fn cell(&self, index: u32) -> CellState;

    /// State of the cell at `coord`.
    #[inline]
    fn occupied_at(&self, coord: &[i32]) -> CellState {
        match self.geometry().index_of(coord) {
            Some(index) => self.cell(index),
            None => CellState::Boundary,
        }
    }
}
