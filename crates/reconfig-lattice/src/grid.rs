//! Scratch occupancy view used during search expansion.

use crate::configuration::Configuration;
use crate::geometry::Geometry;
use crate::lattice::Lattice;
use crate::occupancy::{CellState, Occupancy};
use reconfig_core::ModuleId;

/// Reusable occupancy grid for evaluating one configuration at a time.
///
/// The base layer holds the permanent contents of the lattice (boundary
/// cells, padding margin and static modules). [`load`](Self::load) stamps
/// the occupants of a [`Configuration`] on top, each tagged with its
/// index in the configuration as a [`ModuleId`]. Since static ids start
/// at the movable count, stamped ids never collide with static ones.
///
/// Loading is O(n) in the number of occupants: only stamped cells are
/// restored on the next load.
#[derive(Clone, Debug)]
pub struct OccupancyGrid {
    geometry: Geometry,
    base: Vec<CellState>,
    cells: Vec<CellState>,
    stamped: Vec<u32>,
    static_cells: Vec<u32>,
}

impl OccupancyGrid {
    /// Build the base layer from `lattice`, dropping its movable modules.
    pub fn from_lattice(lattice: &Lattice) -> Self {
        let min_static = lattice.min_static_id();
        let base: Vec<CellState> = lattice
            .cells()
            .iter()
            .map(|&c| match c {
                CellState::Module(id) if id < min_static => CellState::Empty,
                other => other,
            })
            .collect();
        let static_cells = lattice.modules()[lattice.movable_count()..]
            .iter()
            .filter_map(|m| lattice.geometry().index_of(&m.coords))
            .collect();
        Self {
            geometry: lattice.geometry().clone(),
            cells: base.clone(),
            base,
            stamped: Vec::new(),
            static_cells,
        }
    }

    /// Replace the stamped layer with the occupants of `config`.
    pub fn load(&mut self, config: &Configuration) {
        self.clear();
        for (i, occupant) in config.occupants().iter().enumerate() {
            self.cells[occupant.cell as usize] = CellState::Module(ModuleId(i as u32));
            self.stamped.push(occupant.cell);
        }
    }

    /// Remove every stamped occupant, leaving only the base layer.
    pub fn clear(&mut self) {
        for cell in self.stamped.drain(..) {
            self.cells[cell as usize] = self.base[cell as usize];
        }
    }

    /// Cells of every module on the grid indexed by [`ModuleId`]: stamped
    /// occupants first, then static modules.
    pub fn module_cells(&self) -> Vec<u32> {
        let mut out = Vec::with_capacity(self.stamped.len() + self.static_cells.len());
        out.extend_from_slice(&self.stamped);
        out.extend_from_slice(&self.static_cells);
        out
    }
}

impl Occupancy for OccupancyGrid {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    fn cell(&self, index: u32) -> CellState {
        self.cells[index as usize]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LatticeConfig;
    use crate::registry::ModuleRegistry;
    use reconfig_core::PropertySet;
    use smallvec::smallvec;

    fn lattice() -> Lattice {
        let mut l = Lattice::new(&LatticeConfig::new(2, 3)).unwrap();
        let mut reg = ModuleRegistry::new();
        reg.register_module(smallvec![0, 0], false, PropertySet::new())
            .unwrap();
        reg.register_module(smallvec![2, 2], true, PropertySet::new())
            .unwrap();
        l.populate(reg).unwrap();
        l.add_boundary(&[1, 1]).unwrap();
        l
    }

    #[test]
    fn base_keeps_statics_and_boundaries_only() {
        let l = lattice();
        let grid = OccupancyGrid::from_lattice(&l);
        assert_eq!(grid.occupied_at(&[0, 0]), CellState::Empty);
        assert_eq!(grid.occupied_at(&[1, 1]), CellState::Boundary);
        assert_eq!(grid.occupied_at(&[2, 2]), CellState::Module(ModuleId(1)));
    }

    #[test]
    fn load_replaces_previous_configuration() {
        let l = lattice();
        let g = l.geometry().clone();
        let mut grid = OccupancyGrid::from_lattice(&l);
        grid.load(&Configuration::from_coords(&g, [&[0, 1][..]]).unwrap());
        assert_eq!(grid.occupied_at(&[0, 1]), CellState::Module(ModuleId(0)));
        grid.load(&Configuration::from_coords(&g, [&[2, 0][..]]).unwrap());
        assert_eq!(grid.occupied_at(&[0, 1]), CellState::Empty);
        assert_eq!(grid.occupied_at(&[2, 0]), CellState::Module(ModuleId(0)));
        assert_eq!(grid.occupied_at(&[1, 1]), CellState::Boundary);
        assert_eq!(
            grid.module_cells(),
            vec![g.index_of(&[2, 0]).unwrap(), g.index_of(&[2, 2]).unwrap()]
        );
    }
}
