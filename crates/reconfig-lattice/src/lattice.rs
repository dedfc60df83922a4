//! The dense occupancy grid and its module table.

use crate::adjacency::AdjacencyMode;
use crate::configuration::{Configuration, Occupant};
use crate::error::LatticeError;
use crate::geometry::{Geometry, LatticeConfig};
use crate::occupancy::{CellState, Occupancy};
use crate::registry::{ModuleRecord, ModuleRegistry};
use log::{debug, trace};
use reconfig_core::{translate, Coord, ModuleId, PropertySet};
use std::fmt;

/// Dense N-dimensional lattice.
///
/// Built once at setup from a [`ModuleRegistry`] and boundary
/// coordinates, then mutated in place only by replay and export (see
/// [`move_module`](Self::move_module)). The grid is never resized.
///
/// Invariants:
/// - every module id appears in exactly one cell, matching its record;
/// - boundary cells (including the padding margin) never change.
#[derive(Clone, Debug)]
pub struct Lattice {
    geometry: Geometry,
    grid: Vec<CellState>,
    adjacency_mode: AdjacencyMode,
    adjacency: Vec<Coord>,
    modules: Vec<ModuleRecord>,
    min_static_id: u32,
}

impl Lattice {
    /// Allocate an empty lattice.
    ///
    /// Interior cells start [`CellState::Empty`]; padding-margin cells are
    /// permanent boundaries. Cube adjacency is installed by default.
    pub fn new(config: &LatticeConfig) -> Result<Self, LatticeError> {
        let geometry = Geometry::new(config)?;
        let mut grid = vec![CellState::Empty; geometry.cell_count()];
        if geometry.padding() > 0 {
            for (i, cell) in grid.iter_mut().enumerate() {
                if geometry.is_margin(i as u32) {
                    *cell = CellState::Boundary;
                }
            }
        }
        let adjacency = AdjacencyMode::Cube.offsets(geometry.order())?;
        debug!(
            "[Lattice] created order={} axis_size={} padding={} cells={}",
            geometry.order(),
            geometry.axis_size(),
            geometry.padding(),
            geometry.cell_count()
        );
        Ok(Self {
            geometry,
            grid,
            adjacency_mode: AdjacencyMode::Cube,
            adjacency,
            modules: Vec::new(),
            min_static_id: 0,
        })
    }

    /// Install the adjacency relation used for connectivity checks.
    pub fn register_adjacency(&mut self, mode: AdjacencyMode) -> Result<(), LatticeError> {
        self.adjacency = mode.offsets(self.geometry.order())?;
        self.adjacency_mode = mode;
        Ok(())
    }

    /// Active adjacency mode.
    pub fn adjacency_mode(&self) -> &AdjacencyMode {
        &self.adjacency_mode
    }

    /// Active adjacency offsets.
    pub fn adjacency(&self) -> &[Coord] {
        &self.adjacency
    }

    /// Insert one module record.
    ///
    /// Records must arrive in id order, movable before static. Fails if the
    /// target cell is outside the interior or already occupied.
    pub fn add_module(&mut self, record: ModuleRecord) -> Result<(), LatticeError> {
        if record.id.index() != self.modules.len() {
            return Err(LatticeError::InvalidModuleOrder {
                id: record.id,
                reason: format!("expected id {}", self.modules.len()),
            });
        }
        let has_static = self.min_static_id as usize != self.modules.len();
        if !record.is_static && has_static {
            return Err(LatticeError::InvalidModuleOrder {
                id: record.id,
                reason: "movable module after static modules".into(),
            });
        }
        let index = self.geometry.check_interior(&record.coords)?;
        let occupant = self.grid[index as usize];
        if !occupant.is_empty() {
            return Err(LatticeError::CellOccupied {
                coord: record.coords,
                occupant,
            });
        }
        self.grid[index as usize] = CellState::Module(record.id);
        if !record.is_static {
            self.min_static_id += 1;
        }
        self.modules.push(record);
        Ok(())
    }

    /// Finalize `registry` and insert all of its modules.
    pub fn populate(&mut self, registry: ModuleRegistry) -> Result<(), LatticeError> {
        for record in registry.into_records() {
            self.add_module(record)?;
        }
        debug!(
            "[Lattice] populated {} modules ({} movable)",
            self.modules.len(),
            self.min_static_id
        );
        Ok(())
    }

    /// Mark an interior cell as a permanent boundary.
    pub fn add_boundary(&mut self, coords: &[i32]) -> Result<(), LatticeError> {
        let index = self.geometry.check_interior(coords)?;
        let occupant = self.grid[index as usize];
        if !occupant.is_empty() {
            return Err(LatticeError::CellOccupied {
                coord: Coord::from_slice(coords),
                occupant,
            });
        }
        self.grid[index as usize] = CellState::Boundary;
        Ok(())
    }

    /// Grid dimensions.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Lattice order.
    pub fn order(&self) -> usize {
        self.geometry.order()
    }

    /// The raw grid, indexed by flat cell index.
    pub fn cells(&self) -> &[CellState] {
        &self.grid
    }

    /// All module records in id order.
    pub fn modules(&self) -> &[ModuleRecord] {
        &self.modules
    }

    /// Movable module records (`id < min_static_id`).
    pub fn movable_modules(&self) -> &[ModuleRecord] {
        &self.modules[..self.min_static_id as usize]
    }

    /// First static id; equals the movable module count.
    pub fn min_static_id(&self) -> ModuleId {
        ModuleId(self.min_static_id)
    }

    /// Number of movable modules.
    pub fn movable_count(&self) -> usize {
        self.min_static_id as usize
    }

    /// Look up a module.
    pub fn module(&self, id: ModuleId) -> Result<&ModuleRecord, LatticeError> {
        self.modules
            .get(id.index())
            .ok_or(LatticeError::UnknownModule { id })
    }

    /// Whether any movable module carries properties.
    pub fn has_properties(&self) -> bool {
        self.movable_modules()
            .iter()
            .any(|m| !m.properties.is_empty())
    }

    /// Snapshot the current movable-module positions.
    ///
    /// With `ignore_properties` the snapshot carries no properties.
    pub fn snapshot_as_configuration(&self, ignore_properties: bool) -> Configuration {
        let occupants = self
            .movable_modules()
            .iter()
            .map(|m| Occupant {
                cell: self
                    .geometry
                    .index_of(&m.coords)
                    .expect("module records always hold in-grid coordinates"),
                properties: if ignore_properties {
                    PropertySet::new()
                } else {
                    m.properties.clone()
                },
            })
            .collect();
        Configuration::new(occupants).expect("lattice cells hold at most one module")
    }

    /// Move module `id` by `delta`, updating grid and record together.
    ///
    /// Used for replay and export, never during search. The destination must
    /// be empty; legality beyond that is the caller's responsibility.
    pub fn move_module(&mut self, id: ModuleId, delta: &[i32]) -> Result<(), LatticeError> {
        let record = self
            .modules
            .get(id.index())
            .ok_or(LatticeError::UnknownModule { id })?;
        if record.is_static {
            return Err(LatticeError::InvalidModuleOrder {
                id,
                reason: "static modules cannot move".into(),
            });
        }
        if delta.len() != self.geometry.order() {
            return Err(LatticeError::DimensionMismatch {
                expected: self.geometry.order(),
                got: delta.len(),
            });
        }
        let from = self
            .geometry
            .index_of(&record.coords)
            .ok_or(LatticeError::UnknownModule { id })?;
        let dest = translate(&record.coords, delta);
        let to = self
            .geometry
            .index_of(&dest)
            .ok_or_else(|| LatticeError::CoordOutOfBounds {
                coord: dest.clone(),
                bounds: "destination outside grid".into(),
            })?;
        let occupant = self.grid[to as usize];
        if !occupant.is_empty() {
            return Err(LatticeError::CellOccupied {
                coord: dest,
                occupant,
            });
        }
        trace!("[Lattice] module {id}: {:?} -> {dest:?}", record.coords);
        self.grid[from as usize] = CellState::Empty;
        self.grid[to as usize] = CellState::Module(id);
        self.modules[id.index()].coords = dest;
        Ok(())
    }

    /// Reverse a previous [`move_module`](Self::move_module) by `delta`.
    pub fn undo_move(&mut self, id: ModuleId, delta: &[i32]) -> Result<(), LatticeError> {
        let back: Coord = delta.iter().map(|d| -d).collect();
        self.move_module(id, &back)
    }

    /// Rearrange movable modules so the lattice matches `target`.
    ///
    /// Modules already standing on a target cell with matching properties
    /// stay put; the rest are assigned to the remaining cells in id order,
    /// matching properties when `target` carries them.
    pub fn reset_to(&mut self, target: &Configuration) -> Result<(), LatticeError> {
        if target.len() != self.movable_count() {
            return Err(LatticeError::ConfigurationMismatch {
                reason: format!(
                    "{} occupants for {} movable modules",
                    target.len(),
                    self.movable_count()
                ),
            });
        }
        let match_props = target.has_properties();
        let mut claimed = vec![false; target.len()];
        let mut unplaced = Vec::new();
        for m in &self.modules[..self.min_static_id as usize] {
            let cell = self
                .geometry
                .index_of(&m.coords)
                .ok_or(LatticeError::UnknownModule { id: m.id })?;
            match target.position(cell) {
                Some(pos)
                    if !match_props || target.occupants()[pos].properties == m.properties =>
                {
                    claimed[pos] = true;
                }
                _ => unplaced.push(m.id),
            }
        }
        let mut assignment = Vec::with_capacity(unplaced.len());
        for id in unplaced {
            let props = &self.modules[id.index()].properties;
            let pos = target
                .occupants()
                .iter()
                .enumerate()
                .position(|(i, o)| !claimed[i] && (!match_props || &o.properties == props))
                .ok_or_else(|| LatticeError::ConfigurationMismatch {
                    reason: format!("no target cell for module {id}"),
                })?;
            claimed[pos] = true;
            assignment.push((id, target.occupants()[pos].cell));
        }
        for (id, _) in &assignment {
            let cell = self.geometry.index_of(&self.modules[id.index()].coords);
            if let Some(cell) = cell {
                self.grid[cell as usize] = CellState::Empty;
            }
        }
        for (id, cell) in assignment {
            if !self.grid[cell as usize].is_empty() {
                return Err(LatticeError::CellOccupied {
                    coord: self.geometry.coord_of(cell),
                    occupant: self.grid[cell as usize],
                });
            }
            self.grid[cell as usize] = CellState::Module(id);
            self.modules[id.index()].coords = self.geometry.coord_of(cell);
        }
        Ok(())
    }
}

impl Occupancy for Lattice {
    fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    #[inline]
    fn cell(&self, index: u32) -> CellState {
        self.grid[index as usize]
    }
}

/// Text rendering for 2D lattices (rows top-down, `#` boundary, `.` empty,
/// module ids otherwise). Higher orders render each 2D slice in turn.
impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let axis = self.geometry.axis_size() as i32;
        let order = self.geometry.order();
        if order == 1 {
            for x in 0..axis {
                write_cell(f, self.occupied_at(&[x]))?;
            }
            return writeln!(f);
        }
        let slices = (axis as usize).pow(order.saturating_sub(2) as u32);
        for slice in 0..slices {
            let mut rest = slice;
            let mut coord: Coord = smallvec::smallvec![0; order];
            for c in coord.iter_mut().skip(2) {
                *c = (rest % axis as usize) as i32;
                rest /= axis as usize;
            }
            for y in (0..axis).rev() {
                coord[1] = y;
                for x in 0..axis {
                    coord[0] = x;
                    write_cell(f, self.occupied_at(&coord))?;
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

fn write_cell(f: &mut fmt::Formatter<'_>, cell: CellState) -> fmt::Result {
    match cell {
        CellState::Empty => write!(f, "  ."),
        CellState::Boundary => write!(f, "  #"),
        CellState::Module(id) => write!(f, "{:>3}", id.0),
    }
}
