//! Legal-move enumeration, application, and replay lookup.

use crate::catalog::MoveCatalog;
use crate::error::MoveError;
use crate::template::Move;
use log::trace;
use reconfig_core::{offset_between, translate, Coord, ModuleId};
use reconfig_lattice::{
    articulation_points, has_module_neighbour, Configuration, Lattice, Occupancy, Occupant,
};
use std::collections::HashSet;

/// Applies a [`MoveCatalog`] to concrete lattice states.
///
/// Legality of a move for a module at `origin`:
/// - the move's occupancy pattern holds around `origin`;
/// - with connectivity enforced, the module is not an articulation point
///   of the module graph and its destination touches another module.
///
/// Moves never mutate shared state during search: enumeration reads an
/// [`Occupancy`] view and successors are new [`Configuration`]s. Only the
/// `*_in_place` methods mutate, for replay and export.
#[derive(Clone, Debug)]
pub struct MoveManager {
    catalog: MoveCatalog,
    adjacency: Vec<Coord>,
    require_connectivity: bool,
}

impl MoveManager {
    /// Manager over `catalog`, using `adjacency` for connectivity checks.
    ///
    /// Connectivity is enforced by default.
    pub fn new(catalog: MoveCatalog, adjacency: Vec<Coord>) -> Self {
        Self {
            catalog,
            adjacency,
            require_connectivity: true,
        }
    }

    /// Enable or disable connectivity enforcement.
    pub fn with_connectivity(mut self, require: bool) -> Self {
        self.require_connectivity = require;
        self
    }

    /// The move catalog.
    pub fn catalog(&self) -> &MoveCatalog {
        &self.catalog
    }

    /// Adjacency offsets used for connectivity.
    pub fn adjacency(&self) -> &[Coord] {
        &self.adjacency
    }

    /// Whether connectivity is enforced.
    pub fn requires_connectivity(&self) -> bool {
        self.require_connectivity
    }

    /// Modules that may not move in the state seen through `occ`.
    ///
    /// `node_cells[i]` is the cell of module `i`. All `false` when
    /// connectivity is not enforced.
    pub fn pinned<O: Occupancy + ?Sized>(&self, occ: &O, node_cells: &[u32]) -> Vec<bool> {
        if self.require_connectivity {
            articulation_points(occ, node_cells, &self.adjacency)
        } else {
            vec![false; node_cells.len()]
        }
    }

    /// Lazily enumerate legal moves for module `id` at `origin`.
    ///
    /// Order follows the catalog. A `pinned` module yields nothing.
    pub fn legal_moves<'a, O: Occupancy + ?Sized>(
        &'a self,
        occ: &'a O,
        id: ModuleId,
        origin: Coord,
        pinned: bool,
    ) -> LegalMoves<'a, O> {
        LegalMoves {
            manager: self,
            occ,
            id,
            origin,
            next: if pinned { self.catalog.len() } else { 0 },
        }
    }

    /// Whether `mv` is legal for unpinned module `id` at `origin`.
    ///
    /// `origin` must hold `id` in `occ`.
    pub fn is_legal<O: Occupancy + ?Sized>(
        &self,
        occ: &O,
        id: ModuleId,
        origin: &[i32],
        mv: &Move,
    ) -> bool {
        mv.applies_to(occ, origin, id)
            && (!self.require_connectivity
                || has_module_neighbour(
                    occ,
                    &translate(origin, mv.delta()),
                    id,
                    &self.adjacency,
                ))
    }

    /// Legal moves for module `id` in the live lattice.
    pub fn legal_moves_in<'a>(
        &'a self,
        lattice: &'a Lattice,
        id: ModuleId,
    ) -> Result<Vec<&'a Move>, MoveError> {
        let record = lattice.module(id)?;
        if record.is_static {
            return Ok(Vec::new());
        }
        let pinned = self.pinned_in(lattice, id);
        Ok(self
            .legal_moves(lattice, id, record.coords.clone(), pinned)
            .collect())
    }

    /// The configuration after module `id` performs `mv`, without touching
    /// `lattice`. Fails if the move is not legal there.
    pub fn apply(
        &self,
        lattice: &Lattice,
        id: ModuleId,
        mv: &Move,
    ) -> Result<Configuration, MoveError> {
        let record = lattice.module(id)?;
        if record.is_static
            || self.pinned_in(lattice, id)
            || !self.is_legal(lattice, id, &record.coords, mv)
        {
            return Err(MoveError::NoSuchMove {
                reason: format!("'{}' is not legal for module {id}", mv.name()),
            });
        }
        let geometry = lattice.geometry();
        let from = geometry
            .index_of(&record.coords)
            .ok_or_else(|| MoveError::NoSuchMove {
                reason: format!("module {id} is off the grid"),
            })?;
        let to = geometry
            .index_of(&translate(&record.coords, mv.delta()))
            .ok_or_else(|| MoveError::NoSuchMove {
                reason: format!("module {id} would leave the grid"),
            })?;
        lattice
            .snapshot_as_configuration(false)
            .with_moved(from, to)
            .ok_or_else(|| MoveError::NoSuchMove {
                reason: format!("destination of module {id} is occupied"),
            })
    }

    /// Perform `mv` on the live lattice.
    pub fn apply_in_place(
        &self,
        lattice: &mut Lattice,
        id: ModuleId,
        mv: &Move,
    ) -> Result<(), MoveError> {
        trace!("[Moves] module {id} performs '{}' {:?}", mv.name(), mv.delta());
        Ok(lattice.move_module(id, mv.delta())?)
    }

    /// Reverse a previous [`apply_in_place`](Self::apply_in_place).
    pub fn undo_in_place(
        &self,
        lattice: &mut Lattice,
        id: ModuleId,
        mv: &Move,
    ) -> Result<(), MoveError> {
        Ok(lattice.undo_move(id, mv.delta())?)
    }

    /// Find the single legal move that turns the lattice's current state
    /// into `target`.
    ///
    /// Properties are compared only when `target` carries them. Fails with
    /// [`MoveError::NoSuchMove`] when the states differ by anything other
    /// than one legal move.
    pub fn find_move_to_state<'a>(
        &'a self,
        lattice: &Lattice,
        target: &Configuration,
    ) -> Result<(ModuleId, &'a Move), MoveError> {
        let (removed, added) = state_difference(lattice, target)?;
        let ([from], [to]) = (removed.as_slice(), added.as_slice()) else {
            return Err(MoveError::NoSuchMove {
                reason: format!(
                    "{} modules leave and {} arrive; expected one move",
                    removed.len(),
                    added.len()
                ),
            });
        };
        if target.has_properties() && from.properties != to.properties {
            return Err(MoveError::NoSuchMove {
                reason: "moving module would change properties".into(),
            });
        }
        let geometry = lattice.geometry();
        let origin = geometry.coord_of(from.cell);
        let dest = geometry.coord_of(to.cell);
        let id = lattice
            .occupied_at(&origin)
            .module()
            .ok_or_else(|| MoveError::NoSuchMove {
                reason: format!("no module at {origin:?}"),
            })?;
        if !self.pinned_in(lattice, id) {
            let delta = offset_between(&origin, &dest);
            if let Some(mv) = self
                .catalog
                .with_delta(&delta)
                .find(|mv| self.is_legal(lattice, id, &origin, mv))
            {
                return Ok((id, mv));
            }
        }
        Err(MoveError::NoSuchMove {
            reason: format!("no legal move takes module {id} from {origin:?} to {dest:?}"),
        })
    }

    /// Find a set of legal moves with pairwise disjoint footprints that
    /// together turn the lattice's current state into `target`.
    ///
    /// Greedy and deterministic: modules that must move are visited in
    /// ascending id order; each takes the first catalog move (in catalog
    /// order) that is legal in the current state, lands on an unclaimed
    /// target cell with matching properties, and whose footprint is disjoint
    /// from every footprint already taken. Fails with
    /// [`MoveError::NoSuchMove`] if that does not reproduce `target`.
    ///
    /// Disjoint footprints keep the occupancy patterns independent. With
    /// connectivity enforced, a module's pinned status may still depend on
    /// the order the other moves are applied in.
    pub fn find_parallel_moves_to_state<'a>(
        &'a self,
        lattice: &Lattice,
        target: &Configuration,
    ) -> Result<Vec<(ModuleId, &'a Move)>, MoveError> {
        let (removed, added) = state_difference(lattice, target)?;
        if removed.is_empty() || removed.len() != added.len() {
            return Err(MoveError::NoSuchMove {
                reason: format!(
                    "{} modules leave and {} arrive",
                    removed.len(),
                    added.len()
                ),
            });
        }
        let match_props = target.has_properties();
        let geometry = lattice.geometry();
        let node_cells = module_cells(lattice);
        let pinned = self.pinned(lattice, &node_cells);

        let mut movers: Vec<(ModuleId, &Occupant)> = removed
            .iter()
            .filter_map(|o| {
                lattice
                    .occupied_at(&geometry.coord_of(o.cell))
                    .module()
                    .map(|id| (id, o))
            })
            .collect();
        movers.sort_by_key(|(id, _)| *id);

        let mut claimed_targets = vec![false; added.len()];
        let mut claimed_cells: HashSet<u32> = HashSet::new();
        let mut chosen = Vec::with_capacity(movers.len());
        for (id, from) in movers {
            if pinned[id.index()] {
                continue;
            }
            let origin = geometry.coord_of(from.cell);
            for mv in self.catalog.moves() {
                let Some(dest) = geometry.index_of(&translate(&origin, mv.delta())) else {
                    continue;
                };
                let Some(slot) = (0..added.len()).find(|&i| {
                    !claimed_targets[i]
                        && added[i].cell == dest
                        && (!match_props || added[i].properties == from.properties)
                }) else {
                    continue;
                };
                if !self.is_legal(lattice, id, &origin, mv) {
                    continue;
                }
                let footprint: Vec<u32> = mv
                    .footprint()
                    .iter()
                    .filter_map(|rel| geometry.index_of(&translate(&origin, rel)))
                    .collect();
                if footprint.iter().any(|c| claimed_cells.contains(c)) {
                    continue;
                }
                claimed_targets[slot] = true;
                claimed_cells.extend(footprint);
                chosen.push((id, mv));
                break;
            }
        }
        if chosen.len() != removed.len() {
            return Err(MoveError::NoSuchMove {
                reason: format!(
                    "only {} of {} modules have disjoint legal moves",
                    chosen.len(),
                    removed.len()
                ),
            });
        }
        Ok(chosen)
    }

    fn pinned_in(&self, lattice: &Lattice, id: ModuleId) -> bool {
        self.require_connectivity
            && articulation_points(lattice, &module_cells(lattice), &self.adjacency)[id.index()]
    }
}

/// Lazy iterator over the legal moves of one module.
///
/// Produced by [`MoveManager::legal_moves`]; finite, in catalog order.
pub struct LegalMoves<'a, O: ?Sized> {
    manager: &'a MoveManager,
    occ: &'a O,
    id: ModuleId,
    origin: Coord,
    next: usize,
}

impl<'a, O: Occupancy + ?Sized> Iterator for LegalMoves<'a, O> {
    type Item = &'a Move;

    fn next(&mut self) -> Option<&'a Move> {
        let moves = self.manager.catalog.moves();
        while self.next < moves.len() {
            let mv = &moves[self.next];
            self.next += 1;
            if self.manager.is_legal(self.occ, self.id, &self.origin, mv) {
                return Some(mv);
            }
        }
        None
    }
}

/// Cells of every lattice module, indexed by id.
fn module_cells(lattice: &Lattice) -> Vec<u32> {
    lattice
        .modules()
        .iter()
        .filter_map(|m| lattice.geometry().index_of(&m.coords))
        .collect()
}

/// Occupants leaving and arriving between the lattice and `target`.
fn state_difference(
    lattice: &Lattice,
    target: &Configuration,
) -> Result<(Vec<Occupant>, Vec<Occupant>), MoveError> {
    let current = lattice.snapshot_as_configuration(!target.has_properties());
    if current.len() != target.len() {
        return Err(MoveError::NoSuchMove {
            reason: format!(
                "target has {} modules, lattice has {}",
                target.len(),
                current.len()
            ),
        });
    }
    let removed = current.difference(target).into_iter().cloned().collect();
    let added = target.difference(&current).into_iter().cloned().collect();
    Ok((removed, added))
}
