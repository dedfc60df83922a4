//! Successor enumeration over a scratch occupancy grid.

use reconfig_core::{translate, ModuleId};
use reconfig_lattice::{Configuration, Geometry, OccupancyGrid};
use reconfig_moves::MoveManager;
use smallvec::SmallVec;
use std::ops::Range;
use std::thread;

/// Every configuration one legal move away from `state`.
///
/// Loads `state` into `grid` first. Module `i` of the configuration is
/// stamped as `ModuleId(i)`; successors come out grouped by module in
/// configuration order, then in catalog order, with duplicates per module
/// removed. With `threads > 1`, module ranges are enumerated on scoped
/// threads and concatenated in range order, so the result is identical.
pub(crate) fn successors(
    grid: &mut OccupancyGrid,
    moves: &MoveManager,
    geometry: &Geometry,
    state: &Configuration,
    threads: usize,
) -> Vec<Configuration> {
    grid.load(state);
    let grid = &*grid;
    let pinned = moves.pinned(grid, &grid.module_cells());
    let n = state.len();
    let threads = threads.min(n).max(1);
    if threads == 1 {
        return expand_range(grid, moves, geometry, state, &pinned, 0..n);
    }
    let chunk = n.div_ceil(threads);
    let pinned = &pinned;
    thread::scope(|s| {
        let handles: Vec<_> = (0..n)
            .step_by(chunk)
            .map(|lo| {
                let hi = (lo + chunk).min(n);
                s.spawn(move || expand_range(grid, moves, geometry, state, pinned, lo..hi))
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap_or_else(|e| std::panic::resume_unwind(e)))
            .collect()
    })
}

fn expand_range(
    grid: &OccupancyGrid,
    moves: &MoveManager,
    geometry: &Geometry,
    state: &Configuration,
    pinned: &[bool],
    range: Range<usize>,
) -> Vec<Configuration> {
    let mut out = Vec::new();
    for i in range {
        let occupant = &state.occupants()[i];
        let origin = geometry.coord_of(occupant.cell);
        let mut targets: SmallVec<[u32; 16]> = SmallVec::new();
        for mv in moves.legal_moves(grid, ModuleId(i as u32), origin.clone(), pinned[i]) {
            let Some(to) = geometry.index_of(&translate(&origin, mv.delta())) else {
                continue;
            };
            if targets.contains(&to) {
                continue;
            }
            targets.push(to);
            if let Some(next) = state.with_moved(occupant.cell, to) {
                out.push(next);
            }
        }
    }
    out
}
