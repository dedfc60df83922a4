//! Module-graph connectivity queries.
//!
//! Nodes are modules, identified by [`ModuleId`] index into a slice of
//! flat cell indices; edges join modules whose positions differ by one of
//! the active adjacency offsets. Boundary cells never join the graph.

use crate::occupancy::{CellState, Occupancy};
use reconfig_core::{translate, Coord, ModuleId};
use smallvec::SmallVec;

type Neighbours = SmallVec<[u32; 12]>;

fn neighbour_lists<O: Occupancy + ?Sized>(
    occ: &O,
    node_cells: &[u32],
    adjacency: &[Coord],
) -> Vec<Neighbours> {
    let geometry = occ.geometry();
    node_cells
        .iter()
        .map(|&cell| {
            let here = geometry.coord_of(cell);
            adjacency
                .iter()
                .filter_map(|offset| match occ.occupied_at(&translate(&here, offset)) {
                    CellState::Module(id) if id.index() < node_cells.len() => Some(id.0),
                    _ => None,
                })
                .collect()
        })
        .collect()
}

/// Articulation points of the module graph.
///
/// `node_cells[i]` must be the cell holding module `i` in `occ`. Returns
/// one flag per node; a flagged module cannot leave without splitting its
/// component. Iterative Tarjan, O(V + E).
pub fn articulation_points<O: Occupancy + ?Sized>(
    occ: &O,
    node_cells: &[u32],
    adjacency: &[Coord],
) -> Vec<bool> {
    let n = node_cells.len();
    let adj = neighbour_lists(occ, node_cells, adjacency);
    let mut disc = vec![u32::MAX; n];
    let mut low = vec![0u32; n];
    let mut cut = vec![false; n];
    let mut timer = 0u32;
    // (node, parent, next neighbour slot)
    let mut stack: Vec<(usize, usize, usize)> = Vec::new();

    for root in 0..n {
        if disc[root] != u32::MAX {
            continue;
        }
        disc[root] = timer;
        low[root] = timer;
        timer += 1;
        let mut root_children = 0;
        stack.push((root, usize::MAX, 0));

        while let Some(top) = stack.last_mut() {
            let (v, parent, slot) = *top;
            if slot < adj[v].len() {
                top.2 += 1;
                let w = adj[v][slot] as usize;
                if disc[w] == u32::MAX {
                    disc[w] = timer;
                    low[w] = timer;
                    timer += 1;
                    if v == root {
                        root_children += 1;
                    }
                    stack.push((w, v, 0));
                } else if w != parent {
                    low[v] = low[v].min(disc[w]);
                }
            } else {
                stack.pop();
                if parent != usize::MAX {
                    low[parent] = low[parent].min(low[v]);
                    if parent != root && low[v] >= disc[parent] {
                        cut[parent] = true;
                    }
                }
            }
        }
        cut[root] = root_children > 1;
    }
    cut
}

/// Whether the module graph over `node_cells` is a single component.
///
/// An empty graph counts as connected.
pub fn is_connected<O: Occupancy + ?Sized>(
    occ: &O,
    node_cells: &[u32],
    adjacency: &[Coord],
) -> bool {
    if node_cells.is_empty() {
        return true;
    }
    let adj = neighbour_lists(occ, node_cells, adjacency);
    let mut seen = vec![false; node_cells.len()];
    let mut stack = vec![0usize];
    seen[0] = true;
    let mut reached = 1;
    while let Some(v) = stack.pop() {
        for &w in &adj[v] {
            let w = w as usize;
            if !seen[w] {
                seen[w] = true;
                reached += 1;
                stack.push(w);
            }
        }
    }
    reached == node_cells.len()
}

/// Whether some module other than `exclude` is adjacent to `coord`.
pub fn has_module_neighbour<O: Occupancy + ?Sized>(
    occ: &O,
    coord: &[i32],
    exclude: ModuleId,
    adjacency: &[Coord],
) -> bool {
    adjacency.iter().any(|offset| {
        matches!(
            occ.occupied_at(&translate(coord, offset)),
            CellState::Module(id) if id != exclude
        )
    })
}
