use proptest::prelude::*;
use proptest::sample::Index;
use reconfig_core::{Coord, ModuleId, PropertySet};
use reconfig_lattice::{Configuration, Lattice, LatticeConfig, ModuleRegistry};
use reconfig_moves::{builtin_moves, MoveCatalog, MoveError, MoveManager};
use smallvec::smallvec;

fn lattice(axis: u32, cells: &[[i32; 2]]) -> Lattice {
    let mut lattice = Lattice::new(&LatticeConfig::new(2, axis)).unwrap();
    let mut reg = ModuleRegistry::new();
    for c in cells {
        reg.register_module(smallvec![c[0], c[1]], false, PropertySet::new())
            .unwrap();
    }
    lattice.populate(reg).unwrap();
    lattice
}

fn manager(lattice: &Lattice) -> MoveManager {
    let catalog = MoveCatalog::build(2, &builtin_moves(2).unwrap()).unwrap();
    MoveManager::new(catalog, lattice.adjacency().to_vec())
}

fn config(lattice: &Lattice, cells: &[[i32; 2]]) -> Configuration {
    Configuration::from_coords(lattice.geometry(), cells.iter().map(|c| &c[..])).unwrap()
}

// ── L-shape ─────────────────────────────────────────────────────

const L_SHAPE: [[i32; 2]; 3] = [[0, 0], [1, 0], [0, 1]];

#[test]
fn l_shape_legal_moves() {
    let l = lattice(3, &L_SHAPE);
    let m = manager(&l);
    // The corner holds the shape together.
    assert!(m.legal_moves_in(&l, ModuleId(0)).unwrap().is_empty());

    let right = m.legal_moves_in(&l, ModuleId(1)).unwrap();
    assert_eq!(right.len(), 1);
    assert_eq!(right[0].name(), "slide");
    assert_eq!(right[0].delta(), &[0, 1]);

    let top = m.legal_moves_in(&l, ModuleId(2)).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].delta(), &[1, 0]);
}

#[test]
fn bar_middle_moves_only_without_connectivity() {
    let l = lattice(5, &[[1, 1], [2, 1], [3, 1]]);
    let m = manager(&l);
    assert!(m.legal_moves_in(&l, ModuleId(1)).unwrap().is_empty());

    let free = m.clone().with_connectivity(false);
    let moves = free.legal_moves_in(&l, ModuleId(1)).unwrap();
    assert!(!moves.is_empty());
    assert!(moves.iter().all(|mv| mv.name() == "pivot"));
}

#[test]
fn apply_is_functional() {
    let l = lattice(3, &L_SHAPE);
    let m = manager(&l);
    let before = l.snapshot_as_configuration(true);
    let mv = m.legal_moves_in(&l, ModuleId(2)).unwrap()[0];
    let next = m.apply(&l, ModuleId(2), mv).unwrap();
    assert_eq!(next, config(&l, &[[0, 0], [1, 0], [1, 1]]));
    assert_eq!(l.snapshot_as_configuration(true), before);

    let pinned_move = m.catalog().moves()[0].clone();
    assert!(matches!(
        m.apply(&l, ModuleId(0), &pinned_move),
        Err(MoveError::NoSuchMove { .. })
    ));
}

#[test]
fn find_move_to_state_reproduces_target() {
    let mut l = lattice(3, &L_SHAPE);
    let m = manager(&l);
    let target = config(&l, &[[0, 0], [1, 0], [1, 1]]);
    let (id, mv) = m.find_move_to_state(&l, &target).unwrap();
    assert_eq!(id, ModuleId(2));
    m.apply_in_place(&mut l, id, mv).unwrap();
    assert_eq!(l.snapshot_as_configuration(true), target);
}

#[test]
fn find_move_to_state_rejects_non_adjacent_states() {
    let l = lattice(3, &L_SHAPE);
    let m = manager(&l);
    let far = config(&l, &[[0, 0], [1, 0], [2, 2]]);
    assert!(matches!(
        m.find_move_to_state(&l, &far),
        Err(MoveError::NoSuchMove { .. })
    ));
    let two_moves = config(&l, &[[1, 0], [2, 0], [1, 1]]);
    assert!(m.find_move_to_state(&l, &two_moves).is_err());
    let same = l.snapshot_as_configuration(true);
    assert!(m.find_move_to_state(&l, &same).is_err());
    let fewer = config(&l, &[[0, 0], [1, 0]]);
    assert!(m.find_move_to_state(&l, &fewer).is_err());
}

#[test]
fn is_legal_requires_the_module_at_its_origin() {
    let l = lattice(3, &L_SHAPE);
    let m = manager(&l);
    let mv = m.legal_moves_in(&l, ModuleId(2)).unwrap()[0];
    assert!(m.is_legal(&l, ModuleId(2), &[0, 1], mv));
    assert!(!m.is_legal(&l, ModuleId(1), &[0, 1], mv));
}

// ── Parallel export ─────────────────────────────────────────────

#[test]
fn parallel_moves_with_disjoint_footprints() {
    let base = [[0, 0], [1, 0], [2, 0], [3, 0], [0, 1], [3, 1]];
    let mut l = lattice(4, &base);
    let m = manager(&l);
    let target = config(&l, &[[0, 0], [1, 0], [2, 0], [3, 0], [1, 1], [2, 1]]);
    let moves = m.find_parallel_moves_to_state(&l, &target).unwrap();
    let ids: Vec<ModuleId> = moves.iter().map(|(id, _)| *id).collect();
    assert_eq!(ids, vec![ModuleId(4), ModuleId(5)]);
    for (id, mv) in moves {
        m.apply_in_place(&mut l, id, mv).unwrap();
    }
    assert_eq!(l.snapshot_as_configuration(true), target);
}

#[test]
fn parallel_moves_need_a_change() {
    let l = lattice(3, &L_SHAPE);
    let m = manager(&l);
    let same = l.snapshot_as_configuration(true);
    assert!(m.find_parallel_moves_to_state(&l, &same).is_err());
}

// ── Reversibility ───────────────────────────────────────────────

/// Grow a connected polyomino on a 6x6 grid from the centre.
fn polyomino(picks: &[Index]) -> Vec<[i32; 2]> {
    let mut cells = vec![[2, 2]];
    for pick in picks {
        let mut frontier: Vec<[i32; 2]> = Vec::new();
        for c in &cells {
            for d in [[1, 0], [-1, 0], [0, 1], [0, -1]] {
                let n = [c[0] + d[0], c[1] + d[1]];
                let inside = (0..6).contains(&n[0]) && (0..6).contains(&n[1]);
                if inside && !cells.contains(&n) && !frontier.contains(&n) {
                    frontier.push(n);
                }
            }
        }
        cells.push(*pick.get(&frontier));
    }
    cells
}

proptest! {
    #[test]
    fn every_legal_move_is_reversible(picks in proptest::collection::vec(any::<Index>(), 1..7)) {
        let cells = polyomino(&picks);
        let mut l = lattice(6, &cells);
        let m = manager(&l);
        let start = l.snapshot_as_configuration(true);
        for id in 0..cells.len() as u32 {
            let id = ModuleId(id);
            let moves: Vec<_> = m.legal_moves_in(&l, id).unwrap().into_iter().cloned().collect();
            for mv in moves {
                m.apply_in_place(&mut l, id, &mv).unwrap();
                let (back_id, back) = m.find_move_to_state(&l, &start).unwrap();
                prop_assert_eq!(back_id, id);
                let inverse: Coord = mv.delta().iter().map(|d| -d).collect();
                prop_assert_eq!(back.delta(), inverse.as_slice());
                m.undo_in_place(&mut l, id, &mv).unwrap();
                prop_assert_eq!(&l.snapshot_as_configuration(true), &start);
            }
        }
    }
}
