//! Standard scenarios.
//!
//! Each fixture returns the populated start lattice and the goal cells.

use crate::TestLatticeBuilder;
use reconfig_lattice::Lattice;

/// 3x3 L-shape shifted one cell right. Shortest solution: 3 moves.
pub fn l_shape() -> (Lattice, Vec<[i32; 2]>) {
    let lattice = TestLatticeBuilder::new(2, 3)
        .movable(&[&[0, 0], &[1, 0], &[0, 1]])
        .build();
    (lattice, vec![[1, 0], [2, 0], [1, 1]])
}

/// Horizontal bar of `n` modules on the floor of an `axis`-wide grid,
/// with a one-module goal change: the rightmost module stands on top of
/// its left neighbour.
pub fn bar(n: i32, axis: u32) -> (Lattice, Vec<[i32; 2]>) {
    let cells: Vec<[i32; 2]> = (0..n).map(|x| [x, 0]).collect();
    let refs: Vec<&[i32]> = cells.iter().map(|c| &c[..]).collect();
    let lattice = TestLatticeBuilder::new(2, axis).movable(&refs).build();
    let mut goal = cells.clone();
    goal[(n - 1) as usize] = [n - 2, 1];
    (lattice, goal)
}

/// Two modules resting on a static floor row; the goal swaps which end of
/// the floor they occupy.
pub fn on_static_floor() -> (Lattice, Vec<[i32; 2]>) {
    let lattice = TestLatticeBuilder::new(2, 4)
        .statics(&[&[0, 0], &[1, 0], &[2, 0], &[3, 0]])
        .movable(&[&[0, 1], &[1, 1]])
        .build();
    (lattice, vec![[2, 1], [3, 1]])
}

/// 3D: a 2x2x1 slab whose goal raises one corner module onto the slab.
pub fn slab_3d() -> (Lattice, Vec<[i32; 3]>) {
    let lattice = TestLatticeBuilder::new(3, 3)
        .movable(&[&[0, 0, 0], &[1, 0, 0], &[0, 1, 0], &[1, 1, 0]])
        .build();
    (lattice, vec![[0, 0, 0], [1, 0, 0], [0, 1, 0], [0, 1, 1]])
}
