//! The hyperoctahedral group: lattice symmetries as signed permutations.

use reconfig_core::Coord;
use smallvec::SmallVec;

/// One lattice isometry fixing the origin.
///
/// Maps `v` to `w` with `w[i] = signs[i] * v[perm[i]]`. The group for
/// order `n` has `2^n * n!` elements: 8 in 2D, 48 in 3D.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Isometry {
    perm: SmallVec<[u8; 4]>,
    signs: SmallVec<[i8; 4]>,
}

impl Isometry {
    /// The identity of order `order`.
    pub fn identity(order: usize) -> Self {
        Self {
            perm: (0..order as u8).collect(),
            signs: smallvec::smallvec![1; order],
        }
    }

    /// Order of the lattice this isometry acts on.
    pub fn order(&self) -> usize {
        self.perm.len()
    }

    /// Image of `v`. `v` must have length [`order`](Self::order).
    pub fn apply(&self, v: &[i32]) -> Coord {
        self.perm
            .iter()
            .zip(&self.signs)
            .map(|(&p, &s)| s as i32 * v[p as usize])
            .collect()
    }

    /// Every isometry of order `order`, identity first.
    pub fn all(order: usize) -> Vec<Self> {
        let perms = permutations(order);
        let mut out = Vec::with_capacity(perms.len() << order);
        for perm in perms {
            for mask in 0u32..(1 << order) {
                let signs = (0..order)
                    .map(|i| if mask & (1 << i) == 0 { 1 } else { -1 })
                    .collect();
                out.push(Self {
                    perm: perm.clone(),
                    signs,
                });
            }
        }
        out
    }
}

/// Permutations of `0..n` in lexicographic order.
fn permutations(n: usize) -> Vec<SmallVec<[u8; 4]>> {
    let mut current: SmallVec<[u8; 4]> = (0..n as u8).collect();
    let mut out = vec![current.clone()];
    loop {
        // Next lexicographic permutation.
        let Some(i) = (1..n).rev().find(|&i| current[i - 1] < current[i]) else {
            return out;
        };
        let j = (i..n)
            .rev()
            .find(|&j| current[j] > current[i - 1])
            .unwrap_or(i);
        current.swap(i - 1, j);
        current[i..].reverse();
        out.push(current.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn group_sizes() {
        assert_eq!(Isometry::all(1).len(), 2);
        assert_eq!(Isometry::all(2).len(), 8);
        assert_eq!(Isometry::all(3).len(), 48);
    }

    #[test]
    fn identity_comes_first() {
        let all = Isometry::all(3);
        assert_eq!(all[0], Isometry::identity(3));
        assert_eq!(all[0].apply(&[1, 2, 3]).as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn images_of_a_generic_vector_are_distinct() {
        let images: HashSet<Coord> = Isometry::all(3)
            .iter()
            .map(|iso| iso.apply(&[1, 2, 3]))
            .collect();
        assert_eq!(images.len(), 48);
    }

    #[test]
    fn isometries_preserve_norms() {
        for iso in Isometry::all(3) {
            let w = iso.apply(&[3, -1, 2]);
            assert_eq!(w.iter().map(|c| c.abs()).sum::<i32>(), 6);
            assert_eq!(w.iter().map(|c| c.abs()).max(), Some(3));
        }
    }
}
