//! Adjacency offset sets.
//!
//! Adjacency decides which neighbouring cells count as connected for the
//! module graph. Exactly one mode is active per lattice.

use crate::error::LatticeError;
use indexmap::IndexSet;
use reconfig_core::Coord;

/// Which coordinate deltas count as adjacent.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub enum AdjacencyMode {
    /// Face-sharing cubes: `±1` along exactly one axis.
    #[default]
    Cube,
    /// Face-sharing rhombic dodecahedra: `±1` along exactly two axes.
    ///
    /// In 3D these are the twelve FCC neighbour offsets, permutations of
    /// `(±1, ±1, 0)`. Requires order ≥ 2.
    RhombicDodecahedron,
    /// Caller-supplied offsets. Negations are added so the relation is
    /// symmetric.
    General(Vec<Coord>),
}

impl AdjacencyMode {
    /// Resolve this mode into a deterministic offset list for `order`.
    pub fn offsets(&self, order: usize) -> Result<Vec<Coord>, LatticeError> {
        match self {
            Self::Cube => Ok(cube_offsets(order)),
            Self::RhombicDodecahedron => {
                if order < 2 {
                    return Err(LatticeError::InvalidAdjacency {
                        reason: "rhombic dodecahedron adjacency requires order >= 2".into(),
                    });
                }
                Ok(rhombic_dodecahedron_offsets(order))
            }
            Self::General(raw) => general_offsets(raw, order),
        }
    }
}

fn cube_offsets(order: usize) -> Vec<Coord> {
    let mut out = Vec::with_capacity(2 * order);
    for axis in 0..order {
        for sign in [1, -1] {
            let mut o: Coord = smallvec::smallvec![0; order];
            o[axis] = sign;
            out.push(o);
        }
    }
    out
}

fn rhombic_dodecahedron_offsets(order: usize) -> Vec<Coord> {
    let mut out = Vec::new();
    for a in 0..order {
        for b in (a + 1)..order {
            for (sa, sb) in [(1, 1), (-1, 1), (1, -1), (-1, -1)] {
                let mut o: Coord = smallvec::smallvec![0; order];
                o[a] = sa;
                o[b] = sb;
                out.push(o);
            }
        }
    }
    out
}

fn general_offsets(raw: &[Coord], order: usize) -> Result<Vec<Coord>, LatticeError> {
    if raw.is_empty() {
        return Err(LatticeError::InvalidAdjacency {
            reason: "offset list is empty".into(),
        });
    }
    let mut set: IndexSet<Coord> = IndexSet::with_capacity(raw.len() * 2);
    for offset in raw {
        if offset.len() != order {
            return Err(LatticeError::DimensionMismatch {
                expected: order,
                got: offset.len(),
            });
        }
        if offset.iter().all(|&c| c == 0) {
            return Err(LatticeError::InvalidAdjacency {
                reason: "zero offset is not an adjacency".into(),
            });
        }
        set.insert(offset.clone());
        set.insert(offset.iter().map(|c| -c).collect());
    }
    Ok(set.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    #[test]
    fn cube_has_two_per_axis() {
        let o = AdjacencyMode::Cube.offsets(3).unwrap();
        assert_eq!(o.len(), 6);
        assert!(o.contains(&smallvec![0, 0, -1]));
    }

    #[test]
    fn rhombic_dodecahedron_matches_fcc_in_3d() {
        let o = AdjacencyMode::RhombicDodecahedron.offsets(3).unwrap();
        assert_eq!(o.len(), 12);
        for off in &o {
            assert_eq!(off.iter().filter(|c| **c != 0).count(), 2);
        }
        assert!(AdjacencyMode::RhombicDodecahedron.offsets(1).is_err());
    }

    #[test]
    fn general_is_symmetrised_and_deduplicated() {
        let mode = AdjacencyMode::General(vec![smallvec![1, 0], smallvec![-1, 0], smallvec![1, 1]]);
        let o = mode.offsets(2).unwrap();
        assert_eq!(o.len(), 4);
        assert!(o.contains(&smallvec![-1, -1]));
    }

    #[test]
    fn general_rejects_zero_and_wrong_length() {
        assert!(AdjacencyMode::General(vec![smallvec![0, 0]]).offsets(2).is_err());
        assert!(matches!(
            AdjacencyMode::General(vec![smallvec![1, 0, 0]]).offsets(2),
            Err(LatticeError::DimensionMismatch { .. })
        ));
    }
}
