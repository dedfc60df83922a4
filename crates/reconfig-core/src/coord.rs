//! Component-wise coordinate arithmetic and lattice metrics.
//!
//! All helpers operate on slices so callers holding either a [`Coord`]
//! or a borrowed `&[i32]` can use them without allocating.

use crate::id::Coord;

/// `base + delta`, component-wise.
///
/// Both slices must have the same length.
#[inline]
pub fn translate(base: &[i32], delta: &[i32]) -> Coord {
    debug_assert_eq!(base.len(), delta.len());
    base.iter().zip(delta).map(|(b, d)| b + d).collect()
}

/// `to - from`, component-wise.
#[inline]
pub fn offset_between(from: &[i32], to: &[i32]) -> Coord {
    debug_assert_eq!(from.len(), to.len());
    to.iter().zip(from).map(|(t, f)| t - f).collect()
}

/// L1 (Manhattan) length of the offset between `a` and `b`.
#[inline]
pub fn manhattan(a: &[i32], b: &[i32]) -> u32 {
    a.iter().zip(b).map(|(x, y)| x.abs_diff(*y)).sum()
}

/// L∞ (Chebyshev) length of the offset between `a` and `b`.
#[inline]
pub fn chebyshev(a: &[i32], b: &[i32]) -> u32 {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.abs_diff(*y))
        .max()
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use smallvec::smallvec;

    #[test]
    fn translate_and_offset_are_inverse() {
        let a: Coord = smallvec![1, -2, 3];
        let d: Coord = smallvec![0, 4, -1];
        let b = translate(&a, &d);
        assert_eq!(b.as_slice(), &[1, 2, 2]);
        assert_eq!(offset_between(&a, &b), d);
    }

    #[test]
    fn metrics_on_known_pairs() {
        assert_eq!(manhattan(&[0, 0], &[2, -3]), 5);
        assert_eq!(chebyshev(&[0, 0], &[2, -3]), 3);
        assert_eq!(chebyshev(&[], &[]), 0);
    }

    proptest! {
        #[test]
        fn chebyshev_never_exceeds_manhattan(
            a in proptest::collection::vec(-50i32..50, 3),
            b in proptest::collection::vec(-50i32..50, 3),
        ) {
            prop_assert!(chebyshev(&a, &b) <= manhattan(&a, &b));
            prop_assert_eq!(manhattan(&a, &b), manhattan(&b, &a));
        }
    }
}
