//! Strongly-typed identifiers and the [`Coord`] type alias.

use smallvec::SmallVec;
use std::fmt;

/// Identifies a module registered with a lattice.
///
/// Movable modules receive ids `0..min_static_id`; static modules are
/// registered afterwards and occupy the contiguous range above. Checking
/// whether a module may move is therefore a single comparison.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

impl ModuleId {
    /// The id as a `usize` index into module tables.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ModuleId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// A coordinate (or coordinate offset) on the lattice.
///
/// Uses `SmallVec<[i32; 4]>` to avoid heap allocation for lattices up to
/// four dimensions; 2D and 3D scenarios never touch the heap.
pub type Coord = SmallVec<[i32; 4]>;
