//! Canonical, order-independent search states.
//!
//! A [`Configuration`] is the set of cells occupied by movable modules,
//! each optionally tagged with the module's [`PropertySet`]. Module
//! identity and move history are not part of it: two lattices with
//! the same occupied cells (and, when enabled, the same per-cell
//! properties) produce equal configurations regardless of how their
//! modules were numbered.
//!
//! Occupants are stored sorted by cell behind an `Arc`, so clones are
//! cheap and derived `Eq`/`Hash`/`Ord` give the set semantics directly.

use crate::error::LatticeError;
use crate::geometry::Geometry;
use reconfig_core::{Coord, PropertySet};
use std::cmp::Ordering;
use std::sync::Arc;

/// One occupied cell of a configuration.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Occupant {
    /// Flat lattice index of the cell.
    pub cell: u32,
    /// Properties of the module standing there.
    pub properties: PropertySet,
}

impl Occupant {
    /// An occupant without properties.
    pub fn bare(cell: u32) -> Self {
        Self {
            cell,
            properties: PropertySet::new(),
        }
    }
}

/// Immutable occupancy snapshot used as the search-state key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Configuration {
    occupants: Arc<[Occupant]>,
}

impl Configuration {
    /// Build from occupants in any order.
    ///
    /// Fails if two occupants share a cell.
    pub fn new(mut occupants: Vec<Occupant>) -> Result<Self, LatticeError> {
        occupants.sort_unstable();
        if let Some(w) = occupants.windows(2).find(|w| w[0].cell == w[1].cell) {
            return Err(LatticeError::ConfigurationMismatch {
                reason: format!("cell {} listed twice", w[0].cell),
            });
        }
        Ok(Self {
            occupants: occupants.into(),
        })
    }

    /// Build from bare cell indices.
    pub fn from_cells<I: IntoIterator<Item = u32>>(cells: I) -> Result<Self, LatticeError> {
        Self::new(cells.into_iter().map(Occupant::bare).collect())
    }

    /// Build from coordinates on `geometry`, without properties.
    pub fn from_coords<'a, I>(geometry: &Geometry, coords: I) -> Result<Self, LatticeError>
    where
        I: IntoIterator<Item = &'a [i32]>,
    {
        let mut occupants = Vec::new();
        for c in coords {
            occupants.push(Occupant::bare(geometry.check_interior(c)?));
        }
        Self::new(occupants)
    }

    /// Number of movable modules represented.
    pub fn len(&self) -> usize {
        self.occupants.len()
    }

    /// Whether no module is represented.
    pub fn is_empty(&self) -> bool {
        self.occupants.is_empty()
    }

    /// Occupants sorted by cell.
    pub fn occupants(&self) -> &[Occupant] {
        &self.occupants
    }

    /// Occupied cells in ascending order.
    pub fn cells(&self) -> impl Iterator<Item = u32> + '_ {
        self.occupants.iter().map(|o| o.cell)
    }

    /// Occupied coordinates in ascending cell order.
    pub fn coords<'a>(&'a self, geometry: &'a Geometry) -> impl Iterator<Item = Coord> + 'a {
        self.occupants.iter().map(|o| geometry.coord_of(o.cell))
    }

    /// Position of `cell` within [`occupants`](Self::occupants).
    #[inline]
    pub fn position(&self, cell: u32) -> Option<usize> {
        self.occupants.binary_search_by_key(&cell, |o| o.cell).ok()
    }

    /// Whether `cell` is occupied.
    #[inline]
    pub fn contains_cell(&self, cell: u32) -> bool {
        self.position(cell).is_some()
    }

    /// Whether any occupant carries properties.
    pub fn has_properties(&self) -> bool {
        self.occupants.iter().any(|o| !o.properties.is_empty())
    }

    /// Copy with every property set cleared.
    pub fn without_properties(&self) -> Self {
        let mut occupants: Vec<Occupant> =
            self.occupants.iter().map(|o| Occupant::bare(o.cell)).collect();
        occupants.sort_unstable();
        Self {
            occupants: occupants.into(),
        }
    }

    /// The configuration after the module at `from` moves to `to`.
    ///
    /// Properties travel with the module. Returns `None` if `from` is not
    /// occupied or `to` already is. `self` is left untouched.
    pub fn with_moved(&self, from: u32, to: u32) -> Option<Self> {
        let src = self.position(from)?;
        if from == to || self.contains_cell(to) {
            return None;
        }
        let moving = Occupant {
            cell: to,
            properties: self.occupants[src].properties.clone(),
        };
        let mut out = Vec::with_capacity(self.occupants.len());
        let mut pending = Some(moving);
        for (i, occ) in self.occupants.iter().enumerate() {
            if i == src {
                continue;
            }
            if let Some(m) = pending.as_ref() {
                if m.cell < occ.cell {
                    out.push(pending.take()?);
                }
            }
            out.push(occ.clone());
        }
        if let Some(m) = pending {
            out.push(m);
        }
        Some(Self {
            occupants: out.into(),
        })
    }

    /// Occupants of `self` that do not appear (cell and properties) in
    /// `other`, in cell order.
    pub fn difference<'a>(&'a self, other: &'a Self) -> Vec<&'a Occupant> {
        let mut out = Vec::new();
        let (a, b) = (&*self.occupants, &*other.occupants);
        let (mut i, mut j) = (0, 0);
        while i < a.len() {
            if j >= b.len() {
                out.extend(a[i..].iter());
                break;
            }
            match a[i].cmp(&b[j]) {
                Ordering::Less => {
                    out.push(&a[i]);
                    i += 1;
                }
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
            }
        }
        out
    }
}
