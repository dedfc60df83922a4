//! Move definitions: occupancy patterns, displacement, and animation.

use crate::error::MoveError;
use crate::isometry::Isometry;
use reconfig_core::{translate, Coord, ModuleId};
use reconfig_lattice::{CellState, Occupancy};
use std::sync::Arc;

/// What a checked cell must contain for a move to apply.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Requirement {
    /// Cell must be empty (not a module, not a boundary).
    Empty,
    /// Cell must hold a module. Boundaries do not count.
    Occupied,
}

/// Kind of one animation step.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum AnimKind {
    /// Straight translation.
    Slide,
    /// Rotation about the edge shared with the module at `anchor`
    /// (relative to the moving module before the step).
    Pivot {
        /// Offset of the anchor module.
        anchor: Coord,
    },
}

/// One animation step: a displacement and how it is performed.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AnimStep {
    /// How the module moves.
    pub kind: AnimKind,
    /// Displacement of the module over this step.
    pub offset: Coord,
}

impl AnimStep {
    /// Numeric animation code used by the `.scen` format.
    ///
    /// Slides are `0`. Pivots encode the anchor direction: one digit per
    /// non-zero axis, `axis + 1` for positive and `axis + 4` for negative.
    pub fn code(&self) -> u32 {
        match &self.kind {
            AnimKind::Slide => 0,
            AnimKind::Pivot { anchor } => anchor
                .iter()
                .enumerate()
                .filter(|(_, &c)| c != 0)
                .fold(0, |code, (axis, &c)| {
                    code * 10 + axis as u32 + 1 + if c < 0 { 3 } else { 0 }
                }),
        }
    }

    fn transformed(&self, iso: &Isometry) -> Self {
        Self {
            kind: match &self.kind {
                AnimKind::Slide => AnimKind::Slide,
                AnimKind::Pivot { anchor } => AnimKind::Pivot {
                    anchor: iso.apply(anchor),
                },
            },
            offset: iso.apply(&self.offset),
        }
    }

    fn lifted(&self, order: usize) -> Self {
        Self {
            kind: match &self.kind {
                AnimKind::Slide => AnimKind::Slide,
                AnimKind::Pivot { anchor } => AnimKind::Pivot {
                    anchor: lift(anchor, order),
                },
            },
            offset: lift(&self.offset, order),
        }
    }
}

fn lift(v: &[i32], order: usize) -> Coord {
    let mut out = Coord::from_slice(v);
    out.resize(order, 0);
    out
}

/// A single-module move relative to the moving module at the origin.
///
/// The same type serves as a canonical template and as one of its
/// symmetry-instantiated copies in a [`MoveCatalog`](crate::MoveCatalog).
/// Checks are kept sorted and always include the destination as
/// [`Requirement::Empty`], so two moves with the same pattern compare
/// equal on [`pattern_key`](Self::pattern_key).
#[derive(Clone, Debug)]
pub struct Move {
    name: Arc<str>,
    delta: Coord,
    checks: Vec<(Coord, Requirement)>,
    anim: Vec<AnimStep>,
}

impl Move {
    /// Build a move.
    ///
    /// An empty `anim` becomes a single slide over `delta`. Fails if the
    /// delta is zero, if offsets have inconsistent lengths, if the origin
    /// is checked, if a cell is checked twice with different requirements,
    /// if the destination is required occupied, or if the animation does
    /// not add up to `delta`.
    pub fn new(
        name: &str,
        delta: Coord,
        checks: Vec<(Coord, Requirement)>,
        anim: Vec<AnimStep>,
    ) -> Result<Self, MoveError> {
        let invalid = |reason: &str| MoveError::InvalidTemplate {
            name: name.to_string(),
            reason: reason.to_string(),
        };
        let order = delta.len();
        if order == 0 || delta.iter().all(|&d| d == 0) {
            return Err(invalid("displacement must be non-zero"));
        }
        let mut checks = checks;
        let step_fits = |s: &AnimStep| {
            s.offset.len() == order
                && match &s.kind {
                    AnimKind::Slide => true,
                    AnimKind::Pivot { anchor } => anchor.len() == order,
                }
        };
        if checks.iter().any(|(c, _)| c.len() != order) || !anim.iter().all(step_fits) {
            return Err(invalid("offsets have inconsistent lengths"));
        }
        if checks.iter().any(|(c, _)| c.iter().all(|&x| x == 0)) {
            return Err(invalid("the moving module's own cell cannot be checked"));
        }
        checks.push((delta.clone(), Requirement::Empty));
        checks.sort();
        checks.dedup();
        if checks.windows(2).any(|w| w[0].0 == w[1].0) {
            return Err(invalid("a cell is required both empty and occupied"));
        }
        let anim = if anim.is_empty() {
            vec![AnimStep {
                kind: AnimKind::Slide,
                offset: delta.clone(),
            }]
        } else {
            anim
        };
        let mut total = smallvec::smallvec![0; order];
        for step in &anim {
            total = translate(&total, &step.offset);
        }
        if total != delta {
            return Err(invalid("animation steps do not sum to the displacement"));
        }
        Ok(Self {
            name: Arc::from(name),
            delta,
            checks,
            anim,
        })
    }

    /// Template name; shared by all symmetric instances.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lattice order of the move.
    pub fn order(&self) -> usize {
        self.delta.len()
    }

    /// Displacement of the moving module.
    pub fn delta(&self) -> &[i32] {
        &self.delta
    }

    /// Sorted precondition pattern, destination included.
    pub fn checks(&self) -> &[(Coord, Requirement)] {
        &self.checks
    }

    /// Ordered animation steps.
    pub fn anim(&self) -> &[AnimStep] {
        &self.anim
    }

    /// Identity of the move as a pattern: displacement plus checks.
    pub fn pattern_key(&self) -> (&[i32], &[(Coord, Requirement)]) {
        (&self.delta, &self.checks)
    }

    /// Relative cells touched by the move: origin, destination, and every
    /// checked cell.
    pub fn footprint(&self) -> Vec<Coord> {
        let mut cells: Vec<Coord> = Vec::with_capacity(self.checks.len() + 1);
        cells.push(smallvec::smallvec![0; self.order()]);
        cells.extend(self.checks.iter().map(|(c, _)| c.clone()));
        cells
    }

    /// The image of this move under `iso`.
    pub fn transformed(&self, iso: &Isometry) -> Self {
        let mut checks: Vec<_> = self
            .checks
            .iter()
            .map(|(c, r)| (iso.apply(c), *r))
            .collect();
        checks.sort();
        Self {
            name: Arc::clone(&self.name),
            delta: iso.apply(&self.delta),
            checks,
            anim: self.anim.iter().map(|s| s.transformed(iso)).collect(),
        }
    }

    /// This move embedded in a higher-order lattice (extra axes zero).
    pub fn lifted(&self, order: usize) -> Result<Self, MoveError> {
        if order < self.order() {
            return Err(MoveError::DimensionMismatch {
                expected: order,
                got: self.order(),
            });
        }
        if order == self.order() {
            return Ok(self.clone());
        }
        Ok(Self {
            name: Arc::clone(&self.name),
            delta: lift(&self.delta, order),
            checks: self
                .checks
                .iter()
                .map(|(c, r)| (lift(c, order), *r))
                .collect(),
            anim: self.anim.iter().map(|s| s.lifted(order)).collect(),
        })
    }

    /// Whether the occupancy pattern holds for a module at `origin`.
    ///
    /// Checks only the local pattern; connectivity is the caller's concern.
    #[inline]
    pub fn pattern_holds<O: Occupancy + ?Sized>(&self, occ: &O, origin: &[i32]) -> bool {
        self.checks.iter().all(|(offset, req)| {
            let cell = occ.occupied_at(&translate(origin, offset));
            match req {
                Requirement::Empty => cell.is_empty(),
                Requirement::Occupied => matches!(cell, CellState::Module(_)),
            }
        })
    }

    /// Whether the pattern holds and the cell at `origin` is the module
    /// `id`.
    pub fn applies_to<O: Occupancy + ?Sized>(&self, occ: &O, origin: &[i32], id: ModuleId) -> bool {
        occ.occupied_at(origin) == CellState::Module(id) && self.pattern_holds(occ, origin)
    }

    /// L1 length of the displacement.
    pub fn l1(&self) -> u32 {
        self.delta.iter().map(|d| d.unsigned_abs()).sum()
    }

    /// L∞ length of the displacement.
    pub fn linf(&self) -> u32 {
        self.delta.iter().map(|d| d.unsigned_abs()).max().unwrap_or(0)
    }

    /// Parse a character-grid definition.
    ///
    /// `layers` lists 2D slices in increasing order of the third axis (one
    /// layer for 2D moves). Each slice lists rows from the highest second
    /// coordinate down; characters run along the first axis:
    ///
    /// - `S` the moving module (exactly one),
    /// - `F` its destination (exactly one),
    /// - `x` must be empty, `#` must hold a module,
    /// - `?` or space: don't care.
    pub fn from_grid(
        name: &str,
        order: usize,
        layers: &[Vec<String>],
        anim: Vec<AnimStep>,
    ) -> Result<Self, MoveError> {
        let invalid = |reason: String| MoveError::InvalidTemplate {
            name: name.to_string(),
            reason,
        };
        if !(2..=3).contains(&order) {
            return Err(invalid(format!("grid definitions need order 2 or 3, got {order}")));
        }
        if order == 2 && layers.len() != 1 {
            return Err(invalid("2D definitions take exactly one layer".into()));
        }
        let mut origin: Option<Coord> = None;
        let mut dest: Option<Coord> = None;
        let mut cells: Vec<(Coord, Requirement)> = Vec::new();
        for (z, layer) in layers.iter().enumerate() {
            let height = layer.len();
            for (row, line) in layer.iter().enumerate() {
                let y = (height - 1 - row) as i32;
                for (x, ch) in line.chars().enumerate() {
                    let mut at: Coord = smallvec::smallvec![x as i32, y];
                    if order == 3 {
                        at.push(z as i32);
                    }
                    match ch {
                        'S' if origin.is_none() => origin = Some(at),
                        'F' if dest.is_none() => dest = Some(at),
                        'S' | 'F' => return Err(invalid(format!("more than one '{ch}'"))),
                        'x' => cells.push((at, Requirement::Empty)),
                        '#' => cells.push((at, Requirement::Occupied)),
                        '?' | ' ' => {}
                        other => return Err(invalid(format!("unknown cell character '{other}'"))),
                    }
                }
            }
        }
        let origin = origin.ok_or_else(|| invalid("missing 'S'".into()))?;
        let dest = dest.ok_or_else(|| invalid("missing 'F'".into()))?;
        let rel = |c: &Coord| -> Coord { c.iter().zip(&origin).map(|(a, b)| a - b).collect() };
        let checks = cells.iter().map(|(c, r)| (rel(c), *r)).collect();
        Self::new(name, rel(&dest), checks, anim)
    }
}

/// Built-in slide: unit translation along a face, both side cells held.
///
/// ```text
/// ##
/// SF
/// ```
pub fn slide(order: usize) -> Result<Move, MoveError> {
    if order < 2 {
        return Err(MoveError::DimensionMismatch {
            expected: order,
            got: 2,
        });
    }
    let e = |x: i32, y: i32| lift(&[x, y], order);
    Move::new(
        "slide",
        e(1, 0),
        vec![
            (e(0, 1), Requirement::Occupied),
            (e(1, 1), Requirement::Occupied),
        ],
        vec![],
    )
}

/// Built-in convex pivot about the edge shared with an anchor module.
///
/// ```text
/// #F
/// Sx
/// ```
pub fn pivot(order: usize) -> Result<Move, MoveError> {
    if order < 2 {
        return Err(MoveError::DimensionMismatch {
            expected: order,
            got: 2,
        });
    }
    let e = |x: i32, y: i32| lift(&[x, y], order);
    Move::new(
        "pivot",
        e(1, 1),
        vec![
            (e(0, 1), Requirement::Occupied),
            (e(1, 0), Requirement::Empty),
        ],
        vec![AnimStep {
            kind: AnimKind::Pivot { anchor: e(0, 1) },
            offset: e(1, 1),
        }],
    )
}

/// The built-in templates for a cube lattice of order `order` (at least 2).
pub fn builtin_moves(order: usize) -> Result<Vec<Move>, MoveError> {
    Ok(vec![slide(order)?, pivot(order)?])
}
