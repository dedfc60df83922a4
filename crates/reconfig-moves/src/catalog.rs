//! The symmetry-expanded library of move instances.

use crate::error::MoveError;
use crate::isometry::Isometry;
use crate::template::Move;
use indexmap::IndexMap;
use log::debug;
use reconfig_core::Coord;
use smallvec::SmallVec;
use std::collections::HashSet;

/// Every distinct symmetric instance of a set of move templates.
///
/// Instances are stored in a fixed order (template order, then isometry
/// order) which is also the enumeration order of legal moves, so search
/// tie-breaking is reproducible. Instances are indexed by displacement
/// for replay lookups.
#[derive(Clone, Debug)]
pub struct MoveCatalog {
    order: usize,
    moves: Vec<Move>,
    by_delta: IndexMap<Coord, SmallVec<[usize; 4]>>,
    max_l1: u32,
    max_linf: u32,
}

impl MoveCatalog {
    /// Instantiate `templates` under every isometry of an `order`-D lattice,
    /// dropping duplicate patterns.
    ///
    /// Templates of lower order are lifted first. Fails on a template of
    /// higher order, or if nothing remains.
    pub fn build(order: usize, templates: &[Move]) -> Result<Self, MoveError> {
        let isometries = Isometry::all(order);
        let mut moves: Vec<Move> = Vec::new();
        let mut seen = HashSet::new();
        for template in templates {
            let lifted = template.lifted(order)?;
            let before = moves.len();
            for iso in &isometries {
                let instance = lifted.transformed(iso);
                let key = (
                    Coord::from_slice(instance.delta()),
                    instance.checks().to_vec(),
                );
                if seen.insert(key) {
                    moves.push(instance);
                }
            }
            debug!(
                "[Catalog] template '{}': {} instances",
                template.name(),
                moves.len() - before
            );
        }
        if moves.is_empty() {
            return Err(MoveError::InvalidTemplate {
                name: "<catalog>".into(),
                reason: "no move templates supplied".into(),
            });
        }
        let mut by_delta: IndexMap<Coord, SmallVec<[usize; 4]>> = IndexMap::new();
        for (i, m) in moves.iter().enumerate() {
            by_delta.entry(Coord::from_slice(m.delta())).or_default().push(i);
        }
        let max_l1 = moves.iter().map(Move::l1).max().unwrap_or(0);
        let max_linf = moves.iter().map(Move::linf).max().unwrap_or(0);
        debug!(
            "[Catalog] order={} moves={} distinct displacements={}",
            order,
            moves.len(),
            by_delta.len()
        );
        Ok(Self {
            order,
            moves,
            by_delta,
            max_l1,
            max_linf,
        })
    }

    /// Lattice order.
    pub fn order(&self) -> usize {
        self.order
    }

    /// All instances in enumeration order.
    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the catalog is empty. Never true for a built catalog.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Instances with displacement `delta`, in enumeration order.
    pub fn with_delta<'a>(&'a self, delta: &[i32]) -> impl Iterator<Item = &'a Move> + 'a {
        self.by_delta
            .get(delta)
            .into_iter()
            .flat_map(move |ids| ids.iter().map(move |&i| &self.moves[i]))
    }

    /// Distinct displacements, in first-seen order.
    pub fn deltas(&self) -> impl Iterator<Item = &Coord> {
        self.by_delta.keys()
    }

    /// Largest L1 displacement of any instance.
    pub fn max_l1(&self) -> u32 {
        self.max_l1
    }

    /// Largest L∞ displacement of any instance.
    pub fn max_linf(&self) -> u32 {
        self.max_linf
    }
}
