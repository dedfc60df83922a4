//! Admissible distance estimates from a configuration to the goal.
//!
//! Each heuristic here is a lower bound on the number of single-module
//! moves still needed, provided successors differ by exactly one catalog
//! move. MRSH-1 additionally assumes shortest displacement walks stay
//! within [`walk_length`]'s search box, which holds for the built-in moves.
//! A* optimality depends on admissibility; it is not checked at runtime.

use crate::cache::HeuristicCache;
use crate::config::{CacheLimits, HeuristicKind};
use indexmap::IndexMap;
use reconfig_core::{chebyshev, offset_between, Coord, PropertySet};
use reconfig_lattice::{Configuration, Geometry};
use reconfig_moves::MoveCatalog;
use std::collections::VecDeque;

/// A distance estimate towards one fixed goal.
pub trait Heuristic {
    /// Which heuristic this is.
    fn kind(&self) -> HeuristicKind;

    /// Non-negative lower bound on the moves from `config` to the goal.
    fn estimate(&mut self, config: &Configuration) -> f64;
}

/// Build the heuristic `kind` for `goal`.
///
/// `goal` and every configuration later passed to
/// [`estimate`](Heuristic::estimate) must agree on whether properties are
/// present.
pub fn build_heuristic(
    kind: HeuristicKind,
    goal: &Configuration,
    geometry: &Geometry,
    catalog: &MoveCatalog,
    limits: &CacheLimits,
) -> Box<dyn Heuristic> {
    match kind {
        HeuristicKind::SymmetricDifference => Box::new(SymmetricDifference { goal: goal.clone() }),
        HeuristicKind::CenterOfMassManhattan => Box::new(CenterOfMass::new(
            goal,
            geometry,
            Metric::Manhattan,
            catalog.max_l1(),
        )),
        HeuristicKind::CenterOfMassChebyshev => Box::new(CenterOfMass::new(
            goal,
            geometry,
            Metric::Chebyshev,
            catalog.max_linf(),
        )),
        HeuristicKind::NearestChebyshev => Box::new(NearestChebyshev {
            goals: GoalCells::new(goal, geometry),
            step: f64::from(catalog.max_linf().max(1)),
        }),
        HeuristicKind::Mrsh1 => Box::new(Mrsh1 {
            goals: GoalCells::new(goal, geometry),
            deltas: catalog.deltas().cloned().collect(),
            margin: catalog.max_linf().max(1) as i32,
            cache: HeuristicCache::new(limits.clone()),
        }),
    }
}

/// Goal coordinates grouped by property class.
struct GoalCells {
    geometry: Geometry,
    by_class: IndexMap<PropertySet, Vec<Coord>>,
}

impl GoalCells {
    fn new(goal: &Configuration, geometry: &Geometry) -> Self {
        let mut by_class: IndexMap<PropertySet, Vec<Coord>> = IndexMap::new();
        for o in goal.occupants() {
            by_class
                .entry(o.properties.clone())
                .or_default()
                .push(geometry.coord_of(o.cell));
        }
        Self {
            geometry: geometry.clone(),
            by_class,
        }
    }

    fn candidates(&self, props: &PropertySet) -> &[Coord] {
        self.by_class.get(props).map(Vec::as_slice).unwrap_or_default()
    }
}

// ── Symmetric difference ───────────────────────────────────────────

/// Modules not standing on a matching goal cell. One move fixes at most
/// one of them.
struct SymmetricDifference {
    goal: Configuration,
}

impl Heuristic for SymmetricDifference {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::SymmetricDifference
    }

    fn estimate(&mut self, config: &Configuration) -> f64 {
        config.difference(&self.goal).len() as f64
    }
}

// ── Center of mass ─────────────────────────────────────────────────

#[derive(Clone, Copy)]
enum Metric {
    Manhattan,
    Chebyshev,
}

/// Distance between coordinate sums (n times the centers of mass) divided
/// by the largest per-move change of that sum under the metric.
struct CenterOfMass {
    geometry: Geometry,
    goal_sum: Vec<i64>,
    metric: Metric,
    step: f64,
}

impl CenterOfMass {
    fn new(goal: &Configuration, geometry: &Geometry, metric: Metric, step: u32) -> Self {
        Self {
            geometry: geometry.clone(),
            goal_sum: coord_sum(goal, geometry),
            metric,
            step: f64::from(step.max(1)),
        }
    }
}

fn coord_sum(config: &Configuration, geometry: &Geometry) -> Vec<i64> {
    let mut sum = vec![0i64; geometry.order()];
    for c in config.coords(geometry) {
        for (s, &x) in sum.iter_mut().zip(c.iter()) {
            *s += i64::from(x);
        }
    }
    sum
}

impl Heuristic for CenterOfMass {
    fn kind(&self) -> HeuristicKind {
        match self.metric {
            Metric::Manhattan => HeuristicKind::CenterOfMassManhattan,
            Metric::Chebyshev => HeuristicKind::CenterOfMassChebyshev,
        }
    }

    fn estimate(&mut self, config: &Configuration) -> f64 {
        let sum = coord_sum(config, &self.geometry);
        let diffs = sum.iter().zip(&self.goal_sum).map(|(a, b)| (a - b).unsigned_abs());
        let d = match self.metric {
            Metric::Manhattan => diffs.sum::<u64>(),
            Metric::Chebyshev => diffs.max().unwrap_or(0),
        };
        d as f64 / self.step
    }
}

// ── Nearest Chebyshev ──────────────────────────────────────────────

/// Sum over modules of the Chebyshev distance to the nearest matching goal
/// cell, divided by the largest L∞ displacement.
struct NearestChebyshev {
    goals: GoalCells,
    step: f64,
}

impl Heuristic for NearestChebyshev {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::NearestChebyshev
    }

    fn estimate(&mut self, config: &Configuration) -> f64 {
        let mut total = 0u64;
        for o in config.occupants() {
            let here = self.goals.geometry.coord_of(o.cell);
            let nearest = self
                .goals
                .candidates(&o.properties)
                .iter()
                .map(|g| chebyshev(&here, g))
                .min()
                .unwrap_or(0);
            total += u64::from(nearest);
        }
        total as f64 / self.step
    }
}

// ── MRSH-1 ─────────────────────────────────────────────────────────

/// Sum over modules of the fewest catalog displacements that carry the
/// module onto its nearest matching goal cell, ignoring other modules.
///
/// Walk lengths depend only on the offset up to symmetry, so they are
/// memoized by canonical offset class (sorted absolute components).
struct Mrsh1 {
    goals: GoalCells,
    deltas: Vec<Coord>,
    margin: i32,
    cache: HeuristicCache,
}

impl Heuristic for Mrsh1 {
    fn kind(&self) -> HeuristicKind {
        HeuristicKind::Mrsh1
    }

    fn estimate(&mut self, config: &Configuration) -> f64 {
        let mut total = 0u64;
        for o in config.occupants() {
            let here = self.goals.geometry.coord_of(o.cell);
            self.cache.begin_module();
            let mut best: Option<u32> = None;
            for g in self.goals.candidates(&o.properties) {
                let sig = canonical_offset(&offset_between(&here, g));
                let (deltas, margin) = (&self.deltas, self.margin);
                let d = self
                    .cache
                    .lookup_or_compute(&sig, || walk_length(deltas, &sig, margin));
                best = Some(best.map_or(d, |b| b.min(d)));
                if d == 0 {
                    break;
                }
            }
            total += u64::from(best.unwrap_or(0));
        }
        total as f64
    }
}

/// Representative of an offset's class under signed axis permutations.
pub fn canonical_offset(offset: &[i32]) -> Coord {
    let mut c: Coord = offset.iter().map(|x| x.abs()).collect();
    c.sort_unstable();
    c
}

/// Fewest steps from the origin to `target` using `deltas`, searching a
/// box around both points widened by `margin`.
///
/// Exact for move sets whose shortest walks stay near the straight line
/// (all built-in sets). When no walk exists inside the box, falls back to
/// the L∞ lower bound so the result stays admissible.
pub fn walk_length(deltas: &[Coord], target: &[i32], margin: i32) -> u32 {
    if target.iter().all(|&t| t == 0) {
        return 0;
    }
    let lo: Vec<i32> = target.iter().map(|&t| t.min(0) - margin).collect();
    let hi: Vec<i32> = target.iter().map(|&t| t.max(0) + margin).collect();
    let extent: Vec<usize> = lo.iter().zip(&hi).map(|(l, h)| (h - l + 1) as usize).collect();
    let index = |c: &[i32]| -> Option<usize> {
        let mut idx = 0usize;
        for axis in (0..c.len()).rev() {
            if c[axis] < lo[axis] || c[axis] > hi[axis] {
                return None;
            }
            idx = idx * extent[axis] + (c[axis] - lo[axis]) as usize;
        }
        Some(idx)
    };
    let mut dist = vec![u32::MAX; extent.iter().product()];
    let origin: Coord = smallvec::smallvec![0; target.len()];
    let mut queue = VecDeque::new();
    if let Some(i) = index(&origin) {
        dist[i] = 0;
        queue.push_back(origin);
    }
    while let Some(c) = queue.pop_front() {
        let Some(ci) = index(&c) else { continue };
        let dc = dist[ci];
        for d in deltas {
            let n: Coord = c.iter().zip(d.iter()).map(|(a, b)| a + b).collect();
            let Some(ni) = index(&n) else { continue };
            if dist[ni] != u32::MAX {
                continue;
            }
            dist[ni] = dc + 1;
            if n.as_slice() == target {
                return dc + 1;
            }
            queue.push_back(n);
        }
    }
    let linf = target.iter().map(|t| t.unsigned_abs()).max().unwrap_or(0);
    linf.div_ceil(margin.max(1) as u32)
}
