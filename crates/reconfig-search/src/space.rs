//! The search driver: A*, BFS, bidirectional A*, and random goals.

use crate::config::{HeuristicKind, SearchConfig, SearchMethod};
use crate::error::SearchError;
use crate::expand::successors;
use crate::frontier::Frontier;
use crate::heuristic::build_heuristic;
use crate::outcome::{SearchOutcome, SearchPath, SearchReport, SearchStats};
use indexmap::IndexMap;
use log::{debug, trace};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reconfig_core::PropertySet;
use reconfig_lattice::{Configuration, Lattice, LatticeError, Occupancy, OccupancyGrid};
use reconfig_moves::{MoveCatalog, MoveError, MoveManager};
use std::collections::VecDeque;
use std::time::Instant;

/// Search over configurations of one populated lattice.
///
/// The lattice supplies geometry, static modules, and boundaries; it is
/// only read. Start and goal are [`Configuration`]s of the lattice's
/// movable modules. Properties are matched when the lattice's modules
/// carry any and [`SearchConfig::ignore_properties`] is off; otherwise
/// they are stripped from both ends.
pub struct ConfigurationSpace<'a> {
    lattice: &'a Lattice,
    moves: MoveManager,
    config: SearchConfig,
    grid: OccupancyGrid,
    match_props: bool,
}

impl<'a> ConfigurationSpace<'a> {
    /// Prepare a search space over `lattice` using the moves in `catalog`.
    pub fn new(
        lattice: &'a Lattice,
        catalog: MoveCatalog,
        config: SearchConfig,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        if catalog.order() != lattice.order() {
            return Err(MoveError::DimensionMismatch {
                expected: lattice.order(),
                got: catalog.order(),
            }
            .into());
        }
        let moves = MoveManager::new(catalog, lattice.adjacency().to_vec())
            .with_connectivity(config.require_connectivity);
        let match_props = !config.ignore_properties && lattice.has_properties();
        debug!(
            "[Search] space: {} movable modules, {} moves, properties {}",
            lattice.movable_count(),
            moves.catalog().len(),
            if match_props { "matched" } else { "ignored" }
        );
        Ok(Self {
            lattice,
            moves,
            grid: OccupancyGrid::from_lattice(lattice),
            config,
            match_props,
        })
    }

    /// The move manager used for expansion; also suits replay of results.
    pub fn moves(&self) -> &MoveManager {
        &self.moves
    }

    /// Active configuration.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Whether properties take part in state equality.
    pub fn matches_properties(&self) -> bool {
        self.match_props
    }

    /// The lattice's current state, normalized for this space.
    pub fn start(&self) -> Configuration {
        self.lattice.snapshot_as_configuration(!self.match_props)
    }

    /// Check that `state` fits this lattice and normalize its properties.
    ///
    /// Fails if the module count differs from the lattice's movable count,
    /// or if a cell is off the interior or taken by a static module or
    /// boundary.
    pub fn prepare(&mut self, state: &Configuration) -> Result<Configuration, SearchError> {
        let expected = self.lattice.movable_count();
        if state.len() != expected {
            return Err(SearchError::ModuleCountMismatch {
                expected,
                got: state.len(),
            });
        }
        self.grid.clear();
        let geometry = self.lattice.geometry();
        for o in state.occupants() {
            if o.cell as usize >= geometry.cell_count() {
                return Err(LatticeError::ConfigurationMismatch {
                    reason: format!("cell index {} outside the lattice", o.cell),
                }
                .into());
            }
            let occupant = self.grid.cell(o.cell);
            if !occupant.is_empty() {
                return Err(LatticeError::CellOccupied {
                    coord: geometry.coord_of(o.cell),
                    occupant,
                }
                .into());
            }
        }
        Ok(if self.match_props {
            state.clone()
        } else {
            state.without_properties()
        })
    }

    fn prepare_pair(
        &mut self,
        start: &Configuration,
        goal: &Configuration,
    ) -> Result<(Configuration, Configuration), SearchError> {
        let start = self.prepare(start)?;
        let goal = self.prepare(goal)?;
        if self.match_props {
            let props = |c: &Configuration| {
                let mut v: Vec<PropertySet> =
                    c.occupants().iter().map(|o| o.properties.clone()).collect();
                v.sort();
                v
            };
            if props(&start) != props(&goal) {
                return Err(SearchError::PropertyMismatch {
                    reason: "start and goal carry different module properties".into(),
                });
            }
        }
        Ok((start, goal))
    }

    /// Every configuration one legal move from `state`.
    pub fn successors(&mut self, state: &Configuration) -> Vec<Configuration> {
        successors(
            &mut self.grid,
            &self.moves,
            self.lattice.geometry(),
            state,
            self.config.expansion_threads,
        )
    }

    /// Search from the lattice's current state to `goal`.
    pub fn search(
        &mut self,
        method: SearchMethod,
        heuristic: HeuristicKind,
        goal: &Configuration,
    ) -> Result<SearchReport, SearchError> {
        let start = self.start();
        match method {
            SearchMethod::AStar => self.a_star(&start, goal, heuristic),
            SearchMethod::Bfs => self.bfs(&start, goal),
            SearchMethod::Bidirectional => self.bidirectional(&start, goal, heuristic),
        }
    }

    /// Returns `true` once a budget limit is hit.
    fn over_budget(&self, stats: &SearchStats, clock: Instant) -> bool {
        let budget = &self.config.budget;
        budget.max_expansions.is_some_and(|m| stats.expanded >= m)
            || budget.max_duration.is_some_and(|d| clock.elapsed() >= d)
    }

    fn finish(
        &self,
        method: SearchMethod,
        heuristic: Option<HeuristicKind>,
        outcome: SearchOutcome,
        mut stats: SearchStats,
        clock: Instant,
    ) -> SearchReport {
        stats.duration = clock.elapsed();
        let tag = match method {
            SearchMethod::AStar => "[AStar]",
            SearchMethod::Bfs => "[BFS]",
            SearchMethod::Bidirectional => "[Bidir]",
        };
        match &outcome {
            SearchOutcome::Found(path) => debug!(
                "{tag} found {} moves after {} expansions in {:?}",
                path.move_count(),
                stats.expanded,
                stats.duration
            ),
            SearchOutcome::Unreachable => debug!(
                "{tag} unreachable after {} expansions in {:?}",
                stats.expanded, stats.duration
            ),
            SearchOutcome::BudgetExceeded => debug!(
                "{tag} budget exceeded after {} expansions in {:?}",
                stats.expanded, stats.duration
            ),
        }
        SearchReport {
            method,
            heuristic,
            outcome,
            stats,
        }
    }

    /// A* from `start` to `goal`.
    ///
    /// Optimal in move count when `heuristic` is admissible. The goal test
    /// happens when a state is popped, so `start == goal` returns a
    /// zero-move path without expanding anything.
    pub fn a_star(
        &mut self,
        start: &Configuration,
        goal: &Configuration,
        heuristic: HeuristicKind,
    ) -> Result<SearchReport, SearchError> {
        let (start, goal) = self.prepare_pair(start, goal)?;
        let clock = Instant::now();
        let mut stats = SearchStats::default();
        let h = build_heuristic(
            heuristic,
            &goal,
            self.lattice.geometry(),
            self.moves.catalog(),
            &self.config.cache,
        );
        debug!("[AStar] start: {} modules, heuristic {heuristic}", start.len());
        let mut frontier = Frontier::new(start, h);

        let outcome = loop {
            let Some(node) = frontier.pop() else {
                break SearchOutcome::Unreachable;
            };
            if *frontier.state(node) == goal {
                break SearchOutcome::Found(SearchPath::new(frontier.chain(node)));
            }
            if self.over_budget(&stats, clock) {
                break SearchOutcome::BudgetExceeded;
            }
            frontier.close(node);
            stats.record_expansion(frontier.g(node) as usize, clock.elapsed());
            trace!(
                "[AStar] expand g={} h={} open={}",
                frontier.g(node),
                frontier.h(node),
                frontier.open_len()
            );
            let state = frontier.state(node).clone();
            for next in self.successors(&state) {
                stats.generated += 1;
                frontier.relax(node, next);
            }
            stats.peak_open = stats.peak_open.max(frontier.open_len());
        };
        Ok(self.finish(SearchMethod::AStar, Some(heuristic), outcome, stats, clock))
    }

    /// Breadth-first search from `start` to `goal`.
    ///
    /// Shortest in move count. The goal test happens when a state is
    /// generated.
    pub fn bfs(
        &mut self,
        start: &Configuration,
        goal: &Configuration,
    ) -> Result<SearchReport, SearchError> {
        let (start, goal) = self.prepare_pair(start, goal)?;
        let clock = Instant::now();
        let mut stats = SearchStats::default();
        debug!("[BFS] start: {} modules", start.len());
        if start == goal {
            let path = SearchPath::new(vec![start]);
            return Ok(self.finish(SearchMethod::Bfs, None, SearchOutcome::Found(path), stats, clock));
        }
        let mut parents: IndexMap<Configuration, Option<usize>> = IndexMap::new();
        parents.insert(start, None);
        let mut depth = vec![0usize];
        let mut queue = VecDeque::from([0usize]);

        let outcome = 'search: loop {
            let Some(node) = queue.pop_front() else {
                break SearchOutcome::Unreachable;
            };
            if self.over_budget(&stats, clock) {
                break SearchOutcome::BudgetExceeded;
            }
            stats.record_expansion(depth[node], clock.elapsed());
            let state = parents
                .get_index(node)
                .map(|(k, _)| k.clone())
                .expect("queued indices come from the parent map");
            for next in self.successors(&state) {
                stats.generated += 1;
                if parents.contains_key(&next) {
                    continue;
                }
                let is_goal = next == goal;
                let (idx, _) = parents.insert_full(next, Some(node));
                depth.push(depth[node] + 1);
                if is_goal {
                    break 'search SearchOutcome::Found(SearchPath::new(bfs_chain(&parents, idx)));
                }
                queue.push_back(idx);
            }
            stats.peak_open = stats.peak_open.max(queue.len());
        };
        Ok(self.finish(SearchMethod::Bfs, None, outcome, stats, clock))
    }

    /// A* from both ends at once, meeting in the middle.
    ///
    /// Each step expands the frontier with the smaller open set. The
    /// search stops as soon as one side generates a state the other side
    /// has reached; the path is the concatenation of both partial paths.
    /// Shorter frontiers, but the path is not guaranteed shortest. Relies
    /// on moves being reversible.
    pub fn bidirectional(
        &mut self,
        start: &Configuration,
        goal: &Configuration,
        heuristic: HeuristicKind,
    ) -> Result<SearchReport, SearchError> {
        let (start, goal) = self.prepare_pair(start, goal)?;
        let clock = Instant::now();
        let mut stats = SearchStats::default();
        debug!("[Bidir] start: {} modules, heuristic {heuristic}", start.len());
        if start == goal {
            let path = SearchPath::new(vec![start]);
            return Ok(self.finish(
                SearchMethod::Bidirectional,
                Some(heuristic),
                SearchOutcome::Found(path),
                stats,
                clock,
            ));
        }
        let geometry = self.lattice.geometry();
        let catalog = self.moves.catalog();
        let toward_goal = build_heuristic(heuristic, &goal, geometry, catalog, &self.config.cache);
        let toward_start = build_heuristic(heuristic, &start, geometry, catalog, &self.config.cache);
        let mut forward = Frontier::new(start, toward_goal);
        let mut backward = Frontier::new(goal, toward_start);

        let outcome = 'search: loop {
            let from_start = forward.open_len() <= backward.open_len();
            let (this, other) = if from_start {
                (&mut forward, &backward)
            } else {
                (&mut backward, &forward)
            };
            let Some(node) = this.pop() else {
                break SearchOutcome::Unreachable;
            };
            if self.over_budget(&stats, clock) {
                break SearchOutcome::BudgetExceeded;
            }
            this.close(node);
            stats.record_expansion(this.g(node) as usize, clock.elapsed());
            let state = this.state(node).clone();
            let next_states = successors(
                &mut self.grid,
                &self.moves,
                self.lattice.geometry(),
                &state,
                self.config.expansion_threads,
            );
            for next in next_states {
                stats.generated += 1;
                if let Some(meet) = other.index_of(&next) {
                    let mut here = this.chain(node);
                    let mut there = other.chain(meet);
                    there.reverse();
                    here.extend(there);
                    if !from_start {
                        here.reverse();
                    }
                    break 'search SearchOutcome::Found(SearchPath::new(here));
                }
                this.relax(node, next);
            }
            stats.peak_open = stats.peak_open.max(forward.open_len() + backward.open_len());
        };
        Ok(self.finish(
            SearchMethod::Bidirectional,
            Some(heuristic),
            outcome,
            stats,
            clock,
        ))
    }

    /// Random walk of up to `steps` legal moves from `start`.
    ///
    /// Deterministic for a given `seed`. Stops early if a state has no
    /// successors. Used to synthesize reachable goals.
    pub fn generate_random_final(
        &mut self,
        start: &Configuration,
        steps: usize,
        seed: u64,
    ) -> Result<Configuration, SearchError> {
        let mut current = self.prepare(start)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        for _ in 0..steps {
            let next = self.successors(&current);
            if next.is_empty() {
                debug!("[Search] random walk stuck; returning current state");
                break;
            }
            current = next[rng.random_range(0..next.len())].clone();
        }
        Ok(current)
    }
}

fn bfs_chain(parents: &IndexMap<Configuration, Option<usize>>, node: usize) -> Vec<Configuration> {
    let mut out = Vec::new();
    let mut cur = Some(node);
    while let Some(i) = cur {
        let (state, parent) = parents
            .get_index(i)
            .expect("parent indices come from the same map");
        out.push(state.clone());
        cur = *parent;
    }
    out.reverse();
    out
}
