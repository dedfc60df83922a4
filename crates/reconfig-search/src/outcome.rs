//! Search results and statistics.

use crate::config::{HeuristicKind, SearchMethod};
use reconfig_lattice::Configuration;
use std::time::Duration;

/// Counters collected during one search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Configurations whose successors were enumerated.
    pub expanded: u64,
    /// Successor configurations produced.
    pub generated: u64,
    /// Largest open-set size observed.
    pub peak_open: usize,
    /// Wall-clock time spent searching.
    pub duration: Duration,
    /// Expansions grouped by depth, indexed by depth.
    pub depths: Vec<DepthStats>,
}

impl SearchStats {
    /// Count one expansion of a state `depth` moves from its root.
    pub(crate) fn record_expansion(&mut self, depth: usize, elapsed: Duration) {
        self.expanded += 1;
        while self.depths.len() <= depth {
            self.depths.push(DepthStats {
                depth: self.depths.len(),
                expanded: 0,
                first_expanded_at: elapsed,
            });
        }
        self.depths[depth].expanded += 1;
    }

    /// Deepest level expanded, if any expansion happened.
    pub fn max_depth(&self) -> Option<usize> {
        self.depths.len().checked_sub(1)
    }
}

/// Expansion counters for one search depth.
///
/// Depth is the move count from the side's root: the start for A* and
/// BFS, and the start or goal for the two halves of bidirectional search.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthStats {
    /// Moves from the root.
    pub depth: usize,
    /// States expanded at this depth.
    pub expanded: u64,
    /// Time since the search began when this depth was first expanded.
    pub first_expanded_at: Duration,
}

/// A sequence of configurations, each one move from the next.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchPath {
    states: Vec<Configuration>,
}

impl SearchPath {
    /// Wrap a non-empty state sequence.
    pub(crate) fn new(states: Vec<Configuration>) -> Self {
        debug_assert!(!states.is_empty());
        Self { states }
    }

    /// Every state, start first.
    pub fn states(&self) -> &[Configuration] {
        &self.states
    }

    /// Number of moves (one less than the number of states).
    pub fn move_count(&self) -> usize {
        self.states.len().saturating_sub(1)
    }

    /// The first state.
    pub fn start(&self) -> &Configuration {
        &self.states[0]
    }

    /// The last state.
    pub fn end(&self) -> &Configuration {
        &self.states[self.states.len() - 1]
    }

    /// Consume into the state sequence.
    pub fn into_states(self) -> Vec<Configuration> {
        self.states
    }
}

/// How a search ended. None of these is an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A path from start to goal.
    Found(SearchPath),
    /// The reachable state space was exhausted without meeting the goal.
    Unreachable,
    /// The expansion or time budget ran out first. Retry with a larger one.
    BudgetExceeded,
}

impl SearchOutcome {
    /// The path, if one was found.
    pub fn path(&self) -> Option<&SearchPath> {
        match self {
            Self::Found(p) => Some(p),
            _ => None,
        }
    }

    /// Whether a path was found.
    pub fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }
}

/// Outcome plus statistics for one search.
#[derive(Clone, Debug)]
pub struct SearchReport {
    /// Loop that ran.
    pub method: SearchMethod,
    /// Heuristic used, `None` for BFS.
    pub heuristic: Option<HeuristicKind>,
    /// How the search ended.
    pub outcome: SearchOutcome,
    /// Counters.
    pub stats: SearchStats,
}
