//! Search configuration: method, heuristic, budget, and cache limits.

use crate::error::SearchError;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

// ── SearchMethod ───────────────────────────────────────────────────

/// Which search loop to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SearchMethod {
    /// Best-first search on `g + h`.
    #[default]
    AStar,
    /// Breadth-first search; ignores the heuristic.
    Bfs,
    /// A* from both ends, meeting in the middle. Not guaranteed optimal.
    Bidirectional,
}

impl FromStr for SearchMethod {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "a*" | "astar" => Ok(Self::AStar),
            "bfs" | "breadthfirst" => Ok(Self::Bfs),
            "bdbfs" | "bidirectional" | "bidir" | "bda*" | "bdastar" => Ok(Self::Bidirectional),
            _ => Err(SearchError::InvalidConfig {
                reason: format!("unknown search method '{s}'"),
            }),
        }
    }
}

impl fmt::Display for SearchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::AStar => "A*",
            Self::Bfs => "BFS",
            Self::Bidirectional => "bidirectional",
        })
    }
}

// ── HeuristicKind ──────────────────────────────────────────────────

/// Admissible heuristic used by A* and bidirectional search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum HeuristicKind {
    /// Per-module shortest displacement walk to the nearest matching goal
    /// cell, memoized in a [`HeuristicCache`](crate::HeuristicCache).
    #[default]
    Mrsh1,
    /// Number of modules not on a matching goal cell.
    SymmetricDifference,
    /// Manhattan distance between centers of mass.
    CenterOfMassManhattan,
    /// Chebyshev distance between centers of mass.
    CenterOfMassChebyshev,
    /// Per-module Chebyshev distance to the nearest matching goal cell.
    NearestChebyshev,
}

impl HeuristicKind {
    /// Every heuristic, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Mrsh1,
        Self::SymmetricDifference,
        Self::CenterOfMassManhattan,
        Self::CenterOfMassChebyshev,
        Self::NearestChebyshev,
    ];
}

impl FromStr for HeuristicKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize(s).as_str() {
            "mrsh1" | "mrsh" => Ok(Self::Mrsh1),
            "symdiff" | "symmetricdifference" | "setdifference" => Ok(Self::SymmetricDifference),
            "manhattan" | "commanhattan" | "centerofmassmanhattan" => {
                Ok(Self::CenterOfMassManhattan)
            }
            "chebyshev" | "comchebyshev" | "centerofmasschebyshev" => {
                Ok(Self::CenterOfMassChebyshev)
            }
            "nearestchebyshev" | "nearest" => Ok(Self::NearestChebyshev),
            _ => Err(SearchError::InvalidConfig {
                reason: format!("unknown heuristic '{s}'"),
            }),
        }
    }
}

impl fmt::Display for HeuristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mrsh1 => "MRSH-1",
            Self::SymmetricDifference => "symmetric difference",
            Self::CenterOfMassManhattan => "center of mass (manhattan)",
            Self::CenterOfMassChebyshev => "center of mass (chebyshev)",
            Self::NearestChebyshev => "nearest chebyshev",
        })
    }
}

/// Lowercase and drop separators so `MRSH-1`, `mrsh_1` and `Mrsh 1` agree.
fn normalize(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, '-' | '_' | ' ' | '(' | ')'))
        .flat_map(char::to_lowercase)
        .collect()
}

// ── SearchBudget ───────────────────────────────────────────────────

/// Early-abort limits. Exceeding either yields
/// [`SearchOutcome::BudgetExceeded`](crate::SearchOutcome::BudgetExceeded).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchBudget {
    /// Maximum number of expanded configurations. `None` = unlimited.
    pub max_expansions: Option<u64>,
    /// Maximum wall-clock time. `None` = unlimited.
    pub max_duration: Option<Duration>,
}

// ── CacheLimits ────────────────────────────────────────────────────

/// Storage and reuse limits for the MRSH-1 [`HeuristicCache`](crate::HeuristicCache).
///
/// Limits decide only what is stored or reused, never what is returned, so the
/// heuristic value is identical with any setting.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheLimits {
    /// Whether to memoize at all. Default: true.
    pub enabled: bool,
    /// Do not store offsets with L1 length above this. Default: none.
    pub l1_limit: Option<u32>,
    /// Do not store offsets with L∞ length above this. Default: none.
    pub linf_limit: Option<u32>,
    /// Maximum stored entries one module's evaluation may reuse. Default: none.
    pub help_limit: Option<usize>,
}

impl Default for CacheLimits {
    fn default() -> Self {
        Self {
            enabled: true,
            l1_limit: None,
            linf_limit: None,
            help_limit: None,
        }
    }
}

// ── SearchConfig ───────────────────────────────────────────────────

/// Everything that tunes one search run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchConfig {
    /// Forbid moves that disconnect the module graph. Default: true.
    pub require_connectivity: bool,
    /// Treat all modules as interchangeable. Default: false.
    pub ignore_properties: bool,
    /// Early-abort limits.
    pub budget: SearchBudget,
    /// Heuristic cache limits.
    pub cache: CacheLimits,
    /// Threads used to enumerate successors. Default: 1.
    pub expansion_threads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            require_connectivity: true,
            ignore_properties: false,
            budget: SearchBudget::default(),
            cache: CacheLimits::default(),
            expansion_threads: 1,
        }
    }
}

impl SearchConfig {
    /// Check field ranges.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.expansion_threads == 0 || self.expansion_threads > 256 {
            return Err(SearchError::InvalidConfig {
                reason: format!(
                    "expansion_threads must be in [1, 256], got {}",
                    self.expansion_threads
                ),
            });
        }
        if self.budget.max_expansions == Some(0) {
            return Err(SearchError::InvalidConfig {
                reason: "max_expansions must be positive".into(),
            });
        }
        if self.cache.help_limit == Some(0) {
            return Err(SearchError::InvalidConfig {
                reason: "help_limit must be positive".into(),
            });
        }
        Ok(())
    }
}
