//! Reconfiguration search over lattice configurations.
//!
//! [`ConfigurationSpace`] drives A*, breadth-first, and bidirectional
//! search between two [`Configuration`](reconfig_lattice::Configuration)s
//! of one populated lattice. Successors are produced functionally from a
//! scratch occupancy grid, so the lattice is never mutated mid-search.
//!
//! Not finding a path is an ordinary [`SearchOutcome`], never an error:
//! [`SearchError`] is reserved for inputs rejected before the search
//! starts (mismatched module counts, incompatible properties, bad config).
//!
//! # Heuristics
//!
//! The symmetric-difference, center-of-mass and nearest-Chebyshev
//! estimates are admissible for any catalog built by
//! [`MoveCatalog::build`](reconfig_moves::MoveCatalog::build). MRSH-1 is
//! the tightest; it is admissible for the built-in slide and pivot moves,
//! but it searches walks only inside a box around each offset, so custom
//! templates whose shortest walks leave that box may be overestimated.
//! MRSH-1 memoizes walk lengths in a [`HeuristicCache`] whose limits
//! affect speed and memory only, never the returned value.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cache;
pub mod config;
pub mod error;
mod expand;
mod frontier;
pub mod heuristic;
pub mod outcome;
pub mod space;

pub use cache::HeuristicCache;
pub use config::{CacheLimits, HeuristicKind, SearchBudget, SearchConfig, SearchMethod};
pub use error::SearchError;
pub use heuristic::{build_heuristic, Heuristic};
pub use outcome::{DepthStats, SearchOutcome, SearchPath, SearchReport, SearchStats};
pub use space::ConfigurationSpace;
