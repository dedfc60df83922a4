//! Setup-level search errors.
//!
//! Failing to find a path is not an error; see
//! [`SearchOutcome`](crate::SearchOutcome).

use reconfig_lattice::LatticeError;
use reconfig_moves::MoveError;
use std::error::Error;
use std::fmt;

/// Problems detected before a search starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// Start and goal hold different numbers of movable modules, or
    /// either differs from the lattice's movable count.
    ModuleCountMismatch {
        /// Movable modules in the lattice.
        expected: usize,
        /// Modules in the offending configuration.
        got: usize,
    },
    /// Start and goal carry incompatible properties.
    PropertyMismatch {
        /// What went wrong.
        reason: String,
    },
    /// A [`SearchConfig`](crate::SearchConfig) field is out of range.
    InvalidConfig {
        /// What went wrong.
        reason: String,
    },
    /// The lattice rejected a configuration.
    Lattice(LatticeError),
    /// Move setup failed.
    Move(MoveError),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModuleCountMismatch { expected, got } => write!(
                f,
                "module count mismatch: lattice has {expected} movable modules, configuration has {got}"
            ),
            Self::PropertyMismatch { reason } => write!(f, "property mismatch: {reason}"),
            Self::InvalidConfig { reason } => write!(f, "invalid search config: {reason}"),
            Self::Lattice(e) => write!(f, "lattice error: {e}"),
            Self::Move(e) => write!(f, "move error: {e}"),
        }
    }
}

impl Error for SearchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lattice(e) => Some(e),
            Self::Move(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LatticeError> for SearchError {
    fn from(e: LatticeError) -> Self {
        Self::Lattice(e)
    }
}

impl From<MoveError> for SearchError {
    fn from(e: MoveError) -> Self {
        Self::Move(e)
    }
}
