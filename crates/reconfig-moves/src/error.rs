//! Error types for move definition and lookup.

use reconfig_lattice::LatticeError;
use std::error::Error;
use std::fmt;

/// Errors from building move templates or replaying moves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// No legal move transforms the current state into the requested one.
    ///
    /// During export this means the path is internally inconsistent; it
    /// must not be skipped.
    NoSuchMove {
        /// What was being looked for.
        reason: String,
    },
    /// A move template is malformed.
    InvalidTemplate {
        /// Template name.
        name: String,
        /// What went wrong.
        reason: String,
    },
    /// A template or offset does not fit the lattice order.
    DimensionMismatch {
        /// Lattice order.
        expected: usize,
        /// Order that was supplied.
        got: usize,
    },
    /// The lattice rejected a replayed move.
    Lattice(LatticeError),
}

impl fmt::Display for MoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSuchMove { reason } => write!(f, "no such move: {reason}"),
            Self::InvalidTemplate { name, reason } => {
                write!(f, "invalid move template '{name}': {reason}")
            }
            Self::DimensionMismatch { expected, got } => {
                write!(f, "move of order {got} does not fit a {expected}D lattice")
            }
            Self::Lattice(e) => write!(f, "lattice error: {e}"),
        }
    }
}

impl Error for MoveError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Lattice(e) => Some(e),
            _ => None,
        }
    }
}

impl From<LatticeError> for MoveError {
    fn from(e: LatticeError) -> Self {
        Self::Lattice(e)
    }
}
