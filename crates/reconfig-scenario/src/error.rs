//! Error types for scenario loading and export.

use reconfig_lattice::LatticeError;
use reconfig_moves::MoveError;
use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors from reading scenario or move files and writing `.scen` output.
#[derive(Debug)]
pub enum ScenarioError {
    /// Reading or writing a file failed.
    Io {
        /// File involved, when known.
        path: Option<PathBuf>,
        /// Underlying error.
        source: io::Error,
    },
    /// A document is not valid JSON or does not match the expected shape.
    Json {
        /// File involved, when known.
        path: Option<PathBuf>,
        /// Underlying error.
        source: serde_json::Error,
    },
    /// The scenario describes an impossible lattice.
    Lattice(LatticeError),
    /// A move definition is invalid, or a path step has no matching move.
    Move(MoveError),
    /// A module names a property kind that is not registered.
    UnknownProperty {
        /// The unrecognized property key.
        key: String,
    },
    /// A property value could not be interpreted.
    InvalidProperty {
        /// Property key.
        key: String,
        /// What was wrong with the value.
        reason: String,
    },
    /// A goal does not place the same number of movable modules as the
    /// lattice holds.
    ModuleCountMismatch {
        /// Movable modules in the lattice.
        expected: usize,
        /// Movable modules in the goal.
        got: usize,
    },
    /// Export was asked to write an empty path.
    EmptyPath,
}

impl ScenarioError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: Some(path.into()),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Json {
            path: Some(path.into()),
            source,
        }
    }
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path: Some(p), source } => write!(f, "{}: {source}", p.display()),
            Self::Io { path: None, source } => write!(f, "I/O error: {source}"),
            Self::Json { path: Some(p), source } => {
                write!(f, "{}: invalid JSON: {source}", p.display())
            }
            Self::Json { path: None, source } => write!(f, "invalid JSON: {source}"),
            Self::Lattice(e) => write!(f, "lattice setup: {e}"),
            Self::Move(e) => write!(f, "moves: {e}"),
            Self::UnknownProperty { key } => write!(f, "unknown module property '{key}'"),
            Self::InvalidProperty { key, reason } => {
                write!(f, "invalid value for property '{key}': {reason}")
            }
            Self::ModuleCountMismatch { expected, got } => write!(
                f,
                "goal places {got} movable modules, lattice has {expected}"
            ),
            Self::EmptyPath => write!(f, "cannot export an empty path"),
        }
    }
}

impl std::error::Error for ScenarioError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            Self::Lattice(e) => Some(e),
            Self::Move(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for ScenarioError {
    fn from(source: io::Error) -> Self {
        Self::Io { path: None, source }
    }
}

impl From<serde_json::Error> for ScenarioError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { path: None, source }
    }
}

impl From<LatticeError> for ScenarioError {
    fn from(e: LatticeError) -> Self {
        Self::Lattice(e)
    }
}

impl From<MoveError> for ScenarioError {
    fn from(e: MoveError) -> Self {
        Self::Move(e)
    }
}
