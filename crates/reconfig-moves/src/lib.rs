//! Move templates, the symmetry-expanded move catalog, and move legality.
//!
//! A [`Move`] is a local occupancy pattern around a moving module plus its
//! displacement and animation. Templates are written once in a canonical
//! orientation ([`builtin_moves`] or character-grid definitions via
//! [`Move::from_grid`]) and expanded over every lattice isometry into a
//! [`MoveCatalog`]. The [`MoveManager`] evaluates catalog entries against
//! any [`Occupancy`](reconfig_lattice::Occupancy) view.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod isometry;
pub mod manager;
pub mod template;

pub use catalog::MoveCatalog;
pub use error::MoveError;
pub use isometry::Isometry;
pub use manager::{LegalMoves, MoveManager};
pub use template::{builtin_moves, pivot, slide, AnimKind, AnimStep, Move, Requirement};
