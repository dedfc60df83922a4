//! Core types for the reconfiguration planner.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the vocabulary shared by every other crate in the workspace: module
//! identifiers, the [`Coord`] type with its lattice metrics, and the
//! value-typed module properties used for property-aware search.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod coord;
pub mod id;
pub mod property;

pub use coord::{chebyshev, manhattan, offset_between, translate};
pub use id::{Coord, ModuleId};
pub use property::{Color, ModuleProperty, PropertySet};
