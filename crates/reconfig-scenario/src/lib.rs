//! Scenario files for the reconfiguration planner.
//!
//! Reads JSON scenario and goal documents into a populated
//! [`Lattice`](reconfig_lattice::Lattice) and goal
//! [`Configuration`](reconfig_lattice::Configuration), loads JSON move
//! definitions, writes solved paths as `.scen` animation scripts, and
//! writes search statistics as JSON analysis files.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod document;
pub mod error;
pub mod export;
pub mod movedefs;
pub mod properties;
pub mod setup;

pub use analysis::{
    analysis_to_file, default_analysis_path, write_analysis, DepthAnalysis, SearchAnalysis,
};
pub use document::{ModuleDoc, ScenarioDoc, DEFAULT_DESCRIPTION, DEFAULT_MODULE_TYPE};
pub use error::ScenarioError;
pub use export::{export_to_file, write_scen, ExportOptions};
pub use movedefs::{load_move_file, load_moves_dir, parse_move_defs};
pub use properties::{palette, PropertyParser, PropertyRegistry};
pub use setup::{
    build_lattice, default_export_path, goal_configuration, LoadOptions, ScenInfo, Scenario,
};
