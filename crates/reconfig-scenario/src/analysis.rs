//! Search analysis export.
//!
//! One JSON object per search: method, heuristic, outcome, counters,
//! wall time, and per-depth expansion counts with the time each depth
//! was first reached. Times are in milliseconds.

use crate::error::ScenarioError;
use log::info;
use reconfig_search::{SearchOutcome, SearchReport};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Serializable summary of one [`SearchReport`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchAnalysis {
    /// Search loop that ran.
    pub method: String,
    /// Heuristic name; absent for BFS.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heuristic: Option<String>,
    /// `found`, `unreachable` or `budget_exceeded`.
    pub outcome: String,
    /// Moves in the found path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_moves: Option<usize>,
    /// States expanded.
    pub expanded: u64,
    /// Successors generated.
    pub generated: u64,
    /// Largest open set seen.
    pub peak_open: usize,
    /// Total search time.
    pub duration_ms: f64,
    /// One entry per depth, shallowest first.
    pub depths: Vec<DepthAnalysis>,
}

/// Expansions at one depth.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthAnalysis {
    /// Moves from the root.
    pub depth: usize,
    /// States expanded at this depth.
    pub expanded: u64,
    /// Time from search start to the first expansion at this depth.
    pub first_expanded_ms: f64,
}

impl SearchAnalysis {
    /// Summarize `report`.
    pub fn from_report(report: &SearchReport) -> Self {
        let stats = &report.stats;
        let outcome = match report.outcome {
            SearchOutcome::Found(_) => "found",
            SearchOutcome::Unreachable => "unreachable",
            SearchOutcome::BudgetExceeded => "budget_exceeded",
        };
        Self {
            method: report.method.to_string(),
            heuristic: report.heuristic.map(|h| h.to_string()),
            outcome: outcome.to_owned(),
            path_moves: report.outcome.path().map(|p| p.move_count()),
            expanded: stats.expanded,
            generated: stats.generated,
            peak_open: stats.peak_open,
            duration_ms: stats.duration.as_secs_f64() * 1000.0,
            depths: stats
                .depths
                .iter()
                .map(|d| DepthAnalysis {
                    depth: d.depth,
                    expanded: d.expanded,
                    first_expanded_ms: d.first_expanded_at.as_secs_f64() * 1000.0,
                })
                .collect(),
        }
    }
}

/// Write the analysis of `report` to `out` as pretty-printed JSON.
pub fn write_analysis<W: Write>(out: &mut W, report: &SearchReport) -> Result<(), ScenarioError> {
    serde_json::to_writer_pretty(&mut *out, &SearchAnalysis::from_report(report))?;
    writeln!(out)?;
    Ok(())
}

/// [`write_analysis`] into a newly created file at `file`.
pub fn analysis_to_file(file: &Path, report: &SearchReport) -> Result<(), ScenarioError> {
    let handle = File::create(file).map_err(|e| ScenarioError::io(file, e))?;
    let mut out = BufWriter::new(handle);
    write_analysis(&mut out, report)?;
    out.flush().map_err(|e| ScenarioError::io(file, e))?;
    info!("[Scenario] wrote analysis {}", file.display());
    Ok(())
}

/// `<stem>_analysis.json` next to `initial`, with `_initial` removed from
/// the stem.
pub fn default_analysis_path(initial: &Path) -> PathBuf {
    let stem = initial
        .file_stem()
        .map(|s| s.to_string_lossy().replacen("_initial", "", 1))
        .unwrap_or_default();
    initial.with_file_name(format!("{stem}_analysis.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_path_drops_initial_marker() {
        assert_eq!(
            default_analysis_path(Path::new("runs/bar_initial.json")),
            PathBuf::from("runs/bar_analysis.json")
        );
        assert_eq!(
            default_analysis_path(Path::new("plain.json")),
            PathBuf::from("plain_analysis.json")
        );
    }
}
