//! `.scen` export.
//!
//! Layout, each section followed by a blank line:
//!
//! ```text
//! <name>
//! <description>
//! <module type>
//!
//! <color>, <r>, <g>, <b>, 90          palette
//!
//! <id>, <color|static>, <x>, <y>, <z>  one line per module, initial state
//!
//! *<id>, <anim code>, <dx>, <dy>, <dz> move lines
//! ```
//!
//! Module ids are zero-padded to the width of the module count. `*` marks
//! the first line of each checkpoint. Sequential export writes one
//! checkpoint per path edge; parallel export groups consecutive edges
//! into one checkpoint when their moves have disjoint footprints, and
//! interleaves their animation steps round-robin by module id.

use crate::error::ScenarioError;
use crate::properties::palette;
use crate::setup::ScenInfo;
use log::{debug, info};
use reconfig_core::{Color, ModuleId};
use reconfig_lattice::{Configuration, Lattice};
use reconfig_moves::{AnimStep, Move, MoveManager};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Export switches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExportOptions {
    /// Write the placeholder palette and static flags instead of colors.
    pub ignore_properties: bool,
    /// Batch independent consecutive moves into one checkpoint.
    pub parallel: bool,
}

/// Write `path` as a `.scen` scenario to `out`.
///
/// `lattice` supplies module ids, statics, and properties; it is not
/// modified. Every consecutive pair of states in `path` must differ by
/// one legal move of `moves`. Returns the number of checkpoints written.
pub fn write_scen<W: Write>(
    out: &mut W,
    info: &ScenInfo,
    lattice: &Lattice,
    moves: &MoveManager,
    path: &[Configuration],
    options: ExportOptions,
) -> Result<usize, ScenarioError> {
    let (first, rest) = path.split_first().ok_or(ScenarioError::EmptyPath)?;
    let mut lattice = lattice.clone();
    lattice.reset_to(first)?;
    let plain = options.ignore_properties || !lattice.has_properties();
    let width = lattice.modules().len().to_string().len();

    writeln!(out, "{}", info.name)?;
    writeln!(out, "{}", info.description)?;
    writeln!(out, "{}", info.module_type)?;
    writeln!(out)?;

    if plain {
        writeln!(out, "0, 255, 255, 255, 90")?;
        writeln!(out, "1, 255, 255, 255, 90")?;
    } else {
        for color in palette(lattice.modules()) {
            writeln!(
                out,
                "{}, {}, {}, {}, 90",
                color.as_int(),
                color.r,
                color.g,
                color.b
            )?;
        }
    }
    writeln!(out)?;

    for m in lattice.modules() {
        let static_flag = u32::from(m.is_static);
        let tag = if plain {
            static_flag
        } else {
            m.properties.color().map_or(static_flag, Color::as_int)
        };
        writeln!(out, "{}", entry_line("", m.id, width, tag, &m.coords))?;
    }
    writeln!(out)?;

    let checkpoints = if options.parallel {
        write_parallel(out, &mut lattice, moves, rest, width)?
    } else {
        write_sequential(out, &mut lattice, moves, rest, width)?
    };
    debug!(
        "[Scenario] exported {} path edges as {checkpoints} checkpoints",
        rest.len()
    );
    Ok(checkpoints)
}

/// [`write_scen`] into a newly created file at `file`.
pub fn export_to_file(
    file: &Path,
    info: &ScenInfo,
    lattice: &Lattice,
    moves: &MoveManager,
    path: &[Configuration],
    options: ExportOptions,
) -> Result<usize, ScenarioError> {
    let handle = File::create(file).map_err(|e| ScenarioError::io(file, e))?;
    let mut out = BufWriter::new(handle);
    let checkpoints = write_scen(&mut out, info, lattice, moves, path, options)?;
    out.flush().map_err(|e| ScenarioError::io(file, e))?;
    info!("[Scenario] wrote {}", file.display());
    Ok(checkpoints)
}

fn write_sequential<W: Write>(
    out: &mut W,
    lattice: &mut Lattice,
    moves: &MoveManager,
    rest: &[Configuration],
    width: usize,
) -> Result<usize, ScenarioError> {
    for next in rest {
        let (id, mv) = moves.find_move_to_state(lattice, next)?;
        for (i, step) in mv.anim().iter().enumerate() {
            writeln!(out, "{}", anim_line(i == 0, id, width, step))?;
            writeln!(out)?;
        }
        moves.apply_in_place(lattice, id, mv)?;
    }
    Ok(rest.len())
}

fn write_parallel<W: Write>(
    out: &mut W,
    lattice: &mut Lattice,
    moves: &MoveManager,
    rest: &[Configuration],
    width: usize,
) -> Result<usize, ScenarioError> {
    let mut checkpoints = 0;
    let mut i = 0;
    while i < rest.len() {
        let mut batch = moves.find_parallel_moves_to_state(lattice, &rest[i])?;
        let mut end = i + 1;
        while let Some(next) = rest.get(end) {
            match moves.find_parallel_moves_to_state(lattice, next) {
                Ok(wider) => {
                    batch = wider;
                    end += 1;
                }
                Err(_) => break,
            }
        }
        write_batch(out, &batch, width)?;
        for (id, mv) in &batch {
            moves.apply_in_place(lattice, *id, mv)?;
        }
        checkpoints += 1;
        i = end;
    }
    Ok(checkpoints)
}

/// Animation steps of one checkpoint, one round per blank-line block.
fn write_batch<W: Write>(
    out: &mut W,
    batch: &[(ModuleId, &Move)],
    width: usize,
) -> Result<(), ScenarioError> {
    let mut queues: Vec<_> = batch
        .iter()
        .map(|(id, mv)| (*id, mv.anim().iter()))
        .collect();
    let mut first = true;
    loop {
        let mut wrote = false;
        for (id, steps) in &mut queues {
            if let Some(step) = steps.next() {
                writeln!(out, "{}", anim_line(first, *id, width, step))?;
                first = false;
                wrote = true;
            }
        }
        if !wrote {
            return Ok(());
        }
        writeln!(out)?;
    }
}

fn anim_line(checkpoint: bool, id: ModuleId, width: usize, step: &AnimStep) -> String {
    let prefix = if checkpoint { "*" } else { " " };
    entry_line(prefix, id, width, step.code(), &step.offset)
}

fn entry_line(prefix: &str, id: ModuleId, width: usize, tag: u32, v: &[i32]) -> String {
    let at = |axis: usize| v.get(axis).copied().unwrap_or(0);
    format!(
        "{prefix}{:0width$}, {tag}, {}, {}, {}",
        id.0,
        at(0),
        at(1),
        at(2)
    )
}
