//! `reconfig` command-line tool.
//!
//! Loads an initial scenario and a goal, searches for a move sequence, and
//! writes it as a `.scen` file. With `-a` it also writes search statistics
//! as JSON, whatever the outcome.
//!
//! ```bash
//! reconfig -I scen/tower_initial.json -F scen/tower_final.json
//! reconfig -I scen/tower_initial.json -F scen/tower_final.json -a tower_analysis.json
//! reconfig -I scen/tower_initial.json --random-final 20 -s bfs
//! ```
//!
//! Exit status: 0 when a path was found and exported, 1 on any error,
//! 2 when the goal is unreachable, 3 when the search budget ran out.

use clap::{Parser, ValueEnum};
use log::{debug, error, info, warn};
use reconfig::prelude::*;
use reconfig::scenario::{analysis_to_file, default_export_path, export_to_file, load_moves_dir};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

/// Plan a reconfiguration between two module arrangements.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Initial-state scenario JSON.
    #[arg(short = 'I', long)]
    initial_file: PathBuf,

    /// Goal-state JSON.
    #[arg(short = 'F', long, required_unless_present = "random_final")]
    final_file: Option<PathBuf>,

    /// Output `.scen` file. Defaults to the initial file's name with
    /// `_initial` removed and a `.scen` extension.
    #[arg(short, long)]
    export_file: Option<PathBuf>,

    /// Write search statistics as JSON to this file.
    #[arg(short, long)]
    analysis_file: Option<PathBuf>,

    /// Search method: `A*`, `BFS`, or `bidirectional`.
    #[arg(short, long, default_value = "A*")]
    search_method: SearchMethod,

    /// Heuristic for A* and bidirectional search: `MRSH-1`, `symdiff`,
    /// `manhattan`, `chebyshev`, or `nearest chebyshev`.
    #[arg(short = 'H', long, default_value = "MRSH-1")]
    heuristic: HeuristicKind,

    /// Treat all modules as interchangeable.
    #[arg(short, long)]
    ignore_colors: bool,

    /// Directory of additional JSON move definitions.
    #[arg(short, long)]
    moves_dir: Option<PathBuf>,

    /// Override the scenario's adjacency offsets.
    #[arg(long, value_enum)]
    adjacency: Option<AdjacencyArg>,

    /// Allow moves that disconnect the modules.
    #[arg(long)]
    allow_disconnect: bool,

    /// Give up after expanding this many configurations.
    #[arg(long)]
    max_expansions: Option<u64>,

    /// Give up after this many seconds.
    #[arg(long)]
    time_limit: Option<f64>,

    /// Threads used to enumerate successors.
    #[arg(long, default_value_t = 1)]
    threads: usize,

    /// Batch independent consecutive moves into one checkpoint on export.
    #[arg(long)]
    parallel_export: bool,

    /// Synthesize the goal with a random walk of this many moves.
    #[arg(long, conflicts_with = "final_file")]
    random_final: Option<usize>,

    /// Seed for `--random-final`.
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum AdjacencyArg {
    /// Face-sharing cubes.
    Cube,
    /// Face-sharing rhombic dodecahedra.
    Rd,
}

impl From<AdjacencyArg> for AdjacencyMode {
    fn from(arg: AdjacencyArg) -> Self {
        match arg {
            AdjacencyArg::Cube => AdjacencyMode::Cube,
            AdjacencyArg::Rd => AdjacencyMode::RhombicDodecahedron,
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    match run(&args) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args) -> Result<ExitCode, Box<dyn Error>> {
    let registry = PropertyRegistry::with_builtins();
    let load = LoadOptions {
        ignore_properties: args.ignore_colors,
        adjacency_override: args.adjacency.map(AdjacencyMode::from),
    };
    let scenario = Scenario::load(&args.initial_file, &registry, &load)?;
    let lattice = &scenario.lattice;
    debug!("initial state:\n{lattice}");

    let order = lattice.order();
    let mut templates = builtin_moves(order)?;
    if let Some(dir) = &args.moves_dir {
        templates.extend(load_moves_dir(dir, order)?);
    }
    let catalog = MoveCatalog::build(order, &templates)?;
    info!("{} moves in catalog", catalog.len());

    let mut config = SearchConfig {
        require_connectivity: !args.allow_disconnect,
        ignore_properties: args.ignore_colors,
        expansion_threads: args.threads,
        ..Default::default()
    };
    config.budget.max_expansions = args.max_expansions;
    config.budget.max_duration = args
        .time_limit
        .map(Duration::try_from_secs_f64)
        .transpose()?;
    let mut space = ConfigurationSpace::new(lattice, catalog, config)?;

    let goal = match (args.random_final, &args.final_file) {
        (Some(steps), _) => {
            let start = space.start();
            info!("generating goal: {steps}-move random walk, seed {}", args.seed);
            space.generate_random_final(&start, steps, args.seed)?
        }
        (None, Some(file)) => scenario.load_goal(file, &registry)?,
        (None, None) => return Err("either --final-file or --random-final is required".into()),
    };

    info!(
        "searching with {}{}",
        args.search_method,
        match args.search_method {
            SearchMethod::Bfs => String::new(),
            _ => format!(", heuristic {}", args.heuristic),
        }
    );
    let report = space.search(args.search_method, args.heuristic, &goal)?;
    let stats = &report.stats;
    info!(
        "search finished in {:?}: {} expanded, {} generated, peak open {}",
        stats.duration, stats.expanded, stats.generated, stats.peak_open
    );
    if let Some(file) = &args.analysis_file {
        analysis_to_file(file, &report)?;
    }

    let path = match &report.outcome {
        SearchOutcome::Found(path) => path,
        SearchOutcome::Unreachable => {
            warn!("goal is unreachable from the initial state");
            return Ok(ExitCode::from(2));
        }
        SearchOutcome::BudgetExceeded => {
            warn!("search budget exhausted before reaching the goal");
            return Ok(ExitCode::from(3));
        }
    };
    info!("path found: {} moves", path.move_count());

    let export_file = args
        .export_file
        .clone()
        .unwrap_or_else(|| default_export_path(&args.initial_file));
    let options = ExportOptions {
        ignore_properties: !space.matches_properties(),
        parallel: args.parallel_export,
    };
    let checkpoints = export_to_file(
        &export_file,
        &scenario.info,
        lattice,
        space.moves(),
        path.states(),
        options,
    )?;
    info!("exported {checkpoints} checkpoints to {}", export_file.display());
    Ok(ExitCode::SUCCESS)
}
