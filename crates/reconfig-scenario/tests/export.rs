use reconfig_lattice::{Configuration, Lattice};
use reconfig_scenario::{
    write_analysis, write_scen, ExportOptions, ScenInfo, ScenarioError, SearchAnalysis,
};
use reconfig_search::{
    ConfigurationSpace, HeuristicKind, SearchConfig, SearchMethod, SearchReport,
};
use reconfig_test_utils::fixtures::l_shape;
use reconfig_test_utils::{builtin_catalog, builtin_manager, config, TestLatticeBuilder};

fn info(name: &str) -> ScenInfo {
    ScenInfo {
        name: name.into(),
        description: reconfig_scenario::DEFAULT_DESCRIPTION.into(),
        module_type: reconfig_scenario::DEFAULT_MODULE_TYPE.into(),
    }
}

fn export(lattice: &Lattice, path: &[Configuration], options: ExportOptions) -> (String, usize) {
    let moves = builtin_manager(lattice);
    let mut buf = Vec::new();
    let n = write_scen(&mut buf, &info("L"), lattice, &moves, path, options).unwrap();
    (String::from_utf8(buf).unwrap(), n)
}

/// Three-move solution of the L-shape: slide, pivot down, pivot up.
fn l_shape_path(lattice: &Lattice) -> Vec<Configuration> {
    vec![
        config(lattice, &[&[0, 0], &[1, 0], &[0, 1]]),
        config(lattice, &[&[0, 0], &[1, 0], &[1, 1]]),
        config(lattice, &[&[0, 0], &[1, 0], &[2, 0]]),
        config(lattice, &[&[1, 0], &[2, 0], &[1, 1]]),
    ]
}

#[test]
fn sequential_l_shape() {
    let (lattice, _) = l_shape();
    let path = l_shape_path(&lattice);
    let (text, checkpoints) = export(&lattice, &path, ExportOptions::default());
    assert_eq!(checkpoints, 3);
    let expected = "\
L
Scenario file generated by pathfinder.
CUBE

0, 255, 255, 255, 90
1, 255, 255, 255, 90

0, 0, 0, 0, 0
1, 0, 1, 0, 0
2, 0, 0, 1, 0

*2, 0, 1, 0, 0

*2, 5, 1, -1, 0

*0, 1, 1, 1, 0

";
    assert_eq!(text, expected);
}

#[test]
fn parallel_batches_independent_slides() {
    let lattice = TestLatticeBuilder::new(2, 6)
        .statics(&[&[0, 0], &[1, 0], &[2, 0], &[3, 0], &[4, 0], &[5, 0]])
        .movable(&[&[0, 1], &[4, 1]])
        .build();
    let path = vec![
        config(&lattice, &[&[0, 1], &[4, 1]]),
        config(&lattice, &[&[1, 1], &[4, 1]]),
        config(&lattice, &[&[1, 1], &[5, 1]]),
    ];

    let (seq, n) = export(&lattice, &path, ExportOptions::default());
    assert_eq!(n, 2);
    assert!(seq.ends_with("*0, 0, 1, 0, 0\n\n*1, 0, 1, 0, 0\n\n"));

    let options = ExportOptions {
        parallel: true,
        ..Default::default()
    };
    let (par, n) = export(&lattice, &path, options);
    assert_eq!(n, 1);
    assert!(par.ends_with("\n\n*0, 0, 1, 0, 0\n 1, 0, 1, 0, 0\n\n"));
    // Statics follow the movable modules with flag 1.
    assert!(par.contains("\n2, 1, 0, 0, 0\n"));
    assert!(par.contains("\n7, 1, 5, 0, 0\n"));
}

#[test]
fn parallel_falls_back_to_single_edges() {
    let (lattice, _) = l_shape();
    let path = l_shape_path(&lattice);
    let options = ExportOptions {
        parallel: true,
        ..Default::default()
    };
    let (par, n) = export(&lattice, &path, options);
    let (seq, _) = export(&lattice, &path, ExportOptions::default());
    assert_eq!(n, 3);
    assert_eq!(par, seq);
}

#[test]
fn colored_palette_and_module_colors() {
    let lattice = TestLatticeBuilder::new(2, 3)
        .colored(&[0, 0], 0xff0000)
        .colored(&[1, 0], 0x0000ff)
        .build();
    let start = lattice.snapshot_as_configuration(false);
    let (text, n) = export(&lattice, &[start.clone()], ExportOptions::default());
    assert_eq!(n, 0);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(
        &lines[4..],
        [
            "16711680, 255, 0, 0, 90",
            "255, 0, 0, 255, 90",
            "",
            "0, 16711680, 0, 0, 0",
            "1, 255, 1, 0, 0",
            "",
        ]
    );

    let options = ExportOptions {
        ignore_properties: true,
        ..Default::default()
    };
    let (text, _) = export(&lattice, &[start], options);
    assert!(text.contains("\n0, 255, 255, 255, 90\n1, 255, 255, 255, 90\n"));
    assert!(text.contains("\n0, 0, 0, 0, 0\n1, 0, 1, 0, 0\n"));
}

#[test]
fn bad_paths_are_errors() {
    let (lattice, _) = l_shape();
    let moves = builtin_manager(&lattice);
    let mut sink = Vec::new();
    let err = write_scen(&mut sink, &info("x"), &lattice, &moves, &[], ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, ScenarioError::EmptyPath));

    let jump = vec![
        config(&lattice, &[&[0, 0], &[1, 0], &[0, 1]]),
        config(&lattice, &[&[1, 0], &[2, 0], &[1, 1]]),
    ];
    let err = write_scen(&mut sink, &info("x"), &lattice, &moves, &jump, ExportOptions::default())
        .unwrap_err();
    assert!(matches!(err, ScenarioError::Move(_)));
}

// ── Analysis ────────────────────────────────────────────────────

fn l_shape_report(method: SearchMethod, cfg: SearchConfig) -> SearchReport {
    let (lattice, goal) = l_shape();
    let refs: Vec<&[i32]> = goal.iter().map(|c| &c[..]).collect();
    let goal = config(&lattice, &refs);
    let mut space = ConfigurationSpace::new(&lattice, builtin_catalog(2), cfg).unwrap();
    space.search(method, HeuristicKind::Mrsh1, &goal).unwrap()
}

#[test]
fn analysis_of_found_bfs_search() {
    let report = l_shape_report(SearchMethod::Bfs, SearchConfig::default());
    let mut buf = Vec::new();
    write_analysis(&mut buf, &report).unwrap();

    let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
    assert_eq!(value["method"], "BFS");
    assert_eq!(value["outcome"], "found");
    assert_eq!(value["path_moves"], 3);
    assert!(value.get("heuristic").is_none());

    let analysis: SearchAnalysis = serde_json::from_slice(&buf).unwrap();
    assert_eq!(analysis.expanded, report.stats.expanded);
    assert_eq!(analysis.generated, report.stats.generated);
    assert_eq!(analysis.depths.len(), 3, "goal is generated from depth 2");
    assert_eq!(analysis.depths[0].expanded, 1);
    assert_eq!(
        analysis.depths.iter().map(|d| d.expanded).sum::<u64>(),
        analysis.expanded
    );
    for (i, d) in analysis.depths.iter().enumerate() {
        assert_eq!(d.depth, i);
    }
    assert!(analysis
        .depths
        .windows(2)
        .all(|w| w[0].first_expanded_ms <= w[1].first_expanded_ms));
}

#[test]
fn analysis_of_exhausted_budget() {
    let mut cfg = SearchConfig::default();
    cfg.budget.max_expansions = Some(1);
    let analysis = SearchAnalysis::from_report(&l_shape_report(SearchMethod::AStar, cfg));
    assert_eq!(analysis.outcome, "budget_exceeded");
    assert_eq!(analysis.heuristic.as_deref(), Some("MRSH-1"));
    assert_eq!(analysis.path_moves, None);
    assert_eq!(analysis.expanded, 1);
    assert_eq!(analysis.depths.len(), 1);
}
