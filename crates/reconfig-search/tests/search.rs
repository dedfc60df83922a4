use proptest::prelude::*;
use reconfig_core::{Color, ModuleProperty, PropertySet};
use reconfig_lattice::{Configuration, Lattice, LatticeError, Occupant};
use reconfig_search::{
    build_heuristic, CacheLimits, ConfigurationSpace, Heuristic, HeuristicKind, SearchConfig,
    SearchError, SearchMethod, SearchOutcome, SearchPath,
};
use reconfig_test_utils::fixtures::{bar, l_shape, on_static_floor, slab_3d};
use reconfig_test_utils::{builtin_catalog, builtin_manager, config, TestLatticeBuilder};
use std::time::Duration;

fn space(lattice: &Lattice) -> ConfigurationSpace<'_> {
    space_with(lattice, SearchConfig::default())
}

fn space_with(lattice: &Lattice, cfg: SearchConfig) -> ConfigurationSpace<'_> {
    ConfigurationSpace::new(lattice, builtin_catalog(lattice.order()), cfg).unwrap()
}

fn goal2(lattice: &Lattice, cells: &[[i32; 2]]) -> Configuration {
    let refs: Vec<&[i32]> = cells.iter().map(|c| &c[..]).collect();
    config(lattice, &refs)
}

/// Replays `path` on a copy of `lattice`, one legal move per step.
fn assert_replayable(lattice: &Lattice, path: &SearchPath) {
    let mut l = lattice.clone();
    let m = builtin_manager(&l);
    assert_eq!(&l.snapshot_as_configuration(true), path.start());
    for next in &path.states()[1..] {
        let (id, mv) = m.find_move_to_state(&l, next).unwrap();
        m.apply_in_place(&mut l, id, mv).unwrap();
    }
    assert_eq!(&l.snapshot_as_configuration(true), path.end());
}

fn moves_of(outcome: &SearchOutcome) -> usize {
    outcome.path().expect("path found").move_count()
}

// ── L-shape ─────────────────────────────────────────────────────

#[test]
fn l_shape_a_star_takes_three_moves_with_every_heuristic() {
    let (lattice, goal) = l_shape();
    let goal = goal2(&lattice, &goal);
    for kind in HeuristicKind::ALL {
        let mut s = space(&lattice);
        let report = s.search(SearchMethod::AStar, kind, &goal).unwrap();
        assert_eq!(moves_of(&report.outcome), 3, "{kind}");
        assert_eq!(report.heuristic, Some(kind));
        assert_replayable(&lattice, report.outcome.path().unwrap());
    }
}

#[test]
fn l_shape_bfs_takes_three_moves() {
    let (lattice, goal) = l_shape();
    let goal = goal2(&lattice, &goal);
    let report = space(&lattice)
        .search(SearchMethod::Bfs, HeuristicKind::Mrsh1, &goal)
        .unwrap();
    assert_eq!(moves_of(&report.outcome), 3);
    assert!(report.heuristic.is_none());
    assert_replayable(&lattice, report.outcome.path().unwrap());
}

#[test]
fn l_shape_bidirectional_path_is_valid() {
    let (lattice, goal) = l_shape();
    let goal = goal2(&lattice, &goal);
    let report = space(&lattice)
        .search(SearchMethod::Bidirectional, HeuristicKind::Mrsh1, &goal)
        .unwrap();
    let path = report.outcome.path().unwrap();
    assert!(path.move_count() >= 3);
    assert_eq!(path.end(), &goal);
    assert_replayable(&lattice, path);
}

#[test]
fn parallel_expansion_matches_sequential() {
    let (lattice, goal) = l_shape();
    let goal = goal2(&lattice, &goal);
    let cfg = SearchConfig {
        expansion_threads: 3,
        ..Default::default()
    };
    let mut par = space_with(&lattice, cfg);
    let mut seq = space(&lattice);
    let start = seq.start();
    assert_eq!(par.successors(&start), seq.successors(&start));
    let a = par.search(SearchMethod::AStar, HeuristicKind::Mrsh1, &goal).unwrap();
    let b = seq.search(SearchMethod::AStar, HeuristicKind::Mrsh1, &goal).unwrap();
    assert_eq!(a.outcome, b.outcome);
    assert_eq!(a.stats.expanded, b.stats.expanded);
}

// ── Trivial and failing searches ────────────────────────────────

#[test]
fn start_equal_to_goal_is_a_zero_move_path() {
    let (lattice, _) = l_shape();
    for method in [SearchMethod::AStar, SearchMethod::Bfs, SearchMethod::Bidirectional] {
        let mut s = space(&lattice);
        let goal = s.start();
        let report = s.search(method, HeuristicKind::Mrsh1, &goal).unwrap();
        assert_eq!(moves_of(&report.outcome), 0, "{method}");
        assert_eq!(report.stats.expanded, 0, "{method}");
        assert_eq!(report.stats.generated, 0, "{method}");
    }
}

#[test]
fn lone_module_cannot_move() {
    let lattice = TestLatticeBuilder::new(2, 3).movable(&[&[0, 0]]).build();
    let goal = config(&lattice, &[&[1, 0]]);
    for method in [SearchMethod::AStar, SearchMethod::Bfs, SearchMethod::Bidirectional] {
        let report = space(&lattice)
            .search(method, HeuristicKind::Mrsh1, &goal)
            .unwrap();
        assert_eq!(report.outcome, SearchOutcome::Unreachable, "{method}");
    }
}

#[test]
fn expansion_budget_aborts_distinctly() {
    let (lattice, goal) = l_shape();
    let goal = goal2(&lattice, &goal);
    let mut cfg = SearchConfig::default();
    cfg.budget.max_expansions = Some(1);
    for method in [SearchMethod::AStar, SearchMethod::Bfs, SearchMethod::Bidirectional] {
        let report = space_with(&lattice, cfg.clone())
            .search(method, HeuristicKind::SymmetricDifference, &goal)
            .unwrap();
        assert_eq!(report.outcome, SearchOutcome::BudgetExceeded, "{method}");
        assert_eq!(report.stats.expanded, 1, "{method}");
    }
}

#[test]
fn zero_time_budget_aborts_before_expanding() {
    let (lattice, goal) = l_shape();
    let goal = goal2(&lattice, &goal);
    let mut cfg = SearchConfig::default();
    cfg.budget.max_duration = Some(Duration::ZERO);
    for method in [SearchMethod::AStar, SearchMethod::Bfs, SearchMethod::Bidirectional] {
        let report = space_with(&lattice, cfg.clone())
            .search(method, HeuristicKind::Mrsh1, &goal)
            .unwrap();
        assert_eq!(report.outcome, SearchOutcome::BudgetExceeded, "{method}");
        assert_eq!(report.stats.expanded, 0, "{method}");
    }
}

#[test]
fn module_count_mismatch_is_a_setup_error() {
    let (lattice, _) = l_shape();
    let bigger = config(&lattice, &[&[0, 0], &[1, 0], &[0, 1], &[1, 1]]);
    let err = space(&lattice)
        .search(SearchMethod::AStar, HeuristicKind::Mrsh1, &bigger)
        .unwrap_err();
    assert_eq!(
        err,
        SearchError::ModuleCountMismatch {
            expected: 3,
            got: 4
        }
    );
}

#[test]
fn goal_on_static_module_is_rejected() {
    let (lattice, _) = on_static_floor();
    let goal = config(&lattice, &[&[0, 0], &[3, 1]]);
    let err = space(&lattice)
        .search(SearchMethod::Bfs, HeuristicKind::Mrsh1, &goal)
        .unwrap_err();
    assert!(matches!(
        err,
        SearchError::Lattice(LatticeError::CellOccupied { .. })
    ));
}

#[test]
fn invalid_config_is_rejected() {
    let (lattice, _) = l_shape();
    let cfg = SearchConfig {
        expansion_threads: 0,
        ..Default::default()
    };
    assert!(ConfigurationSpace::new(&lattice, builtin_catalog(2), cfg).is_err());
    assert!(ConfigurationSpace::new(&lattice, builtin_catalog(3), SearchConfig::default()).is_err());
}

// ── Other fixtures ──────────────────────────────────────────────

#[test]
fn static_floor_needs_four_slides() {
    let (lattice, goal) = on_static_floor();
    let goal = goal2(&lattice, &goal);
    let a = space(&lattice)
        .search(SearchMethod::AStar, HeuristicKind::Mrsh1, &goal)
        .unwrap();
    assert_eq!(moves_of(&a.outcome), 4);
    assert_replayable(&lattice, a.outcome.path().unwrap());
}

#[test]
fn single_pivot_fixtures() {
    let (lattice, goal) = bar(4, 5);
    let goal = goal2(&lattice, &goal);
    let r = space(&lattice)
        .search(SearchMethod::AStar, HeuristicKind::Mrsh1, &goal)
        .unwrap();
    assert_eq!(moves_of(&r.outcome), 1);

    let (lattice, goal) = slab_3d();
    let refs: Vec<&[i32]> = goal.iter().map(|c| &c[..]).collect();
    let goal = config(&lattice, &refs);
    let r = space(&lattice)
        .search(SearchMethod::AStar, HeuristicKind::Mrsh1, &goal)
        .unwrap();
    assert_eq!(moves_of(&r.outcome), 1);
    assert_replayable(&lattice, r.outcome.path().unwrap());
}

// ── Properties ──────────────────────────────────────────────────

const RED: u32 = 0xff0000;
const BLUE: u32 = 0x0000ff;

fn colored(lattice: &Lattice, cells: &[([i32; 2], u32)]) -> Configuration {
    let g = lattice.geometry();
    Configuration::new(
        cells
            .iter()
            .map(|(c, rgb)| Occupant {
                cell: g.index_of(c).unwrap(),
                properties: PropertySet::new()
                    .with(ModuleProperty::Color(Color::from_int(*rgb))),
            })
            .collect(),
    )
    .unwrap()
}

fn two_colors() -> Lattice {
    TestLatticeBuilder::new(2, 3)
        .colored(&[0, 0], RED)
        .colored(&[1, 0], BLUE)
        .build()
}

#[test]
fn swapped_colors_matter_unless_ignored() {
    let lattice = two_colors();
    let swapped = colored(&lattice, &[([0, 0], BLUE), ([1, 0], RED)]);

    let mut s = space(&lattice);
    assert!(s.matches_properties());
    let r = s.search(SearchMethod::Bfs, HeuristicKind::Mrsh1, &swapped).unwrap();
    assert!(r.outcome.path().is_none_or(|p| p.move_count() > 0));

    let cfg = SearchConfig {
        ignore_properties: true,
        ..Default::default()
    };
    let mut s = space_with(&lattice, cfg);
    assert!(!s.matches_properties());
    let r = s.search(SearchMethod::Bfs, HeuristicKind::Mrsh1, &swapped).unwrap();
    assert_eq!(moves_of(&r.outcome), 0);
}

#[test]
fn different_palettes_are_a_setup_error() {
    let lattice = two_colors();
    let both_red = colored(&lattice, &[([0, 0], RED), ([1, 0], RED)]);
    let err = space(&lattice)
        .search(SearchMethod::AStar, HeuristicKind::Mrsh1, &both_red)
        .unwrap_err();
    assert!(matches!(err, SearchError::PropertyMismatch { .. }));
}

// ── Random goals ────────────────────────────────────────────────

#[test]
fn random_final_is_seed_deterministic() {
    let (lattice, _) = bar(4, 5);
    let mut s = space(&lattice);
    let start = s.start();
    let a = s.generate_random_final(&start, 6, 42).unwrap();
    let b = s.generate_random_final(&start, 6, 42).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.len(), start.len());
    let r = s.bfs(&start, &a).unwrap();
    assert!(moves_of(&r.outcome) <= 6);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn a_star_matches_bfs_on_random_goals(steps in 1usize..5, seed in any::<u64>()) {
        let (lattice, _) = bar(4, 5);
        let mut s = space(&lattice);
        let start = s.start();
        let goal = s.generate_random_final(&start, steps, seed).unwrap();
        let bfs = s.bfs(&start, &goal).unwrap();
        let bfs_len = moves_of(&bfs.outcome);
        for kind in HeuristicKind::ALL {
            let astar = s.a_star(&start, &goal, kind).unwrap();
            prop_assert!(moves_of(&astar.outcome) <= bfs_len);
            prop_assert_eq!(moves_of(&astar.outcome), bfs_len);
        }
    }

    #[test]
    fn cache_limits_never_change_mrsh1(steps in 0usize..6, seed in any::<u64>()) {
        let (lattice, goal) = l_shape();
        let goal = goal2(&lattice, &goal);
        let catalog = builtin_catalog(2);
        let mut s = space(&lattice);
        let start = s.start();
        let sample = s.generate_random_final(&start, steps, seed).unwrap();
        let limits = [
            CacheLimits::default(),
            CacheLimits { enabled: false, ..Default::default() },
            CacheLimits { l1_limit: Some(1), linf_limit: Some(1), help_limit: Some(1), ..Default::default() },
        ];
        let values: Vec<f64> = limits
            .iter()
            .map(|lim| {
                let mut h = build_heuristic(HeuristicKind::Mrsh1, &goal, lattice.geometry(), &catalog, lim);
                // Twice, so the second evaluation reads whatever was stored.
                h.estimate(&sample);
                h.estimate(&sample)
            })
            .collect();
        prop_assert_eq!(values[0], values[1]);
        prop_assert_eq!(values[0], values[2]);
    }
}
