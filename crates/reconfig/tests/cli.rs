use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("reconfig-cli-{}-{name}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

fn reconfig(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_reconfig"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

fn scenario(cells: &[[i32; 2]]) -> String {
    let modules: Vec<String> = cells
        .iter()
        .map(|[x, y]| format!(r#"{{ "position": [{x}, {y}], "static": false }}"#))
        .collect();
    format!(
        r#"{{ "order": 2, "axisSize": 3, "modules": [{}] }}"#,
        modules.join(", ")
    )
}

fn write(dir: &Path, name: &str, text: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path.to_string_lossy().into_owned()
}

#[test]
fn solves_l_shape_and_writes_scen() {
    let dir = scratch("solve");
    let initial = write(&dir, "ell_initial.json", &scenario(&[[0, 0], [1, 0], [0, 1]]));
    let goal = write(&dir, "ell_final.json", &scenario(&[[1, 0], [2, 0], [1, 1]]));

    let out = reconfig(&["--initial-file", &initial, "--final-file", &goal]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let scen = fs::read_to_string(dir.join("ell.scen")).unwrap();
    let mut lines = scen.lines();
    assert_eq!(lines.next(), Some("ell"));
    assert_eq!(scen.lines().filter(|l| l.starts_with('*')).count(), 3);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn bfs_with_explicit_export_path() {
    let dir = scratch("bfs");
    let initial = write(&dir, "a.json", &scenario(&[[0, 0], [1, 0], [0, 1]]));
    let goal = write(&dir, "b.json", &scenario(&[[1, 0], [2, 0], [1, 1]]));
    let export = dir.join("out.scen").to_string_lossy().into_owned();

    let out = reconfig(&["-I", &initial, "-F", &goal, "-s", "bfs", "-e", &export]);
    assert!(out.status.success());
    assert!(Path::new(&export).exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn random_final_needs_no_goal_file() {
    let dir = scratch("random");
    let initial = write(&dir, "r_initial.json", &scenario(&[[0, 0], [1, 0], [0, 1]]));

    let out = reconfig(&["-I", &initial, "--random-final", "3", "--seed", "7"]);
    assert!(out.status.success());
    assert!(dir.join("r.scen").exists());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn outcomes_map_to_exit_codes() {
    let dir = scratch("codes");
    let lone = write(&dir, "lone.json", &scenario(&[[0, 0]]));
    let there = write(&dir, "there.json", &scenario(&[[2, 2]]));
    let out = reconfig(&["-I", &lone, "-F", &there]);
    assert_eq!(out.status.code(), Some(2));

    let initial = write(&dir, "ell.json", &scenario(&[[0, 0], [1, 0], [0, 1]]));
    let goal = write(&dir, "goal.json", &scenario(&[[1, 0], [2, 0], [1, 1]]));
    let out = reconfig(&["-I", &initial, "-F", &goal, "--max-expansions", "1"]);
    assert_eq!(out.status.code(), Some(3));

    let bigger = write(&dir, "big.json", &scenario(&[[1, 0], [2, 0], [1, 1], [2, 1]]));
    let out = reconfig(&["-I", &initial, "-F", &bigger]);
    assert_eq!(out.status.code(), Some(1));

    let out = reconfig(&["-I", &initial, "-F", &goal, "-s", "dijkstra"]);
    assert!(!out.status.success());

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn analysis_file_is_written_for_every_outcome() {
    let dir = scratch("analysis");
    let initial = write(&dir, "ell.json", &scenario(&[[0, 0], [1, 0], [0, 1]]));
    let goal = write(&dir, "goal.json", &scenario(&[[1, 0], [2, 0], [1, 1]]));
    let found = dir.join("found.json").to_string_lossy().into_owned();
    let out = reconfig(&["-I", &initial, "-F", &goal, "-s", "bfs", "-a", &found]);
    assert!(out.status.success());
    let json = fs::read_to_string(&found).unwrap();
    assert!(json.contains(r#""outcome": "found""#), "{json}");
    assert!(json.contains(r#""path_moves": 3"#), "{json}");

    let lone = write(&dir, "lone.json", &scenario(&[[0, 0]]));
    let there = write(&dir, "there.json", &scenario(&[[2, 2]]));
    let stuck = dir.join("stuck.json").to_string_lossy().into_owned();
    let out = reconfig(&["-I", &lone, "-F", &there, "--analysis-file", &stuck]);
    assert_eq!(out.status.code(), Some(2));
    let json = fs::read_to_string(&stuck).unwrap();
    assert!(json.contains(r#""outcome": "unreachable""#), "{json}");
    assert!(!json.contains("path_moves"), "{json}");

    let _ = fs::remove_dir_all(&dir);
}
