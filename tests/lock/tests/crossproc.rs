//! Cross-process determinism: `route_fixture` prints the same lines no
//! matter the working directory, locale, log level, or unrelated env vars.

use std::path::Path;
use std::process::Command;

/// Path to the compiled `route_fixture`, a sibling of the `deps/` dir the
/// test binary runs from.
fn binary_path() -> String {
    let mut path = std::env::current_exe()
        .expect("can resolve test binary path")
        .parent()
        .expect("binary dir exists")
        .parent()
        .expect("deps parent exists")
        .to_path_buf();
    path.push("route_fixture");
    path.to_string_lossy().to_string()
}

fn workspace_root() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../..")
        .to_string_lossy()
        .to_string()
}

fn run_variant(work_dir: &str, env_overrides: &[(&str, &str)]) -> String {
    let bin = binary_path();
    let mut command = Command::new(&bin);
    command
        .current_dir(work_dir)
        .env_remove("LC_ALL")
        .env_remove("LC_COLLATE")
        .env_remove("LANG")
        .env_remove("RUST_LOG");
    for &(key, val) in env_overrides {
        command.env(key, val);
    }

    let output = command.output().unwrap_or_else(|e| {
        panic!("failed to spawn {bin} (work_dir={work_dir}, overrides={env_overrides:?}): {e}")
    });
    assert!(
        output.status.success(),
        "route_fixture exited with {}: stderr={}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).expect("stdout is valid UTF-8")
}

fn value<'a>(output: &'a str, key: &str) -> &'a str {
    output
        .lines()
        .find_map(|l| l.strip_prefix(key).and_then(|rest| rest.strip_prefix('=')))
        .unwrap_or_else(|| panic!("missing {key} in output:\n{output}"))
}

#[test]
fn fixture_reports_reference_goldens() {
    let out = run_variant(&workspace_root(), &[]);

    assert_eq!(value(&out, "dfs_path"), "Glogow,Leszno,Poznan,Bydgoszcz,Wloclawek,Plock");
    assert_eq!(value(&out, "dfs_cost"), "440");
    assert_eq!(value(&out, "bfs_path"), "Glogow,Leszno,Kalisz,Lodz,Warsaw,Plock");
    assert_eq!(value(&out, "bfs_cost"), "575");
    assert_eq!(value(&out, "bfs_expanded"), "16");
    assert_eq!(value(&out, "astar_cost"), "440");
    assert_eq!(value(&out, "astar_steps"), "10");
    assert_eq!(value(&out, "artifact_count"), "5");
    assert!(value(&out, "bundle_digest").starts_with("sha256:"));
}

#[test]
fn crossproc_determinism_env_variants() {
    let root = workspace_root();
    let baseline = run_variant(&root, &[]);

    let elsewhere = tempfile::tempdir().unwrap();
    let cwd = elsewhere.path().to_string_lossy().to_string();
    assert_eq!(baseline, run_variant(&cwd, &[]), "cwd changed to {cwd}");

    assert_eq!(
        baseline,
        run_variant(&root, &[("LC_ALL", "C"), ("LANG", "C")]),
        "LC_ALL=C LANG=C"
    );

    assert_eq!(
        baseline,
        run_variant(&root, &[("RUST_LOG", "trace")]),
        "RUST_LOG=trace must only affect stderr"
    );

    assert_eq!(
        baseline,
        run_variant(
            &root,
            &[
                ("WAYFINDER_NOISE", "should_not_matter"),
                ("TZ", "America/New_York"),
                ("HOME", "/nonexistent"),
            ],
        ),
        "spurious env vars"
    );
}
