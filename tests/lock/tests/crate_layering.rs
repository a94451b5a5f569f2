//! Build-graph layering: kernel ← search ← harness, never the reverse, and
//! the search engine performs no I/O.

use std::fmt::Write;
use std::fs;
use std::path::{Path, PathBuf};

fn workspace_root() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../..")
}

/// `(file, line, text)` for every non-comment source line containing one of
/// `patterns`. Stops at the first `#[cfg(test)]`, since test modules sit at
/// the end of each file.
fn scan(dir: &Path, patterns: &[&str]) -> Vec<(String, usize, String)> {
    let mut hits = Vec::new();
    let Ok(entries) = fs::read_dir(dir) else {
        return hits;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            hits.extend(scan(&path, patterns));
            continue;
        }
        if !path.extension().is_some_and(|e| e == "rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        for (line_no, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.starts_with("#[cfg(test)]") {
                break;
            }
            if trimmed.starts_with("//") {
                continue;
            }
            if patterns.iter().any(|p| trimmed.contains(p)) {
                hits.push((path.display().to_string(), line_no + 1, line.to_string()));
            }
        }
    }
    hits
}

fn assert_clean(what: &str, hits: &[(String, usize, String)]) {
    if hits.is_empty() {
        return;
    }
    let mut msg = format!("{what}:\n");
    for (file, line, text) in hits {
        let _ = writeln!(msg, "  {file}:{line}: {text}");
    }
    panic!("{msg}");
}

fn dependency_lines(krate: &str) -> Vec<String> {
    let toml = workspace_root().join(krate).join("Cargo.toml");
    fs::read_to_string(&toml)
        .unwrap_or_else(|e| panic!("{}: {e}", toml.display()))
        .lines()
        .map(str::trim)
        .filter(|l| l.starts_with("wayfinder-"))
        .map(str::to_string)
        .collect()
}

#[test]
fn kernel_depends_on_no_workspace_crate() {
    assert_eq!(dependency_lines("kernel"), Vec::<String>::new());
    let src = workspace_root().join("kernel/src");
    assert_clean(
        "kernel reaches upward",
        &scan(&src, &["wayfinder_search", "wayfinder_harness"]),
    );
}

#[test]
fn search_depends_only_on_kernel() {
    let deps = dependency_lines("search");
    assert_eq!(deps.len(), 1, "{deps:?}");
    assert!(deps[0].starts_with("wayfinder-kernel"));
    let src = workspace_root().join("search/src");
    assert_clean("search reaches upward", &scan(&src, &["wayfinder_harness"]));
}

#[test]
fn search_engine_does_no_io() {
    let src = workspace_root().join("search/src");
    assert_clean(
        "I/O in the search engine",
        &scan(
            &src,
            &["std::fs", "std::net", "std::io", "println!", "eprintln!", "std::env"],
        ),
    );
}
