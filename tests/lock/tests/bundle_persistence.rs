//! Bundle directory round trips and fail-closed verification on a real
//! comparison bundle.

use lock_tests::bundle_helpers::{
    rebuild_with_modified_trace, rebuild_with_replaced_artifact, rebuild_without_artifact,
};
use wayfinder_harness::bundle::{
    verify_bundle, BundleVerifyError, COMPARISON_ARTIFACT, WORLD_ARTIFACT,
};
use wayfinder_harness::bundle_dir::{
    read_bundle_dir, verify_bundle_dir, write_bundle_dir, BundleDirReadError, BundleDirVerifyError,
};
use wayfinder_harness::runner::{run_comparison, ComparisonConfig};
use wayfinder_harness::worlds::poland_roads::PolandRoads;

fn reference_bundle() -> wayfinder_harness::bundle::ArtifactBundleV1 {
    run_comparison(&PolandRoads, &ComparisonConfig::default())
        .unwrap()
        .bundle
}

#[test]
fn write_read_verify_roundtrip() {
    let bundle = reference_bundle();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();

    let loaded = read_bundle_dir(dir.path()).unwrap();
    assert_eq!(loaded.digest, bundle.digest);
    assert_eq!(loaded.artifacts, bundle.artifacts);
    verify_bundle_dir(dir.path()).unwrap();
}

#[test]
fn rewriting_same_bundle_is_idempotent() {
    let bundle = reference_bundle();
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&bundle, dir.path()).unwrap();
    let first = std::fs::read(dir.path().join(COMPARISON_ARTIFACT)).unwrap();
    write_bundle_dir(&reference_bundle(), dir.path()).unwrap();
    assert_eq!(std::fs::read(dir.path().join(COMPARISON_ARTIFACT)).unwrap(), first);
    verify_bundle_dir(dir.path()).unwrap();
}

#[test]
fn edited_trace_file_fails_verification() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&reference_bundle(), dir.path()).unwrap();

    let path = dir.path().join("trace_dfs.json");
    let mut content = std::fs::read(&path).unwrap();
    let at = content.iter().position(|&b| b == b'4').unwrap();
    content[at] = b'5';
    std::fs::write(&path, content).unwrap();

    assert!(matches!(
        verify_bundle_dir(dir.path()),
        Err(BundleDirVerifyError::VerifyError(BundleVerifyError::ContentHashMismatch { .. }))
    ));
}

#[test]
fn stray_file_fails_read() {
    let dir = tempfile::tempdir().unwrap();
    write_bundle_dir(&reference_bundle(), dir.path()).unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"hand-added").unwrap();
    assert!(matches!(
        read_bundle_dir(dir.path()),
        Err(BundleDirReadError::ExtraFile { .. })
    ));
}

#[test]
fn missing_trace_is_unbound_row() {
    let bundle = rebuild_without_artifact(&reference_bundle(), "trace_bfs.json");
    assert!(matches!(
        verify_bundle(&bundle),
        Err(BundleVerifyError::TraceArtifactMissing { .. })
    ));
}

#[test]
fn swapped_world_breaks_world_binding() {
    let bundle = rebuild_with_replaced_artifact(
        &reference_bundle(),
        WORLD_ARTIFACT,
        br#"{"world_id":"elsewhere"}"#.to_vec(),
    );
    assert!(matches!(
        verify_bundle(&bundle),
        Err(BundleVerifyError::WorldDigestMismatch { .. })
    ));
}

#[test]
fn swapped_trace_breaks_trace_binding() {
    let original = reference_bundle();
    let dfs = original.artifacts["trace_dfs.json"].content.clone();
    let bundle = rebuild_with_replaced_artifact(&original, "trace_astar.json", dfs);
    assert!(matches!(
        verify_bundle(&bundle),
        Err(BundleVerifyError::TraceDigestMismatch { .. })
    ));
}

#[test]
fn rebound_trace_edit_passes_binding_checks() {
    // Re-binding the digest keeps the bundle self-consistent; the edited
    // message is then only visible to a reader of the trace itself.
    let bundle = rebuild_with_modified_trace(&reference_bundle(), "astar", |trace| {
        trace["records"][0]["message"] = serde_json::json!("edited");
    });
    verify_bundle(&bundle).unwrap();
    assert_ne!(bundle.digest, reference_bundle().digest);
}
