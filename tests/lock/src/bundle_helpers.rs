//! Helpers for mutating and rebuilding artifact bundles.
//!
//! Every rebuild goes through `build_bundle`, so the manifest, digest basis,
//! and digest stay self-consistent. A negative test then exercises the
//! binding it targets instead of tripping over a stale digest.

use wayfinder_harness::bundle::{build_bundle, ArtifactBundleV1, COMPARISON_ARTIFACT};
use wayfinder_kernel::proof::canon::canonical_json_bytes;
use wayfinder_kernel::proof::hash::{canonical_hash, HashDomain};

fn rebuild(
    bundle: &ArtifactBundleV1,
    mut edit: impl FnMut(&str, &[u8]) -> Option<Vec<u8>>,
) -> ArtifactBundleV1 {
    let artifacts: Vec<(String, Vec<u8>, bool)> = bundle
        .artifacts
        .values()
        .filter_map(|a| edit(&a.name, &a.content).map(|c| (a.name.clone(), c, a.normative)))
        .collect();
    build_bundle(artifacts).unwrap()
}

/// Drop `name` and rebuild.
///
/// # Panics
///
/// Panics if the rebuilt bundle cannot be assembled.
pub fn rebuild_without_artifact(bundle: &ArtifactBundleV1, name: &str) -> ArtifactBundleV1 {
    rebuild(bundle, |n, c| (n != name).then(|| c.to_vec()))
}

/// Replace the content of `name` and rebuild, leaving every other artifact
/// (including the comparison report's bindings) untouched.
///
/// # Panics
///
/// Panics if the rebuilt bundle cannot be assembled.
pub fn rebuild_with_replaced_artifact(
    bundle: &ArtifactBundleV1,
    name: &str,
    content: Vec<u8>,
) -> ArtifactBundleV1 {
    rebuild(bundle, |n, c| {
        Some(if n == name {
            content.clone()
        } else {
            c.to_vec()
        })
    })
}

/// Edit one trace artifact as JSON and re-bind its digest in
/// `comparison.json`, so only checks beyond digest binding can notice.
///
/// # Panics
///
/// Panics if the artifact or report is missing or not JSON. Test-only
/// invariants.
pub fn rebuild_with_modified_trace(
    bundle: &ArtifactBundleV1,
    strategy: &str,
    modify: impl FnOnce(&mut serde_json::Value),
) -> ArtifactBundleV1 {
    let name = format!("trace_{strategy}.json");
    let mut trace: serde_json::Value =
        serde_json::from_slice(&bundle.artifacts[&name].content).unwrap();
    modify(&mut trace);
    let trace_bytes = canonical_json_bytes(&trace).unwrap();
    let digest = canonical_hash(HashDomain::SearchTrace, &trace_bytes);

    let mut report: serde_json::Value =
        serde_json::from_slice(&bundle.artifacts[COMPARISON_ARTIFACT].content).unwrap();
    for row in report["rows"].as_array_mut().unwrap() {
        if row["strategy"] == strategy {
            row["trace_digest"] = serde_json::json!(digest.as_str());
        }
    }
    let report_bytes = canonical_json_bytes(&report).unwrap();

    rebuild(bundle, |n, c| {
        Some(if n == name {
            trace_bytes.clone()
        } else if n == COMPARISON_ARTIFACT {
            report_bytes.clone()
        } else {
            c.to_vec()
        })
    })
}
