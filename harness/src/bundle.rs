//! In-memory artifact bundle: the output of a comparison run.
//!
//! No file I/O in this module. The bundle is a deterministic in-memory
//! representation that can be inspected programmatically.
//!
//! # Normative vs observational artifacts
//!
//! Each artifact is tagged `normative` (participates in bundle digest)
//! or observational (present in the manifest but excluded from digest).
//!
//! `timings.json` is observational because wall-clock time differs on
//! every run. Everything else a run produces is a pure function of the
//! world and the strategy list.
//!
//! The bundle digest is computed over the **digest basis**: a canonical
//! JSON projection of normative artifact hashes only.

use std::collections::BTreeMap;

use wayfinder_kernel::proof::canon::{canonical_json_bytes, is_canonical_json};
use wayfinder_kernel::proof::hash::{canonical_hash, ContentHash, HashDomain};

/// Domain prefix for bundle artifact content hashing.
pub const DOMAIN_BUNDLE_ARTIFACT: HashDomain = HashDomain::BundleArtifact;

/// Domain prefix for bundle digest computation.
pub const DOMAIN_BUNDLE_DIGEST: HashDomain = HashDomain::BundleDigest;

/// Name of the comparison report artifact.
pub const COMPARISON_ARTIFACT: &str = "comparison.json";

/// Name of the world description artifact.
pub const WORLD_ARTIFACT: &str = "world.json";

/// Name of the observational timing artifact.
pub const TIMINGS_ARTIFACT: &str = "timings.json";

/// Artifact name for the trace of strategy `kind` (e.g. `trace_astar.json`).
#[must_use]
pub fn trace_artifact_name(kind: &str) -> String {
    format!("trace_{kind}.json")
}

/// A single artifact in the bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleArtifact {
    /// Logical filename (e.g., `"comparison.json"`).
    pub name: String,
    /// Raw bytes of the artifact.
    pub content: Vec<u8>,
    /// Content hash: `canonical_hash(DOMAIN_BUNDLE_ARTIFACT, content)`.
    pub content_hash: ContentHash,
    /// Whether this artifact participates in the bundle digest.
    pub normative: bool,
}

/// The complete artifact bundle from a comparison run.
#[derive(Debug, Clone)]
pub struct ArtifactBundleV1 {
    /// Artifacts indexed by logical name, in sorted order (`BTreeMap`).
    pub artifacts: BTreeMap<String, BundleArtifact>,
    /// Full manifest: canonical JSON listing all artifacts with normative flags.
    pub manifest: Vec<u8>,
    /// Digest basis: canonical JSON listing normative artifact hashes only.
    pub digest_basis: Vec<u8>,
    /// Bundle digest: `canonical_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
    pub digest: ContentHash,
}

/// Error building a bundle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleBuildError {
    /// Canonical JSON serialization failed.
    CanonError { detail: String },
    /// Caller-provided `precomputed_hash` does not match recomputed hash.
    PrecomputedHashMismatch {
        name: String,
        expected: String,
        computed: String,
    },
    /// Two inputs share one artifact name.
    DuplicateArtifact { name: String },
}

impl std::fmt::Display for BundleBuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CanonError { detail } => write!(f, "canonical JSON error: {detail}"),
            Self::PrecomputedHashMismatch {
                name,
                expected,
                computed,
            } => write!(
                f,
                "precomputed hash for {name} is {expected}, content hashes to {computed}"
            ),
            Self::DuplicateArtifact { name } => write!(f, "artifact {name} supplied twice"),
        }
    }
}

impl std::error::Error for BundleBuildError {}

/// Input for bundle assembly.
///
/// If `precomputed_hash` is provided, it must be
/// `canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &content)`.
pub struct ArtifactInput {
    pub name: String,
    pub content: Vec<u8>,
    pub normative: bool,
    /// If provided, `build_bundle` checks and reuses this hash.
    pub precomputed_hash: Option<ContentHash>,
}

impl From<(String, Vec<u8>, bool)> for ArtifactInput {
    fn from((name, content, normative): (String, Vec<u8>, bool)) -> Self {
        Self {
            name,
            content,
            normative,
            precomputed_hash: None,
        }
    }
}

/// Build an `ArtifactBundleV1` from a list of artifact inputs.
///
/// Computes content hashes (or checks precomputed ones), builds the sorted
/// manifest and digest basis, and derives the bundle digest.
///
/// Accepts `Vec<ArtifactInput>` or `Vec<(String, Vec<u8>, bool)>` (via `From`).
///
/// # Errors
///
/// Returns [`BundleBuildError`] on a hash mismatch, a duplicate name, or a
/// canonical JSON failure.
pub fn build_bundle(
    artifacts: Vec<impl Into<ArtifactInput>>,
) -> Result<ArtifactBundleV1, BundleBuildError> {
    let mut artifact_map = BTreeMap::new();

    for input in artifacts {
        let input = input.into();
        let recomputed = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &input.content);
        if let Some(h) = input.precomputed_hash {
            if h != recomputed {
                return Err(BundleBuildError::PrecomputedHashMismatch {
                    name: input.name,
                    expected: h.as_str().to_string(),
                    computed: recomputed.as_str().to_string(),
                });
            }
        }
        if artifact_map.contains_key(&input.name) {
            return Err(BundleBuildError::DuplicateArtifact { name: input.name });
        }
        artifact_map.insert(
            input.name.clone(),
            BundleArtifact {
                name: input.name,
                content: input.content,
                content_hash: recomputed,
                normative: input.normative,
            },
        );
    }

    let manifest = compute_manifest_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;

    let digest_basis = compute_digest_basis_bytes(&artifact_map)
        .map_err(|detail| BundleBuildError::CanonError { detail })?;

    let digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis);

    Ok(ArtifactBundleV1 {
        artifacts: artifact_map,
        manifest,
        digest_basis,
        digest,
    })
}

/// Error from bundle integrity verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BundleVerifyError {
    /// An artifact's stored `content_hash` does not match recomputed hash.
    ContentHashMismatch {
        artifact: String,
        expected: String,
        actual: String,
    },
    /// Stored `manifest` bytes do not match recomputed manifest from artifacts.
    ManifestMismatch,
    /// Stored `manifest` bytes are not in canonical JSON form.
    ManifestNotCanonical,
    /// Stored `digest_basis` bytes do not match recomputed normative projection.
    DigestBasisMismatch,
    /// Stored `digest_basis` bytes are not in canonical JSON form.
    DigestBasisNotCanonical,
    /// Stored `digest` does not match recomputed hash of `digest_basis`.
    DigestMismatch { expected: String, actual: String },
    /// A normative JSON artifact is not in canonical JSON form.
    ArtifactNotCanonical { artifact: String },
    /// `comparison.json` is not valid JSON.
    ReportParseError { detail: String },
    /// `comparison.json` is missing a required field.
    ReportFieldMissing { field: String },
    /// A comparison row names a strategy whose trace artifact is absent.
    TraceArtifactMissing { artifact: String },
    /// A trace artifact's digest differs from the one its comparison row declares.
    TraceDigestMismatch {
        artifact: String,
        declared: String,
        recomputed: String,
    },
    /// A trace artifact is present but no comparison row refers to it.
    UnboundTraceArtifact { artifact: String },
    /// `comparison.json` declares a `world_digest` that differs from `world.json`.
    WorldDigestMismatch { declared: String, recomputed: String },
    /// `world.json` is referenced by the report but absent, or vice versa.
    WorldArtifactMissing,
}

impl std::fmt::Display for BundleVerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ContentHashMismatch {
                artifact,
                expected,
                actual,
            } => write!(f, "{artifact}: stored hash {expected}, content hashes to {actual}"),
            Self::ManifestMismatch => write!(f, "manifest does not match artifacts"),
            Self::ManifestNotCanonical => write!(f, "manifest is not canonical JSON"),
            Self::DigestBasisMismatch => write!(f, "digest basis does not match artifacts"),
            Self::DigestBasisNotCanonical => write!(f, "digest basis is not canonical JSON"),
            Self::DigestMismatch { expected, actual } => {
                write!(f, "bundle digest {expected}, recomputed {actual}")
            }
            Self::ArtifactNotCanonical { artifact } => {
                write!(f, "{artifact} is not canonical JSON")
            }
            Self::ReportParseError { detail } => write!(f, "comparison report: {detail}"),
            Self::ReportFieldMissing { field } => {
                write!(f, "comparison report is missing {field}")
            }
            Self::TraceArtifactMissing { artifact } => write!(f, "{artifact} is missing"),
            Self::TraceDigestMismatch {
                artifact,
                declared,
                recomputed,
            } => write!(f, "{artifact}: declared {declared}, recomputed {recomputed}"),
            Self::UnboundTraceArtifact { artifact } => {
                write!(f, "{artifact} is not referenced by the comparison report")
            }
            Self::WorldDigestMismatch {
                declared,
                recomputed,
            } => write!(f, "world digest declared {declared}, recomputed {recomputed}"),
            Self::WorldArtifactMissing => {
                write!(f, "world.json and comparison world_digest must appear together")
            }
        }
    }
}

impl std::error::Error for BundleVerifyError {}

/// Verify the internal consistency of a bundle.
///
/// This is a pure integrity check; it does NOT re-run any search. It proves:
///
/// 1. Each artifact's `content_hash` matches `canonical_hash(DOMAIN_BUNDLE_ARTIFACT, content)`.
/// 2. `manifest` bytes match the canonical projection recomputed from all artifacts.
/// 3. `digest_basis` bytes match the projection recomputed from normative artifacts only.
/// 4. `digest` matches `canonical_hash(DOMAIN_BUNDLE_DIGEST, digest_basis)`.
/// 5. `manifest`, `digest_basis`, and normative `.json` artifacts are canonical JSON.
/// 6. If `comparison.json` is present: every row's trace artifact exists and
///    its search-trace digest matches the row, every trace artifact is bound
///    to a row, and `world_digest` matches `world.json`.
///
/// # Errors
///
/// Returns the first [`BundleVerifyError`] encountered.
pub fn verify_bundle(bundle: &ArtifactBundleV1) -> Result<(), BundleVerifyError> {
    for artifact in bundle.artifacts.values() {
        let recomputed = canonical_hash(DOMAIN_BUNDLE_ARTIFACT, &artifact.content);
        if recomputed != artifact.content_hash {
            return Err(BundleVerifyError::ContentHashMismatch {
                artifact: artifact.name.clone(),
                expected: artifact.content_hash.as_str().to_string(),
                actual: recomputed.as_str().to_string(),
            });
        }
    }

    let expected_manifest = compute_manifest_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::ReportParseError { detail })?;
    if expected_manifest != bundle.manifest {
        return Err(BundleVerifyError::ManifestMismatch);
    }
    if !is_canonical_json(&bundle.manifest) {
        return Err(BundleVerifyError::ManifestNotCanonical);
    }

    let expected_basis = compute_digest_basis_bytes(&bundle.artifacts)
        .map_err(|detail| BundleVerifyError::ReportParseError { detail })?;
    if expected_basis != bundle.digest_basis {
        return Err(BundleVerifyError::DigestBasisMismatch);
    }
    if !is_canonical_json(&bundle.digest_basis) {
        return Err(BundleVerifyError::DigestBasisNotCanonical);
    }

    let recomputed_digest = canonical_hash(DOMAIN_BUNDLE_DIGEST, &bundle.digest_basis);
    if recomputed_digest != bundle.digest {
        return Err(BundleVerifyError::DigestMismatch {
            expected: bundle.digest.as_str().to_string(),
            actual: recomputed_digest.as_str().to_string(),
        });
    }

    for artifact in bundle.artifacts.values() {
        let is_json = std::path::Path::new(&artifact.name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if artifact.normative && is_json && !is_canonical_json(&artifact.content) {
            return Err(BundleVerifyError::ArtifactNotCanonical {
                artifact: artifact.name.clone(),
            });
        }
    }

    verify_report_bindings(bundle)
}

/// Recompute manifest bytes from all artifacts.
fn compute_manifest_bytes(artifacts: &BTreeMap<String, BundleArtifact>) -> Result<Vec<u8>, String> {
    let manifest_artifacts: Vec<serde_json::Value> = artifacts
        .values()
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
                "normative": a.normative,
            })
        })
        .collect();

    let manifest_value = serde_json::json!({
        "artifacts": manifest_artifacts,
        "schema_version": "bundle.v1",
    });

    canonical_json_bytes(&manifest_value).map_err(|e| e.to_string())
}

/// Recompute digest basis bytes from normative artifacts only.
fn compute_digest_basis_bytes(
    artifacts: &BTreeMap<String, BundleArtifact>,
) -> Result<Vec<u8>, String> {
    let normative_artifacts: Vec<serde_json::Value> = artifacts
        .values()
        .filter(|a| a.normative)
        .map(|a| {
            serde_json::json!({
                "content_hash": a.content_hash.as_str(),
                "name": a.name,
            })
        })
        .collect();

    let digest_basis_value = serde_json::json!({
        "artifacts": normative_artifacts,
        "schema_version": "bundle_digest_basis.v1",
    });

    canonical_json_bytes(&digest_basis_value).map_err(|e| e.to_string())
}

/// Fail-closed bindings between `comparison.json` and the artifacts it
/// describes. Bundles without a comparison report carry no bindings, but a
/// trace artifact without a report is unbound and rejected.
fn verify_report_bindings(bundle: &ArtifactBundleV1) -> Result<(), BundleVerifyError> {
    let Some(report_artifact) = bundle.artifacts.get(COMPARISON_ARTIFACT) else {
        if let Some(name) = bundle.artifacts.keys().find(|n| is_trace_artifact(n)) {
            return Err(BundleVerifyError::UnboundTraceArtifact {
                artifact: name.clone(),
            });
        }
        return Ok(());
    };

    let report: serde_json::Value =
        serde_json::from_slice(&report_artifact.content).map_err(|e| {
            BundleVerifyError::ReportParseError {
                detail: e.to_string(),
            }
        })?;

    let rows = report["rows"]
        .as_array()
        .ok_or_else(|| BundleVerifyError::ReportFieldMissing {
            field: "rows".into(),
        })?;

    let mut bound: Vec<String> = Vec::with_capacity(rows.len());
    for row in rows {
        let strategy =
            row["strategy"]
                .as_str()
                .ok_or_else(|| BundleVerifyError::ReportFieldMissing {
                    field: "rows[].strategy".into(),
                })?;
        let declared =
            row["trace_digest"]
                .as_str()
                .ok_or_else(|| BundleVerifyError::ReportFieldMissing {
                    field: "rows[].trace_digest".into(),
                })?;
        let name = trace_artifact_name(strategy);
        let Some(trace) = bundle.artifacts.get(&name) else {
            return Err(BundleVerifyError::TraceArtifactMissing { artifact: name });
        };
        let recomputed = canonical_hash(HashDomain::SearchTrace, &trace.content);
        if recomputed.as_str() != declared {
            return Err(BundleVerifyError::TraceDigestMismatch {
                artifact: name,
                declared: declared.to_string(),
                recomputed: recomputed.as_str().to_string(),
            });
        }
        bound.push(name);
    }

    if let Some(name) = bundle
        .artifacts
        .keys()
        .find(|n| is_trace_artifact(n) && !bound.contains(n))
    {
        return Err(BundleVerifyError::UnboundTraceArtifact {
            artifact: name.clone(),
        });
    }

    match (report["world_digest"].as_str(), bundle.artifacts.get(WORLD_ARTIFACT)) {
        (None, None) => Ok(()),
        (Some(declared), Some(world)) => {
            if world.content_hash.as_str() == declared {
                Ok(())
            } else {
                Err(BundleVerifyError::WorldDigestMismatch {
                    declared: declared.to_string(),
                    recomputed: world.content_hash.as_str().to_string(),
                })
            }
        }
        _ => Err(BundleVerifyError::WorldArtifactMissing),
    }
}

fn is_trace_artifact(name: &str) -> bool {
    name.starts_with("trace_")
        && std::path::Path::new(name)
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
