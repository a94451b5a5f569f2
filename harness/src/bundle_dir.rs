//! Bundle directory persistence: write, read, and verify an
//! `ArtifactBundleV1` on disk.
//!
//! # Directory layout
//!
//! ```text
//! <dir>/
//!   bundle_manifest.json       canonical JSON, every artifact
//!   bundle_digest_basis.json   canonical JSON, normative artifacts only
//!   bundle_digest.txt          "sha256:<hex>"
//!   comparison.json            normative
//!   world.json                 normative
//!   trace_<strategy>.json      normative, one per strategy run
//!   timings.json               observational
//! ```
//!
//! The directory path never enters a hash. The manifest, not the directory
//! listing, is the source of truth for what the bundle contains.
//!
//! Reading is fail-closed: a declared file that is missing, a file that is
//! not declared, an artifact name that could escape the directory, or a
//! stored digest that disagrees with the digest basis is an error.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use wayfinder_kernel::proof::hash::{canonical_hash, ContentHash};

use crate::bundle::{
    verify_bundle, ArtifactBundleV1, BundleArtifact, BundleVerifyError, DOMAIN_BUNDLE_DIGEST,
};

const MANIFEST_FILENAME: &str = "bundle_manifest.json";
const DIGEST_BASIS_FILENAME: &str = "bundle_digest_basis.json";
const DIGEST_FILENAME: &str = "bundle_digest.txt";
const RESERVED_FILENAMES: [&str; 3] = [MANIFEST_FILENAME, DIGEST_BASIS_FILENAME, DIGEST_FILENAME];

/// Prefix of in-flight temp files; ignored when listing a directory.
const TEMP_PREFIX: &str = ".partial_";

/// Error writing a bundle directory.
#[derive(Debug)]
pub enum BundleDirWriteError {
    Io { detail: String },
    /// An artifact name is reserved or is not a plain file name.
    UnsafeArtifactName { name: String },
}

impl std::fmt::Display for BundleDirWriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::UnsafeArtifactName { name } => {
                write!(f, "artifact name {name:?} is not a plain, unreserved file name")
            }
        }
    }
}

impl std::error::Error for BundleDirWriteError {}

/// Error reading a bundle directory.
#[derive(Debug)]
pub enum BundleDirReadError {
    Io { detail: String },
    /// One of the three bundle metadata files is absent.
    MissingMetadata { filename: String },
    /// A declared artifact file is absent.
    MissingArtifact { name: String },
    /// A file is present that the manifest does not declare.
    ExtraFile { name: String },
    ManifestParseError { detail: String },
    /// Manifest `schema_version` is not `bundle.v1`.
    ManifestVersionMismatch { found: String },
    ManifestEntryInvalid { detail: String },
    /// A declared artifact name is reserved or not a plain file name.
    UnsafeArtifactName { name: String },
    /// `bundle_digest.txt` disagrees with the digest of the digest basis.
    DigestMismatch { stored: String, recomputed: String },
}

impl std::fmt::Display for BundleDirReadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { detail } => write!(f, "I/O error: {detail}"),
            Self::MissingMetadata { filename } => write!(f, "missing metadata file: {filename}"),
            Self::MissingArtifact { name } => write!(f, "missing artifact: {name}"),
            Self::ExtraFile { name } => write!(f, "undeclared file: {name}"),
            Self::ManifestParseError { detail } => write!(f, "manifest parse error: {detail}"),
            Self::ManifestVersionMismatch { found } => {
                write!(f, "unsupported manifest version: {found:?}")
            }
            Self::ManifestEntryInvalid { detail } => write!(f, "bad manifest entry: {detail}"),
            Self::UnsafeArtifactName { name } => {
                write!(f, "manifest declares unsafe artifact name {name:?}")
            }
            Self::DigestMismatch { stored, recomputed } => {
                write!(f, "stored digest {stored}, recomputed {recomputed}")
            }
        }
    }
}

impl std::error::Error for BundleDirReadError {}

/// Error verifying a bundle directory.
#[derive(Debug)]
pub enum BundleDirVerifyError {
    ReadError(BundleDirReadError),
    VerifyError(BundleVerifyError),
}

impl std::fmt::Display for BundleDirVerifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadError(e) => write!(f, "read error: {e}"),
            Self::VerifyError(e) => write!(f, "verify error: {e}"),
        }
    }
}

impl std::error::Error for BundleDirVerifyError {}

/// Write `bundle` into `dir`, creating it if needed.
///
/// Every file goes through a temp-file-and-rename so a crash never leaves a
/// half-written artifact under its final name.
///
/// # Errors
///
/// Returns [`BundleDirWriteError`] on I/O failure or an unsafe artifact name.
pub fn write_bundle_dir(bundle: &ArtifactBundleV1, dir: &Path) -> Result<(), BundleDirWriteError> {
    for name in bundle.artifacts.keys() {
        if !is_safe_artifact_name(name) {
            return Err(BundleDirWriteError::UnsafeArtifactName { name: name.clone() });
        }
    }

    std::fs::create_dir_all(dir).map_err(|e| BundleDirWriteError::Io {
        detail: format!("create {}: {e}", dir.display()),
    })?;

    for artifact in bundle.artifacts.values() {
        write_atomic(dir, &artifact.name, &artifact.content)?;
    }
    write_atomic(dir, MANIFEST_FILENAME, &bundle.manifest)?;
    write_atomic(dir, DIGEST_BASIS_FILENAME, &bundle.digest_basis)?;
    write_atomic(dir, DIGEST_FILENAME, bundle.digest.as_str().as_bytes())?;
    Ok(())
}

/// Load a bundle directory written by [`write_bundle_dir`].
///
/// This checks directory-level integrity only (declared set, names, stored
/// digest). Use [`verify_bundle_dir`] for full content verification.
///
/// # Errors
///
/// Returns [`BundleDirReadError`] on any validation failure.
pub fn read_bundle_dir(dir: &Path) -> Result<ArtifactBundleV1, BundleDirReadError> {
    let manifest = read_metadata(dir, MANIFEST_FILENAME)?;
    let digest_basis = read_metadata(dir, DIGEST_BASIS_FILENAME)?;
    let stored_digest = read_metadata(dir, DIGEST_FILENAME)?;

    let manifest_value: serde_json::Value = serde_json::from_slice(&manifest).map_err(|e| {
        BundleDirReadError::ManifestParseError {
            detail: e.to_string(),
        }
    })?;

    let version = manifest_value["schema_version"].as_str().unwrap_or_default();
    if version != "bundle.v1" {
        return Err(BundleDirReadError::ManifestVersionMismatch {
            found: version.to_string(),
        });
    }

    let entries = manifest_value["artifacts"].as_array().ok_or_else(|| {
        BundleDirReadError::ManifestParseError {
            detail: "\"artifacts\" is not an array".into(),
        }
    })?;

    let mut artifacts = BTreeMap::new();
    for entry in entries {
        let artifact = read_declared_artifact(dir, entry)?;
        artifacts.insert(artifact.name.clone(), artifact);
    }

    for filename in list_files(dir)? {
        let reserved = RESERVED_FILENAMES.contains(&filename.as_str());
        if !reserved && !artifacts.contains_key(&filename) {
            return Err(BundleDirReadError::ExtraFile { name: filename });
        }
    }

    let recomputed = canonical_hash(DOMAIN_BUNDLE_DIGEST, &digest_basis);
    let stored = String::from_utf8_lossy(&stored_digest).trim().to_string();
    if recomputed.as_str() != stored {
        return Err(BundleDirReadError::DigestMismatch {
            stored,
            recomputed: recomputed.as_str().to_string(),
        });
    }

    Ok(ArtifactBundleV1 {
        artifacts,
        manifest,
        digest_basis,
        digest: recomputed,
    })
}

/// Read `dir` and run [`verify_bundle`] on the result.
///
/// The primary offline verification entry point.
///
/// # Errors
///
/// Returns [`BundleDirVerifyError`] on read failure or integrity mismatch.
pub fn verify_bundle_dir(dir: &Path) -> Result<(), BundleDirVerifyError> {
    let bundle = read_bundle_dir(dir).map_err(BundleDirVerifyError::ReadError)?;
    verify_bundle(&bundle).map_err(BundleDirVerifyError::VerifyError)
}

fn read_declared_artifact(
    dir: &Path,
    entry: &serde_json::Value,
) -> Result<BundleArtifact, BundleDirReadError> {
    let invalid = |detail: String| BundleDirReadError::ManifestEntryInvalid { detail };

    let name = entry["name"]
        .as_str()
        .ok_or_else(|| invalid("missing \"name\"".into()))?
        .to_string();
    if !is_safe_artifact_name(&name) {
        return Err(BundleDirReadError::UnsafeArtifactName { name });
    }
    let hash_text = entry["content_hash"]
        .as_str()
        .ok_or_else(|| invalid(format!("missing \"content_hash\" for {name}")))?;
    let content_hash = ContentHash::parse(hash_text)
        .ok_or_else(|| invalid(format!("malformed content_hash for {name}: {hash_text}")))?;
    let normative = entry["normative"]
        .as_bool()
        .ok_or_else(|| invalid(format!("missing \"normative\" for {name}")))?;

    let content = std::fs::read(dir.join(&name))
        .map_err(|_| BundleDirReadError::MissingArtifact { name: name.clone() })?;

    Ok(BundleArtifact {
        name,
        content,
        content_hash,
        normative,
    })
}

/// A plain file name: non-empty, no separators, not `.`/`..`, not hidden,
/// and not one of the reserved metadata names.
fn is_safe_artifact_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && !name.contains(['/', '\\'])
        && !RESERVED_FILENAMES.contains(&name)
}

fn write_atomic(dir: &Path, filename: &str, content: &[u8]) -> Result<(), BundleDirWriteError> {
    let final_path = dir.join(filename);
    let temp_path = dir.join(format!("{TEMP_PREFIX}{filename}"));

    std::fs::write(&temp_path, content).map_err(|e| BundleDirWriteError::Io {
        detail: format!("write {}: {e}", temp_path.display()),
    })?;
    std::fs::rename(&temp_path, &final_path).map_err(|e| BundleDirWriteError::Io {
        detail: format!("rename into {}: {e}", final_path.display()),
    })
}

fn read_metadata(dir: &Path, filename: &str) -> Result<Vec<u8>, BundleDirReadError> {
    std::fs::read(dir.join(filename)).map_err(|_| BundleDirReadError::MissingMetadata {
        filename: filename.to_string(),
    })
}

/// Regular file names in `dir`, excluding in-flight temp files.
fn list_files(dir: &Path) -> Result<BTreeSet<String>, BundleDirReadError> {
    let io = |what: &str, e: std::io::Error| BundleDirReadError::Io {
        detail: format!("{what}: {e}"),
    };

    let mut files = BTreeSet::new();
    for entry in std::fs::read_dir(dir).map_err(|e| io("read_dir", e))? {
        let entry = entry.map_err(|e| io("dir entry", e))?;
        if !entry.file_type().map_err(|e| io("file_type", e))?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) if !name.starts_with(TEMP_PREFIX) => {
                files.insert(name);
            }
            Ok(_) => {}
            Err(raw) => {
                return Err(BundleDirReadError::ExtraFile {
                    name: raw.to_string_lossy().into_owned(),
                })
            }
        }
    }
    Ok(files)
}
