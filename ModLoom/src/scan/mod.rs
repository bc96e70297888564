//! Mod folder discovery
//!
//! Walks the mods root and emits one entry per candidate mod folder. Each
//! immediate subdirectory of the root is a candidate; when the manifest
//! lives deeper (players often unpack downloads into a wrapper folder), the
//! scan descends a bounded number of levels and substitutes the folder that
//! actually holds the manifest. Sibling folders with their own manifests
//! each become their own entry.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use walkdir::WalkDir;

use crate::error::Error;
use crate::manifest::{Manifest, ManifestParser};

/// How many levels below a candidate folder the scan will look for a
/// manifest before giving up on that candidate.
pub const MAX_SCAN_DEPTH: usize = 4;

/// One candidate mod folder discovered under the mods root.
#[derive(Debug)]
pub struct ScanEntry {
    /// The folder that owns the manifest, or the original candidate when no
    /// manifest was found.
    pub directory_path: PathBuf,
    /// The parsed manifest, when parsing succeeded.
    pub manifest: Option<Manifest>,
    /// Why the folder could not be loaded, when it could not.
    pub error: Option<Error>,
}

/// Discover candidate mod folders under `root`.
///
/// Candidates are visited in lexical order so diagnostics are reproducible.
/// A nonexistent or unreadable root yields the empty vec.
pub fn scan_mod_folders(root: &Path, parser: &ManifestParser) -> Vec<ScanEntry> {
    let Ok(entries) = fs::read_dir(root) else {
        debug!(root = %root.display(), "mods root is missing or unreadable");
        return Vec::new();
    };

    let mut candidates: Vec<PathBuf> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_dir() && !is_hidden(path))
        .collect();
    candidates.sort();

    let mut results = Vec::new();
    for candidate in candidates {
        let manifest_dirs = resolve_candidate(&candidate, parser);
        if manifest_dirs.is_empty() {
            trace!(folder = %candidate.display(), "no manifest found in candidate");
            results.push(ScanEntry {
                directory_path: candidate,
                manifest: None,
                error: Some(Error::ManifestMissing),
            });
            continue;
        }

        for dir in manifest_dirs {
            match parser.parse_folder(&dir) {
                Ok(manifest) => results.push(ScanEntry {
                    directory_path: dir,
                    manifest: Some(manifest),
                    error: None,
                }),
                Err(error) => results.push(ScanEntry {
                    directory_path: dir,
                    manifest: None,
                    error: Some(error),
                }),
            }
        }
    }

    debug!(root = %root.display(), count = results.len(), "scanned mod folders");
    results
}

/// Find the folders that actually hold a manifest for a candidate.
///
/// A candidate with a manifest of its own is final. Otherwise the scan
/// descends up to [`MAX_SCAN_DEPTH`] levels; every subdirectory that
/// directly contains a manifest becomes a result, and nothing below such a
/// folder is visited.
fn resolve_candidate(candidate: &Path, parser: &ManifestParser) -> Vec<PathBuf> {
    if parser.find_manifest_file(candidate).is_some() {
        return vec![candidate.to_path_buf()];
    }

    let mut found = Vec::new();
    let mut walker = WalkDir::new(candidate)
        .min_depth(1)
        .max_depth(MAX_SCAN_DEPTH)
        .sort_by_file_name()
        .into_iter();
    while let Some(entry) = walker.next() {
        let Ok(entry) = entry else { continue };
        if !entry.file_type().is_dir() {
            continue;
        }
        if is_hidden(entry.path()) {
            walker.skip_current_dir();
            continue;
        }
        if parser.find_manifest_file(entry.path()).is_some() {
            found.push(entry.path().to_path_buf());
            walker.skip_current_dir();
        }
    }
    found
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .is_some_and(|name| name.to_string_lossy().starts_with('.'))
}
