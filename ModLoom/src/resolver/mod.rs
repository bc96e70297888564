//! The resolver pipeline
//!
//! Three stages, chained by the caller:
//!
//! 1. [`read_manifests`] discovers candidate folders and parses each
//!    manifest, wrapping every result in a [`ModMetadata`] record.
//! 2. [`validate_manifests`] fails records that can't load against this
//!    host (compatibility overrides, API floor, entry DLL, duplicate ids).
//! 3. [`process_dependencies`] resolves dependency references and returns
//!    the records in load order, dependencies first.
//!
//! No stage raises; every problem ends up as a `Failed` record with a
//! diagnostic string, and the caller always gets all records back.

pub mod dependencies;
pub mod validate;

pub use dependencies::process_dependencies;
pub use validate::validate_manifests;

use std::path::Path;

use tracing::info;

use crate::compat::CompatibilityDatabase;
use crate::manifest::ManifestParser;
use crate::metadata::ModMetadata;
use crate::scan::scan_mod_folders;

/// Discover and parse every mod folder under `root`.
///
/// Each scan entry becomes one record, `Found` when its manifest parsed and
/// `Failed` otherwise, with the matching compatibility record attached.
/// Never fails in aggregate: a missing or unreadable root yields an empty
/// list.
#[must_use]
pub fn read_manifests(
    root: &Path,
    parser: &ManifestParser,
    db: &CompatibilityDatabase,
) -> Vec<ModMetadata> {
    let entries = scan_mod_folders(root, parser);
    let mut records = Vec::with_capacity(entries.len());
    for entry in entries {
        let data_record = entry
            .manifest
            .as_ref()
            .and_then(|manifest| db.lookup(&manifest.unique_id, &manifest.version))
            .cloned();
        records.push(ModMetadata::from_scan_entry(entry, data_record));
    }

    info!(root = %root.display(), count = records.len(), "read mod manifests");
    records
}
