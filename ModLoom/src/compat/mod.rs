//! Compatibility database lookups
//!
//! The host bundles a list of known-problematic mods: ids with version
//! ranges, an advice status, and optionally a replacement URL. The database
//! is loaded once and held immutable; the resolver only reads it.

pub mod embedded;

pub use embedded::{embedded_database, embedded_database_cached};

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::Result;
use crate::version::SemanticVersion;

/// Advice status carried by a compatibility record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RecordStatus {
    /// The mod is assumed to work; the record only carries extra metadata.
    AssumedOk,
    /// The covered versions are known to break against the current host.
    AssumeBroken,
    /// The mod's functionality was folded into the host; it should be
    /// removed rather than updated.
    Obsolete,
}

/// A single override record for a mod id.
///
/// A record applies to a mod when the id matches (case-insensitively) and
/// the mod's version falls within the record's inclusive range.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModDataRecord {
    /// Advice status for the covered versions.
    pub status: RecordStatus,
    /// Where players can find a working replacement or update.
    #[serde(default)]
    pub alternative_url: Option<String>,
    /// Lowest covered version, inclusive. Open-ended when absent.
    #[serde(default)]
    pub lower_version: Option<SemanticVersion>,
    /// Highest covered version, inclusive. Open-ended when absent.
    #[serde(default)]
    pub upper_version: Option<SemanticVersion>,
}

impl ModDataRecord {
    /// Whether this record's version range covers `version`.
    #[must_use]
    pub fn applies_to(&self, version: &SemanticVersion) -> bool {
        if let Some(lower) = &self.lower_version
            && version < lower
        {
            return false;
        }
        if let Some(upper) = &self.upper_version
            && version > upper
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Deserialize)]
struct CompatDocument {
    mods: Vec<CompatEntry>,
}

#[derive(Debug, Deserialize)]
struct CompatEntry {
    id: String,
    #[serde(flatten)]
    record: ModDataRecord,
}

/// The host's bundled mapping of known-problematic mod ids to override
/// records.
#[derive(Debug, Clone, Default)]
pub struct CompatibilityDatabase {
    /// Records grouped by lowercased unique ID, in document order.
    records: HashMap<String, Vec<ModDataRecord>>,
}

impl CompatibilityDatabase {
    /// Load a database from a JSON document.
    ///
    /// # Errors
    /// Returns an error when the document does not decode.
    pub fn from_json_str(raw: &str) -> Result<Self> {
        let document: CompatDocument = serde_json::from_str(raw)?;
        let mut records: HashMap<String, Vec<ModDataRecord>> = HashMap::new();
        for entry in document.mods {
            records
                .entry(entry.id.to_ascii_lowercase())
                .or_default()
                .push(entry.record);
        }
        Ok(Self { records })
    }

    /// Load a database from a JSON file on disk.
    ///
    /// # Errors
    /// Returns an error when the file cannot be read or decoded.
    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_json_str(&fs::read_to_string(path)?)
    }

    /// Look up the record applying to a mod id at a specific version.
    ///
    /// Ids match case-insensitively; the first record whose range covers
    /// the version wins. Absent entries yield `None`.
    #[must_use]
    pub fn lookup(&self, unique_id: &str, version: &SemanticVersion) -> Option<&ModDataRecord> {
        self.records
            .get(&unique_id.to_ascii_lowercase())?
            .iter()
            .find(|record| record.applies_to(version))
    }

    /// All records for a mod id regardless of version.
    ///
    /// Used to suggest a download URL for a mod that is not installed, so
    /// no version is available to narrow the match.
    #[must_use]
    pub fn entries_for(&self, unique_id: &str) -> &[ModDataRecord] {
        self.records
            .get(&unique_id.to_ascii_lowercase())
            .map_or(&[], Vec::as_slice)
    }

    /// Number of mod ids with at least one record.
    #[must_use]
    pub fn mod_count(&self) -> usize {
        self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_db() -> CompatibilityDatabase {
        CompatibilityDatabase::from_json_str(
            r#"{
                "mods": [
                    {
                        "id": "Acme.StorageOverhaul",
                        "status": "AssumeBroken",
                        "upperVersion": "1.4.2",
                        "alternativeUrl": "https://example.test/storage"
                    },
                    {
                        "id": "Acme.StorageOverhaul",
                        "status": "AssumedOk",
                        "lowerVersion": "1.5.0"
                    },
                    {
                        "id": "Cobalt.LegacyLoader",
                        "status": "Obsolete"
                    }
                ]
            }"#,
        )
        .unwrap()
    }

    fn version(raw: &str) -> SemanticVersion {
        SemanticVersion::parse(raw).unwrap()
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let db = sample_db();
        let record = db.lookup("ACME.storageoverhaul", &version("1.0.0")).unwrap();
        assert_eq!(record.status, RecordStatus::AssumeBroken);
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let db = sample_db();
        let record = db.lookup("Acme.StorageOverhaul", &version("1.4.2")).unwrap();
        assert_eq!(record.status, RecordStatus::AssumeBroken);

        let record = db.lookup("Acme.StorageOverhaul", &version("1.5.0")).unwrap();
        assert_eq!(record.status, RecordStatus::AssumedOk);
    }

    #[test]
    fn test_version_between_ranges_has_no_record() {
        let db = sample_db();
        assert!(db.lookup("Acme.StorageOverhaul", &version("1.4.3")).is_none());
    }

    #[test]
    fn test_open_ended_record_covers_everything() {
        let db = sample_db();
        assert!(db.lookup("Cobalt.LegacyLoader", &version("0.1.0")).is_some());
        assert!(db.lookup("Cobalt.LegacyLoader", &version("99.0.0")).is_some());
    }

    #[test]
    fn test_unknown_id_yields_none() {
        let db = sample_db();
        assert!(db.lookup("Nobody.Home", &version("1.0.0")).is_none());
        assert!(db.entries_for("Nobody.Home").is_empty());
    }

    #[test]
    fn test_entries_for_ignores_version() {
        let db = sample_db();
        assert_eq!(db.entries_for("acme.storageoverhaul").len(), 2);
    }
}
