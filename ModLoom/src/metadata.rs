//! Per-mod metadata records
//!
//! [`ModMetadata`] is the one mutable object the resolver pipeline works
//! on: it carries the discovery result for a single mod folder and the
//! mod's load state as validation and dependency resolution examine it.
//! State only moves from `Found` to `Failed`, never back.

use std::path::PathBuf;

use tracing::debug;

use crate::compat::ModDataRecord;
use crate::manifest::Manifest;
use crate::scan::ScanEntry;

/// Load state of a mod record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModState {
    /// The mod is still eligible for loading.
    Found,
    /// The mod cannot be loaded; [`ModMetadata::error`] says why.
    Failed,
}

/// The resolver's per-mod state: discovery result, load state, failure
/// reason, and the dependencies resolved for it.
#[derive(Debug)]
pub struct ModMetadata {
    /// Folder the mod was discovered in.
    pub directory_path: PathBuf,
    /// Name used in diagnostics: the manifest name, or the folder name when
    /// no manifest could be parsed.
    pub display_name: String,
    /// Parsed manifest; `None` when parsing failed.
    pub manifest: Option<Manifest>,
    /// Matching compatibility record, if any.
    pub data_record: Option<ModDataRecord>,
    status: ModState,
    error: Option<String>,
    update_key: Option<String>,
    dependencies: Vec<String>,
}

impl ModMetadata {
    /// Build a record from a scan entry.
    ///
    /// The record starts `Found` when the entry carries a manifest and
    /// `Failed` (with the entry's error message) otherwise.
    #[must_use]
    pub fn from_scan_entry(entry: ScanEntry, data_record: Option<ModDataRecord>) -> Self {
        let folder_name = entry
            .directory_path
            .file_name()
            .map_or_else(|| entry.directory_path.display().to_string(), |name| {
                name.to_string_lossy().into_owned()
            });
        let display_name = entry
            .manifest
            .as_ref()
            .map(|manifest| manifest.name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or(folder_name);

        let (status, error) = match (&entry.manifest, &entry.error) {
            (Some(_), _) => (ModState::Found, None),
            (None, Some(err)) => (ModState::Failed, Some(err.to_string())),
            (None, None) => (ModState::Failed, Some("no manifest found".to_string())),
        };

        Self {
            directory_path: entry.directory_path,
            display_name,
            manifest: entry.manifest,
            data_record,
            status,
            error,
            update_key: None,
            dependencies: Vec::new(),
        }
    }

    /// Current load state.
    #[must_use]
    pub fn status(&self) -> ModState {
        self.status
    }

    /// Whether the record is still eligible for loading.
    #[must_use]
    pub fn is_found(&self) -> bool {
        self.status == ModState::Found
    }

    /// Whether the record has failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.status == ModState::Failed
    }

    /// Failure reason; `None` while the record is `Found`.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Mark the record `Failed`.
    ///
    /// The first failure wins: once failed, later calls keep the original
    /// message and the dropped one is only logged.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug_assert!(!message.is_empty(), "failure messages must be non-empty");

        if self.status == ModState::Failed {
            if self.error.as_deref() != Some(message.as_str()) {
                debug!(
                    mod_name = %self.display_name,
                    dropped = %message,
                    "record already failed; keeping the first error"
                );
            }
            return;
        }

        self.status = ModState::Failed;
        self.error = Some(message);
    }

    /// Case-insensitive match against the manifest's unique ID.
    ///
    /// Always false when no manifest was parsed.
    #[must_use]
    pub fn has_id(&self, unique_id: &str) -> bool {
        self.manifest
            .as_ref()
            .is_some_and(|manifest| manifest.unique_id.eq_ignore_ascii_case(unique_id))
    }

    /// Unique ID in its source casing, when a manifest is present.
    #[must_use]
    pub fn unique_id(&self) -> Option<&str> {
        self.manifest.as_ref().map(|manifest| manifest.unique_id.as_str())
    }

    /// Record the update key used to build an update URL for this mod.
    pub fn set_update_key(&mut self, key: impl Into<String>) {
        self.update_key = Some(key.into());
    }

    /// The last-set update key, if any.
    #[must_use]
    pub fn update_key(&self) -> Option<&str> {
        self.update_key.as_deref()
    }

    /// Unique IDs of the resolved dependencies, in manifest order.
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub(crate) fn add_dependency(&mut self, unique_id: impl Into<String>) {
        self.dependencies.push(unique_id.into());
    }
}
