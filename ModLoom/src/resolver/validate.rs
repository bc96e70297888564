//! Per-mod validation
//!
//! Checks every `Found` record against the host: compatibility overrides,
//! the host API floor, the entry DLL on disk, and unique-ID collisions.
//! Failures are recorded in place; records that were already `Failed` on
//! entry are not examined beyond their status.

use std::collections::HashMap;
use std::path::{Component, Path};

use tracing::debug;

use crate::compat::RecordStatus;
use crate::manifest::ManifestKind;
use crate::metadata::ModMetadata;
use crate::version::SemanticVersion;

/// Validate records in place against the host.
///
/// `api_version` is the host's own version; `get_update_url` resolves an
/// update key (`provider:id`) to a download page, and is consulted when a
/// broken mod has no replacement URL in its compatibility record.
pub fn validate_manifests<F>(
    records: &mut [ModMetadata],
    api_version: &SemanticVersion,
    get_update_url: F,
) where
    F: Fn(&str) -> Option<String>,
{
    for record in records.iter_mut() {
        if record.is_failed() {
            continue;
        }
        if let Some(failure) = check_record(record, api_version, &get_update_url) {
            debug!(mod_name = %record.display_name, reason = %failure.message, "failed validation");
            if let Some(key) = failure.update_key {
                record.set_update_key(key);
            }
            record.fail(failure.message);
        }
    }

    fail_duplicate_ids(records);
}

struct Failure {
    message: String,
    update_key: Option<String>,
}

impl Failure {
    fn new(message: String) -> Self {
        Self {
            message,
            update_key: None,
        }
    }
}

fn check_record<F>(
    record: &ModMetadata,
    api_version: &SemanticVersion,
    get_update_url: &F,
) -> Option<Failure>
where
    F: Fn(&str) -> Option<String>,
{
    let manifest = record.manifest.as_ref()?;

    // Compatibility overrides win over everything else.
    if let Some(data) = &record.data_record {
        let status_label = match data.status {
            RecordStatus::AssumedOk => None,
            RecordStatus::AssumeBroken => Some("assumed broken"),
            RecordStatus::Obsolete => Some("obsolete"),
        };
        if let Some(label) = status_label {
            let mut update_key = None;
            let mut url = data.alternative_url.clone();
            if url.is_none() {
                for key in &manifest.update_keys {
                    if let Some(found) = get_update_url(key) {
                        url = Some(found);
                        update_key = Some(key.clone());
                        break;
                    }
                }
            }

            let message = match url {
                Some(url) => format!(
                    "broken: version {} is marked {label} in the compatibility list; \
                     check for a newer version at {url}",
                    manifest.version
                ),
                None => format!(
                    "broken: version {} is marked {label} in the compatibility list",
                    manifest.version
                ),
            };
            return Some(Failure {
                message,
                update_key,
            });
        }
    }

    // Host API floor.
    if let Some(minimum) = &manifest.minimum_api_version
        && minimum > api_version
    {
        return Some(Failure::new(format!(
            "needs newer SMAPI version: requires SMAPI {minimum} or later (found {api_version})"
        )));
    }

    // Entry DLL: code mods need it on disk, content packs must not have one.
    match manifest.kind() {
        ManifestKind::CodeMod { entry_dll } => {
            if !is_safe_relative_path(entry_dll) {
                return Some(Failure::new(format!(
                    "missing DLL: entry path '{entry_dll}' must be a plain file name inside the mod folder"
                )));
            }
            if !record.directory_path.join(entry_dll).is_file() {
                return Some(Failure::new(format!(
                    "missing DLL: '{entry_dll}' does not exist in the mod folder"
                )));
            }
        }
        ManifestKind::ContentPack { for_id } => {
            if manifest.entry_dll.is_some() {
                return Some(Failure::new(format!(
                    "content pack for {for_id} must not set an entry DLL"
                )));
            }
        }
    }

    None
}

/// An entry path may not escape the mod folder.
fn is_safe_relative_path(raw: &str) -> bool {
    let path = Path::new(raw);
    !raw.is_empty()
        && path.is_relative()
        && path.components().all(|part| matches!(part, Component::Normal(_)))
}

/// Fail every member of any unique-ID collision group.
fn fail_duplicate_ids(records: &mut [ModMetadata]) {
    let mut by_id: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, record) in records.iter().enumerate() {
        if record.is_failed() {
            continue;
        }
        if let Some(unique_id) = record.unique_id() {
            by_id
                .entry(unique_id.to_ascii_lowercase())
                .or_default()
                .push(index);
        }
    }

    let mut groups: Vec<Vec<usize>> = by_id
        .into_values()
        .filter(|group| group.len() > 1)
        .collect();
    groups.sort();

    for group in groups {
        let unique_id = records[group[0]].unique_id().unwrap_or_default().to_string();
        let folders = group
            .iter()
            .map(|&index| folder_label(&records[index]))
            .collect::<Vec<_>>()
            .join(", ");
        debug!(%unique_id, %folders, "duplicate unique ID");
        for &index in &group {
            records[index].fail(format!(
                "duplicate unique ID: '{unique_id}' is declared by multiple mod folders ({folders})"
            ));
        }
    }
}

fn folder_label(record: &ModMetadata) -> String {
    record
        .directory_path
        .file_name()
        .map_or_else(|| record.directory_path.display().to_string(), |name| {
            name.to_string_lossy().into_owned()
        })
}
