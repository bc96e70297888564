//! Manifest parsing from mod folders

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{Error, Result};
use crate::version::SemanticVersion;

use super::{ContentPackFor, Manifest, ManifestDependency};

/// File name the parser recognizes inside a mod folder.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Parses `manifest.json` documents into typed [`Manifest`] values.
///
/// The parser holds no state between calls; one instance can be shared
/// across an entire scan.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManifestParser;

impl ManifestParser {
    /// Create a manifest parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse the manifest contained in a mod folder.
    ///
    /// Reads the single manifest document and nothing else.
    ///
    /// # Errors
    /// [`Error::ManifestMissing`] when the folder has no manifest file,
    /// [`Error::ManifestMalformed`] when the document is not a JSON object,
    /// [`Error::ManifestIncomplete`] when a required field is missing or
    /// empty, and [`Error::ManifestBadVersion`] when a version field does
    /// not parse.
    pub fn parse_folder(&self, dir: &Path) -> Result<Manifest> {
        let Some(path) = self.find_manifest_file(dir) else {
            return Err(Error::ManifestMissing);
        };
        trace!(path = %path.display(), "reading manifest");
        let raw = fs::read_to_string(&path)?;
        self.parse_document(&raw)
    }

    /// Locate the manifest file within a folder.
    ///
    /// Checks the exact file name first, then falls back to a
    /// case-insensitive match over the folder's entries.
    #[must_use]
    pub fn find_manifest_file(&self, dir: &Path) -> Option<PathBuf> {
        let exact = dir.join(MANIFEST_FILE_NAME);
        if exact.is_file() {
            return Some(exact);
        }

        let entries = fs::read_dir(dir).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            let matches = path
                .file_name()
                .is_some_and(|name| name.to_string_lossy().eq_ignore_ascii_case(MANIFEST_FILE_NAME));
            if matches && path.is_file() {
                return Some(path);
            }
        }
        None
    }

    /// Parse a raw manifest document.
    ///
    /// The document must be a JSON object. Recognized fields are matched
    /// case-insensitively in a single pass; every other top-level key is
    /// preserved verbatim in [`Manifest::extra_fields`].
    ///
    /// # Errors
    /// Same as [`ManifestParser::parse_folder`], minus `ManifestMissing`.
    pub fn parse_document(&self, raw: &str) -> Result<Manifest> {
        let value: Value = serde_json::from_str(raw).map_err(|err| Error::ManifestMalformed {
            message: err.to_string(),
        })?;
        let Value::Object(document) = value else {
            return Err(Error::ManifestMalformed {
                message: "top-level value is not an object".to_string(),
            });
        };

        let mut name = String::new();
        let mut author = String::new();
        let mut description = String::new();
        let mut unique_id = String::new();
        let mut version_raw: Option<String> = None;
        let mut entry_dll: Option<String> = None;
        let mut api_version_raw: Option<String> = None;
        let mut dependencies = Vec::new();
        let mut content_pack_for = None;
        let mut update_keys = Vec::new();
        let mut extra_fields = Map::new();

        for (key, value) in document {
            match key.to_ascii_lowercase().as_str() {
                "name" => name = scalar_string(&value).unwrap_or_default(),
                "author" => author = scalar_string(&value).unwrap_or_default(),
                "description" => description = scalar_string(&value).unwrap_or_default(),
                "uniqueid" => unique_id = scalar_string(&value).unwrap_or_default(),
                "version" => version_raw = scalar_string(&value).filter(|raw| !raw.is_empty()),
                "entrydll" => entry_dll = scalar_string(&value).filter(|raw| !raw.is_empty()),
                "minimumapiversion" => {
                    api_version_raw = scalar_string(&value).filter(|raw| !raw.is_empty());
                }
                "dependencies" => dependencies = parse_dependencies(&value)?,
                "contentpackfor" => content_pack_for = parse_content_pack(&value)?,
                "updatekeys" => update_keys = string_array(&value),
                _ => {
                    extra_fields.insert(key, value);
                }
            }
        }

        if name.is_empty() {
            return Err(incomplete("Name"));
        }
        if unique_id.is_empty() {
            return Err(incomplete("UniqueID"));
        }
        let Some(version_raw) = version_raw else {
            return Err(incomplete("Version"));
        };
        if entry_dll.is_none() && content_pack_for.is_none() {
            return Err(incomplete("EntryDll"));
        }

        let version = parse_version_field("Version", &version_raw)?;
        let minimum_api_version = match api_version_raw {
            Some(raw) => Some(parse_version_field("MinimumApiVersion", &raw)?),
            None => None,
        };

        Ok(Manifest {
            name,
            author,
            description,
            unique_id,
            version,
            entry_dll,
            minimum_api_version,
            dependencies,
            content_pack_for,
            update_keys,
            extra_fields,
        })
    }
}

fn incomplete(field: &str) -> Error {
    Error::ManifestIncomplete {
        field: field.to_string(),
    }
}

fn parse_version_field(field: &str, raw: &str) -> Result<SemanticVersion> {
    SemanticVersion::parse(raw).map_err(|_| Error::ManifestBadVersion {
        field: field.to_string(),
        raw: raw.to_string(),
    })
}

/// Read a JSON scalar as a trimmed string. Arrays, objects, and null yield
/// `None` so required-field checks treat them as absent.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => Some(raw.trim().to_string()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn string_array(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .filter_map(scalar_string)
            .filter(|raw| !raw.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn parse_dependencies(value: &Value) -> Result<Vec<ManifestDependency>> {
    let Value::Array(items) = value else {
        return Err(Error::ManifestMalformed {
            message: "Dependencies must be a list".to_string(),
        });
    };

    let mut dependencies = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(entry) = item else {
            return Err(Error::ManifestMalformed {
                message: "Dependencies entries must be objects".to_string(),
            });
        };

        let mut unique_id = String::new();
        let mut minimum_version_raw: Option<String> = None;
        let mut is_required = true;
        for (key, value) in entry {
            match key.to_ascii_lowercase().as_str() {
                "uniqueid" => unique_id = scalar_string(value).unwrap_or_default(),
                "minimumversion" => {
                    minimum_version_raw = scalar_string(value).filter(|raw| !raw.is_empty());
                }
                "isrequired" => {
                    if let Value::Bool(flag) = value {
                        is_required = *flag;
                    }
                }
                _ => {}
            }
        }

        if unique_id.is_empty() {
            return Err(incomplete("Dependencies.UniqueID"));
        }
        let minimum_version = match minimum_version_raw {
            Some(raw) => Some(parse_version_field("Dependencies.MinimumVersion", &raw)?),
            None => None,
        };

        dependencies.push(ManifestDependency {
            unique_id,
            minimum_version,
            is_required,
        });
    }
    Ok(dependencies)
}

fn parse_content_pack(value: &Value) -> Result<Option<ContentPackFor>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(entry) => {
            let unique_id = entry
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("uniqueid"))
                .and_then(|(_, value)| scalar_string(value))
                .unwrap_or_default();
            if unique_id.is_empty() {
                return Err(incomplete("ContentPackFor.UniqueID"));
            }
            Ok(Some(ContentPackFor { unique_id }))
        }
        _ => Err(Error::ManifestMalformed {
            message: "ContentPackFor must be an object".to_string(),
        }),
    }
}
