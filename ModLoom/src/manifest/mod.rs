//! Typed mod manifests
//!
//! A manifest is the `manifest.json` document that introduces a mod to the
//! resolver: identity, version, entry point, and dependency declarations.
//! Unknown top-level keys survive parsing verbatim in
//! [`Manifest::extra_fields`].

pub mod parser;

pub use parser::{ManifestParser, MANIFEST_FILE_NAME};

use serde_json::{Map, Value};

use crate::version::SemanticVersion;

/// A dependency declared in a mod manifest.
#[derive(Debug, Clone)]
pub struct ManifestDependency {
    /// Unique ID of the mod this entry depends on.
    pub unique_id: String,
    /// Lowest acceptable version of the dependency, if any.
    pub minimum_version: Option<SemanticVersion>,
    /// Whether the mod refuses to load without this dependency.
    pub is_required: bool,
}

/// The target mod a content pack provides content for.
#[derive(Debug, Clone)]
pub struct ContentPackFor {
    /// Unique ID of the consuming mod.
    pub unique_id: String,
}

/// How a mod plugs into the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestKind<'a> {
    /// A code mod whose entry DLL is loaded by the host.
    CodeMod {
        /// File name of the entry DLL, relative to the mod folder.
        entry_dll: &'a str,
    },
    /// A content pack targeting another mod by unique ID.
    ContentPack {
        /// Unique ID of the mod that consumes this pack.
        for_id: &'a str,
    },
}

/// A parsed mod manifest.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// Mod name shown to players.
    pub name: String,
    /// Mod author.
    pub author: String,
    /// One-line mod description.
    pub description: String,
    /// The mod's unique ID, compared case-insensitively everywhere.
    pub unique_id: String,
    /// The mod's own version.
    pub version: SemanticVersion,
    /// Entry DLL file name for code mods.
    pub entry_dll: Option<String>,
    /// Lowest host API version the mod works with.
    pub minimum_api_version: Option<SemanticVersion>,
    /// Declared dependencies, in manifest order.
    pub dependencies: Vec<ManifestDependency>,
    /// Set when the mod is a content pack rather than a code mod.
    pub content_pack_for: Option<ContentPackFor>,
    /// Update keys (`provider:id`) used to build update URLs.
    pub update_keys: Vec<String>,
    /// Top-level document keys not consumed by a recognized field, verbatim.
    pub extra_fields: Map<String, Value>,
}

impl Manifest {
    /// Classify the mod as a code mod or a content pack.
    ///
    /// A manifest with `ContentPackFor` is a content pack regardless of any
    /// entry DLL it also declares; validation rejects that combination.
    #[must_use]
    pub fn kind(&self) -> ManifestKind<'_> {
        match &self.content_pack_for {
            Some(pack) => ManifestKind::ContentPack {
                for_id: &pack.unique_id,
            },
            None => ManifestKind::CodeMod {
                entry_dll: self.entry_dll.as_deref().unwrap_or_default(),
            },
        }
    }

    /// Whether the mod is a content pack.
    #[must_use]
    pub fn is_content_pack(&self) -> bool {
        self.content_pack_for.is_some()
    }
}
