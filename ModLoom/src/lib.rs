//! ModLoom - mod discovery, validation, and load-order resolution
//!
//! ModLoom turns a folder of third-party mods into an ordered, validated
//! load plan for a SMAPI-style modding host. The pipeline has three stages,
//! chained by the caller:
//!
//! 1. [`resolver::read_manifests`] scans the mods root and parses each
//!    mod's `manifest.json`.
//! 2. [`resolver::validate_manifests`] fails mods the host can't load:
//!    known-broken versions, unmet API floors, missing entry DLLs, and
//!    duplicate unique IDs.
//! 3. [`resolver::process_dependencies`] resolves dependency references and
//!    returns every record in an order where each mod follows all of its
//!    dependencies.
//!
//! The pipeline is synchronous, single-threaded, and never raises: every
//! problem becomes a `Failed` record with a diagnostic string, and the
//! caller always receives all records.

pub mod compat;
pub mod error;
pub mod manifest;
pub mod metadata;
pub mod resolver;
pub mod scan;
pub mod version;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::compat::{
        embedded_database, CompatibilityDatabase, ModDataRecord, RecordStatus,
    };
    pub use crate::error::{Error, Result};
    pub use crate::manifest::{Manifest, ManifestKind, ManifestParser};
    pub use crate::metadata::{ModMetadata, ModState};
    pub use crate::resolver::{process_dependencies, read_manifests, validate_manifests};
    pub use crate::scan::{scan_mod_folders, ScanEntry};
    pub use crate::version::SemanticVersion;
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
