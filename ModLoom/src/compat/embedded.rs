//! Embedded compatibility database
//!
//! Provides access to the compatibility records that ship with the host,
//! compiled into the binary so no file I/O is required at runtime.

use std::sync::OnceLock;

use super::CompatibilityDatabase;

/// Embedded compatibility database JSON
const EMBEDDED_DB_JSON: &str = include_str!("../../data/compat-db.json");

/// Load the embedded compatibility database.
///
/// # Panics
/// Panics if the embedded JSON is malformed. This would indicate a
/// build-time error and should never occur in a properly built binary.
#[must_use]
pub fn embedded_database() -> CompatibilityDatabase {
    CompatibilityDatabase::from_json_str(EMBEDDED_DB_JSON)
        .expect("Embedded compatibility database JSON should be valid")
}

/// Load the embedded compatibility database (cached version)
///
/// Same as [`embedded_database`] but only parses the JSON once. Subsequent
/// calls return a reference to the cached database.
pub fn embedded_database_cached() -> &'static CompatibilityDatabase {
    static DB: OnceLock<CompatibilityDatabase> = OnceLock::new();
    DB.get_or_init(embedded_database)
}
