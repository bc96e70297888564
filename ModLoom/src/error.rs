//! Error types for `ModLoom`

use thiserror::Error;

/// The error type for `ModLoom` operations.
///
/// Inside the resolver pipeline these never escape as control flow: parse
/// failures are recorded as strings on the owning
/// [`ModMetadata`](crate::metadata::ModMetadata) record instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Version Errors ====================
    /// A version string could not be parsed.
    #[error("invalid semantic version: '{raw}'")]
    InvalidVersion {
        /// The offending input.
        raw: String,
    },

    // ==================== Manifest Errors ====================
    /// The folder contains no recognized manifest file.
    #[error("no manifest found")]
    ManifestMissing,

    /// The manifest file does not decode as a mapping of string keys.
    #[error("manifest is malformed: {message}")]
    ManifestMalformed {
        /// What the decoder rejected.
        message: String,
    },

    /// A required manifest field is missing or empty.
    #[error("manifest is missing required field '{field}'")]
    ManifestIncomplete {
        /// Canonical name of the missing field.
        field: String,
    },

    /// A manifest version field failed to parse.
    #[error("manifest field '{field}' has invalid version '{raw}'")]
    ManifestBadVersion {
        /// Canonical name of the field.
        field: String,
        /// The offending input.
        raw: String,
    },

    // ==================== Parsing Errors ====================
    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for `ModLoom` operations.
pub type Result<T> = std::result::Result<T, Error>;
