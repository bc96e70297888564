//! Semantic versions for mods and the host API

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{Error, Result};

/// A semantic version of the form `MAJOR.MINOR[.PATCH][-PRERELEASE]`.
///
/// A missing patch component defaults to 0, and the prerelease tag is
/// everything after the first `-`. A tagged version sorts below the same
/// numeric version without a tag; two tags compare by ASCII, ignoring
/// capitalization (so `1.2-BETA` equals `1.2-beta`).
#[derive(Debug, Clone, Default)]
pub struct SemanticVersion {
    /// Major version, incremented for breaking changes.
    pub major: u32,
    /// Minor version, incremented for backwards-compatible additions.
    pub minor: u32,
    /// Patch version, incremented for backwards-compatible fixes.
    pub patch: u32,
    /// Prerelease tag without the leading `-`, in its source casing.
    pub prerelease: Option<String>,
}

impl SemanticVersion {
    /// Create a release version with no prerelease tag.
    #[must_use]
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
            prerelease: None,
        }
    }

    /// Parse a version string.
    ///
    /// Accepts `MAJOR.MINOR[.PATCH][-PRERELEASE]`, where the prerelease tag
    /// must be non-empty printable ASCII without whitespace.
    ///
    /// # Errors
    /// Returns [`Error::InvalidVersion`] carrying the offending input.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let invalid = || Error::InvalidVersion {
            raw: raw.to_string(),
        };

        let (numeric, prerelease) = match trimmed.split_once('-') {
            Some((numeric, tag)) => (numeric, Some(tag)),
            None => (trimmed, None),
        };

        if let Some(tag) = prerelease
            && (tag.is_empty() || !tag.chars().all(|c| c.is_ascii_graphic()))
        {
            return Err(invalid());
        }

        let mut components = numeric.split('.');
        let major = parse_component(components.next()).ok_or_else(invalid)?;
        let minor = parse_component(components.next()).ok_or_else(invalid)?;
        let patch = match components.next() {
            Some(part) => parse_component(Some(part)).ok_or_else(invalid)?,
            None => 0,
        };
        if components.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            patch,
            prerelease: prerelease.map(str::to_string),
        })
    }

    /// Whether this version is at least `other`, i.e. not strictly below it.
    #[must_use]
    pub fn is_at_least(&self, other: &Self) -> bool {
        self >= other
    }

    /// Whether this version carries a prerelease tag.
    #[must_use]
    pub fn is_prerelease(&self) -> bool {
        self.prerelease.is_some()
    }
}

fn parse_component(part: Option<&str>) -> Option<u32> {
    let part = part?;
    if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(tag) = &self.prerelease {
            write!(f, "-{tag}")?;
        }
        Ok(())
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.major
            .cmp(&other.major)
            .then(self.minor.cmp(&other.minor))
            .then(self.patch.cmp(&other.patch))
            .then_with(|| match (&self.prerelease, &other.prerelease) {
                (None, None) => Ordering::Equal,
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (Some(a), Some(b)) => a.to_ascii_lowercase().cmp(&b.to_ascii_lowercase()),
            })
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl Hash for SemanticVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.major.hash(state);
        self.minor.hash(state);
        self.patch.hash(state);
        self.prerelease
            .as_ref()
            .map(|tag| tag.to_ascii_lowercase())
            .hash(state);
    }
}

impl Serialize for SemanticVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(D::Error::custom)
    }
}
