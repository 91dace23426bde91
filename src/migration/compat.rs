//! Release identifier to schema version mapping

use crate::error::{AdminError, Result};
use serde::Serialize;

/// Newest schema version this build knows how to reach
pub const CURRENT_DB_VERSION: u32 = 3;

/// Built-in release table, oldest release first
pub const DEFAULT_COMPATIBILITY: &[(&str, u32)] = &[
    ("4.3.0", 1),
    ("4.3.1", 1),
    ("4.3.2", 1),
    ("4.4.0", 2),
    ("4.4.1", 2),
    ("4.4.2", 2),
    ("4.5.0", 3),
];

/// One `(release identifier, schema version)` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityEntry {
    pub release: String,
    pub schema_version: u32,
}

/// Ordered mapping from release identifiers to schema versions
///
/// Several releases may share a schema version (patch releases). Lookups
/// are exact string matches; `4.5` does not match `4.5.0`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityTable {
    entries: Vec<CompatibilityEntry>,
    current: u32,
}

impl Default for CompatibilityTable {
    fn default() -> Self {
        Self::new(DEFAULT_COMPATIBILITY.iter().copied(), CURRENT_DB_VERSION)
    }
}

impl CompatibilityTable {
    /// Create a table from entries in release order
    ///
    /// `current` is the newest schema version and does not need an entry.
    pub fn new<'s>(entries: impl IntoIterator<Item = (&'s str, u32)>, current: u32) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(release, schema_version)| CompatibilityEntry {
                    release: release.to_string(),
                    schema_version,
                })
                .collect(),
            current,
        }
    }

    /// Newest known schema version
    pub fn current_version(&self) -> u32 {
        self.current
    }

    pub fn entries(&self) -> &[CompatibilityEntry] {
        &self.entries
    }

    /// Resolve a release identifier to its schema version
    ///
    /// `None` resolves to the newest known version.
    pub fn resolve(&self, release: Option<&str>) -> Result<u32> {
        match release {
            None => Ok(self.current),
            Some(release) => self
                .entries
                .iter()
                .find(|entry| entry.release == release)
                .map(|entry| entry.schema_version)
                .ok_or_else(|| AdminError::UnknownRelease(release.to_string())),
        }
    }

    /// First release identifier mapping to `version`
    pub fn release_for(&self, version: u32) -> Option<&str> {
        self.entries
            .iter()
            .find(|entry| entry.schema_version == version)
            .map(|entry| entry.release.as_str())
    }
}
