//! Error types for database administration
//!
//! The variants follow the lifecycle of a migration: release resolution
//! (`UnknownRelease`), version bookkeeping (`NoVersionRecord`), step lookup
//! (`UnsupportedVersion`) and step execution (`Migration`). The remaining
//! variants cover connection setup and storage failures.

use crate::database::LogicalDatabase;
use std::fmt;
use thiserror::Error;

/// Convenience alias used throughout the library
pub type Result<T> = std::result::Result<T, AdminError>;

/// Direction of a version step
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Upgrade,
    Downgrade,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Upgrade => write!(f, "upgrade"),
            Direction::Downgrade => write!(f, "downgrade"),
        }
    }
}

#[derive(Debug, Error)]
pub enum AdminError {
    /// The release identifier is not in the compatibility table
    #[error("Version does not exist: {0}")]
    UnknownRelease(String),

    /// The database has no version record yet; callers turn this into discovery
    #[error("no version record found in {0} database")]
    NoVersionRecord(LogicalDatabase),

    /// No version step is registered for the requested schema version
    #[error("no version step registered for schema version {version} ({database})")]
    UnsupportedVersion {
        version: u32,
        database: LogicalDatabase,
    },

    /// A version step failed while changing the schema
    #[error("{direction} of {database} database for schema version {version} failed: {reason}")]
    Migration {
        version: u32,
        database: LogicalDatabase,
        direction: Direction,
        reason: String,
    },

    /// A probe or guard script returned something other than a number
    #[error("expected a number in the first column of the script result, got {0}")]
    NonNumericResult(String),

    #[error("unknown database name '{0}', expected one of CATALOGS, MASTER, WORKFLOW")]
    UnknownDatabase(String),

    #[error("invalid database url '{0}'")]
    InvalidUrl(String),

    #[error("database driver '{0}' is not supported by this build")]
    UnsupportedDriver(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl AdminError {
    /// Build a `Migration` error for a step
    pub fn migration(
        version: u32,
        database: LogicalDatabase,
        direction: Direction,
        reason: impl Into<String>,
    ) -> Self {
        AdminError::Migration {
            version,
            database,
            direction,
            reason: reason.into(),
        }
    }
}
