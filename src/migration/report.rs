//! Results of version queries and migration walks

use crate::database::LogicalDatabase;
use crate::error::{AdminError, Direction, Result};
use serde::{Serialize, Serializer};
use std::fmt;

/// Current version of one database as reported by `current_version`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CurrentVersion {
    /// The database is not configured for this deployment
    NotConfigured,
    /// Schema version number
    Version(u32),
    /// Release identifier mapped from the schema version
    Release(String),
    /// The version could not be determined
    Error { error: String },
}

impl fmt::Display for CurrentVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurrentVersion::NotConfigured => write!(f, "-"),
            CurrentVersion::Version(v) => write!(f, "{}", v),
            CurrentVersion::Release(r) => write!(f, "{}", r),
            CurrentVersion::Error { error } => write!(f, "error: {}", error),
        }
    }
}

/// Outcome of walking one database towards the target version
#[derive(Debug, Serialize)]
pub struct DatabaseMigration {
    pub database: LogicalDatabase,
    /// Version before the walk; `None` if it could not be determined
    pub from_version: Option<u32>,
    /// Last recorded version after the walk
    pub to_version: Option<u32>,
    pub target_version: u32,
    /// Versions whose step was applied and recorded, in walk order
    pub steps: Vec<u32>,
    #[serde(serialize_with = "serialize_error")]
    pub error: Option<AdminError>,
}

impl DatabaseMigration {
    pub(crate) fn new(database: LogicalDatabase, target_version: u32) -> Self {
        Self {
            database,
            from_version: None,
            to_version: None,
            target_version,
            steps: Vec::new(),
            error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// Outcome of an update or downgrade across databases
#[derive(Debug, Serialize)]
pub struct MigrationReport {
    pub direction: Direction,
    pub target_version: u32,
    pub databases: Vec<DatabaseMigration>,
}

impl MigrationReport {
    pub fn is_success(&self) -> bool {
        self.databases.iter().all(DatabaseMigration::is_success)
    }

    pub fn failures(&self) -> impl Iterator<Item = &DatabaseMigration> {
        self.databases.iter().filter(|db| !db.is_success())
    }

    /// Number of steps applied over all databases
    pub fn steps_applied(&self) -> usize {
        self.databases.iter().map(|db| db.steps.len()).sum()
    }

    pub fn database(&self, database: LogicalDatabase) -> Option<&DatabaseMigration> {
        self.databases.iter().find(|db| db.database == database)
    }

    /// Turn the first failure into an error
    pub fn into_result(mut self) -> Result<Self> {
        match self.databases.iter_mut().find_map(|db| db.error.take()) {
            Some(err) => Err(err),
            None => Ok(self),
        }
    }
}

fn serialize_error<S>(
    error: &Option<AdminError>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match error {
        Some(e) => serializer.serialize_some(&e.to_string()),
        None => serializer.serialize_none(),
    }
}
