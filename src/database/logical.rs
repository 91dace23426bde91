//! Logical databases and the set of opened connections

use crate::database::core::DatabaseConn;
use crate::error::AdminError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// One of the independently versioned database roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogicalDatabase {
    /// Replica catalog, only present when the JDBCRC catalog is configured
    Catalogs,
    /// Master (dashboard) database
    Master,
    /// Per-workflow monitoring database
    Workflow,
}

impl LogicalDatabase {
    /// All logical databases, in processing order
    pub const ALL: [LogicalDatabase; 3] = [
        LogicalDatabase::Catalogs,
        LogicalDatabase::Master,
        LogicalDatabase::Workflow,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            LogicalDatabase::Catalogs => "CATALOGS",
            LogicalDatabase::Master => "MASTER",
            LogicalDatabase::Workflow => "WORKFLOW",
        }
    }

    /// Directory name used for this database inside a version step directory
    pub fn dir_name(&self) -> &'static str {
        match self {
            LogicalDatabase::Catalogs => "catalogs",
            LogicalDatabase::Master => "master",
            LogicalDatabase::Workflow => "workflow",
        }
    }
}

impl fmt::Display for LogicalDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for LogicalDatabase {
    type Err = AdminError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "CATALOGS" => Ok(LogicalDatabase::Catalogs),
            "MASTER" => Ok(LogicalDatabase::Master),
            "WORKFLOW" => Ok(LogicalDatabase::Workflow),
            _ => Err(AdminError::UnknownDatabase(s.to_string())),
        }
    }
}

/// Opened connections, at most one per logical database
///
/// A missing entry means the database is not configured for this deployment.
#[derive(Default)]
pub struct Connections {
    catalogs: Option<DatabaseConn>,
    master: Option<DatabaseConn>,
    workflow: Option<DatabaseConn>,
}

impl Connections {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter, mostly useful in tests
    pub fn with(mut self, database: LogicalDatabase, conn: DatabaseConn) -> Self {
        self.set(database, Some(conn));
        self
    }

    pub fn set(&mut self, database: LogicalDatabase, conn: Option<DatabaseConn>) {
        match database {
            LogicalDatabase::Catalogs => self.catalogs = conn,
            LogicalDatabase::Master => self.master = conn,
            LogicalDatabase::Workflow => self.workflow = conn,
        }
    }

    pub fn get(&self, database: LogicalDatabase) -> Option<&DatabaseConn> {
        match database {
            LogicalDatabase::Catalogs => self.catalogs.as_ref(),
            LogicalDatabase::Master => self.master.as_ref(),
            LogicalDatabase::Workflow => self.workflow.as_ref(),
        }
    }

    pub fn is_configured(&self, database: LogicalDatabase) -> bool {
        self.get(database).is_some()
    }

    /// Configured databases in processing order
    pub fn configured(&self) -> Vec<LogicalDatabase> {
        LogicalDatabase::ALL
            .into_iter()
            .filter(|db| self.is_configured(*db))
            .collect()
    }
}
