//! Version history schema and tracking
//!
//! Every logical database store carries a `dbversion` table. Rows are only
//! ever appended; the current version is the `version_number` of the row
//! with the greatest `id`, so a downgrade (which appends a lower number)
//! becomes current just like an upgrade does.

use crate::database::LogicalDatabase;
use crate::error::{AdminError, Result};
use rusqlite::{Connection, OptionalExtension};
use serde::Serialize;
use tracing::debug;

/// Schema definitions for the version history table
pub struct SchemaDefinitions;

impl SchemaDefinitions {
    /// Name of the version history table
    pub const VERSION_TABLE_NAME: &'static str = "dbversion";

    /// SQL for creating the version history table
    pub const VERSION_TABLE: &'static str = r#"
        CREATE TABLE IF NOT EXISTS dbversion (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            version_number INTEGER NOT NULL,
            version_timestamp INTEGER NOT NULL
        );
    "#;
}

/// A persisted version history row
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionRecord {
    pub id: i64,
    pub version_number: u32,
    pub version_timestamp: i64,
}

/// Reads and appends version records for one logical database
pub struct VersionTracker<'a> {
    conn: &'a Connection,
    database: LogicalDatabase,
}

impl<'a> VersionTracker<'a> {
    pub fn new(conn: &'a Connection, database: LogicalDatabase) -> Self {
        Self { conn, database }
    }

    /// Version number of the most recently inserted record
    ///
    /// Fails with [`AdminError::NoVersionRecord`] when the table is missing
    /// or empty; that state is distinct from version 0.
    pub fn current_version(&self) -> Result<u32> {
        self.latest_record()?
            .map(|record| record.version_number)
            .ok_or(AdminError::NoVersionRecord(self.database))
    }

    /// Most recently inserted record, if any
    pub fn latest_record(&self) -> Result<Option<VersionRecord>> {
        if !crate::migration::table_exists(self.conn, SchemaDefinitions::VERSION_TABLE_NAME)? {
            return Ok(None);
        }

        let record = self
            .conn
            .query_row(
                "SELECT id, version_number, version_timestamp FROM dbversion
                 ORDER BY id DESC LIMIT 1",
                [],
                |row| {
                    Ok(VersionRecord {
                        id: row.get(0)?,
                        version_number: row.get(1)?,
                        version_timestamp: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Append a record for `version` and commit it before returning
    pub fn record_version(&self, version: u32) -> Result<()> {
        let timestamp = chrono::Utc::now().timestamp();

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(SchemaDefinitions::VERSION_TABLE, [])?;
        tx.execute(
            "INSERT INTO dbversion (version_number, version_timestamp) VALUES (?1, ?2)",
            rusqlite::params![version, timestamp],
        )?;
        tx.commit()?;

        debug!(
            "recorded schema version {} for {} database",
            version, self.database
        );
        Ok(())
    }

    /// Full version history, oldest first
    pub fn history(&self) -> Result<Vec<VersionRecord>> {
        if !crate::migration::table_exists(self.conn, SchemaDefinitions::VERSION_TABLE_NAME)? {
            return Ok(Vec::new());
        }

        let mut stmt = self.conn.prepare(
            "SELECT id, version_number, version_timestamp FROM dbversion ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(VersionRecord {
                id: row.get(0)?,
                version_number: row.get(1)?,
                version_timestamp: row.get(2)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConn;

    #[test]
    fn test_no_record() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let tracker = VersionTracker::new(&db.conn, LogicalDatabase::Master);

        assert!(matches!(
            tracker.current_version(),
            Err(AdminError::NoVersionRecord(LogicalDatabase::Master))
        ));

        // table present but empty is the same state
        db.execute(SchemaDefinitions::VERSION_TABLE).unwrap();
        assert!(matches!(
            tracker.current_version(),
            Err(AdminError::NoVersionRecord(_))
        ));
    }

    #[test]
    fn test_latest_insert_wins() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let tracker = VersionTracker::new(&db.conn, LogicalDatabase::Workflow);

        tracker.record_version(3).unwrap();
        assert_eq!(tracker.current_version().unwrap(), 3);

        // a downgrade appends a lower number, which becomes current
        tracker.record_version(2).unwrap();
        assert_eq!(tracker.current_version().unwrap(), 2);

        let history = tracker.history().unwrap();
        let versions: Vec<u32> = history.iter().map(|r| r.version_number).collect();
        assert_eq!(versions, vec![3, 2]);
        assert!(history[0].id < history[1].id);
        assert!(history[1].version_timestamp > 0);
    }

    #[test]
    fn test_record_zero_is_a_record() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let tracker = VersionTracker::new(&db.conn, LogicalDatabase::Catalogs);

        tracker.record_version(0).unwrap();
        assert_eq!(tracker.current_version().unwrap(), 0);
    }
}
