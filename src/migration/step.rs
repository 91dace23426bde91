//! Version step interface and shared helpers
//!
//! A version step owns the schema change for exactly one version: step `N`
//! moves a database from the shape of `N-1` to the shape of `N` and back.
//! Steps are plain trait objects; behavior shared between steps lives in the
//! free functions below instead of a common base type.

use crate::database::LogicalDatabase;
use crate::error::Result;
use rusqlite::Connection;

/// What a step is bound to when it is resolved
#[derive(Clone, Copy)]
pub struct StepContext<'a> {
    pub version: u32,
    pub database: LogicalDatabase,
    pub conn: &'a Connection,
}

/// Migration logic for a single schema version
pub trait VersionStep {
    /// Whether the live schema of the bound database matches this version
    ///
    /// Only consulted while discovering the version of an untracked database.
    fn is_compatible(&self) -> Result<bool>;

    /// Move the bound database from version `N-1` to `N`
    ///
    /// `force` relaxes the step's own safety checks.
    fn apply_upgrade(&self, force: bool) -> Result<()>;

    /// Move the bound database from version `N` to `N-1`
    fn apply_downgrade(&self, force: bool) -> Result<()>;
}

/// Check if a table exists in the database
pub fn table_exists(conn: &Connection, table_name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?1",
        [table_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Check if `table_name` has a column called `column_name`
pub fn column_exists(conn: &Connection, table_name: &str, column_name: &str) -> Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_table_info(?1) WHERE name = ?2",
        [table_name, column_name],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

/// Get the row count for a table
pub fn row_count(conn: &Connection, table_name: &str) -> Result<u64> {
    let query = format!("SELECT COUNT(*) FROM \"{}\"", table_name.replace('"', "\"\""));
    let count: u64 = conn.query_row(&query, [], |row| row.get(0))?;
    Ok(count)
}

/// Run a batch of statements as one committed transaction
pub fn execute_in_transaction(conn: &Connection, sql: &str) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    tx.execute_batch(sql)?;
    tx.commit()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::DatabaseConn;

    #[test]
    fn test_schema_helpers() {
        let db = DatabaseConn::open_in_memory().unwrap();
        execute_in_transaction(
            &db.conn,
            "CREATE TABLE workflow (wf_id INTEGER PRIMARY KEY, wf_uuid TEXT);
             INSERT INTO workflow (wf_uuid) VALUES ('a'), ('b');",
        )
        .unwrap();

        assert!(table_exists(&db.conn, "workflow").unwrap());
        assert!(!table_exists(&db.conn, "job").unwrap());
        assert!(column_exists(&db.conn, "workflow", "wf_uuid").unwrap());
        assert!(!column_exists(&db.conn, "workflow", "db_url").unwrap());
        assert!(!column_exists(&db.conn, "job", "wf_uuid").unwrap());
        assert_eq!(row_count(&db.conn, "workflow").unwrap(), 2);
    }

    #[test]
    fn test_failed_batch_rolls_back() {
        let db = DatabaseConn::open_in_memory().unwrap();
        let result = execute_in_transaction(
            &db.conn,
            "CREATE TABLE a (id INTEGER); CREATE TABLE a (id INTEGER);",
        );

        assert!(result.is_err());
        assert!(!table_exists(&db.conn, "a").unwrap());
    }
}
