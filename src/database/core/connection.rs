//! Database connection management
//!
//! This module provides the connection wrapper handed to the version tracker
//! and to version steps. Connections are addressed by URL
//! (`sqlite:///path/to/file.db`, `sqlite://` for an in-memory database).

use crate::error::{AdminError, Result};
use rusqlite::Connection;

/// Core database connection wrapper
///
/// `DatabaseConn` keeps the URL it was opened from next to the SQLite
/// connection so reports can tell which store a logical database lives in.
pub struct DatabaseConn {
    pub conn: Connection,
    url: String,
}

impl DatabaseConn {
    /// Open a database at the specified path
    ///
    /// If the path is `None`, an in-memory database is created.
    pub fn open(path: Option<&str>) -> Result<Self> {
        let (conn, url) = match path {
            Some(p) => (Connection::open(p)?, format!("sqlite:///{}", p)),
            None => (Connection::open_in_memory()?, "sqlite://".to_string()),
        };

        let db = DatabaseConn { conn, url };
        db.configure()?;
        Ok(db)
    }

    /// Open a database from a connection URL
    pub fn open_url(url: &str) -> Result<Self> {
        let path = sqlite_path_from_url(url)?;
        let mut db = Self::open(path.as_deref())?;
        db.url = url.to_string();
        Ok(db)
    }

    /// Create an in-memory database
    pub fn open_in_memory() -> Result<Self> {
        Self::open(None)
    }

    fn configure(&self) -> Result<()> {
        // Wait for other writers instead of failing immediately
        self.conn.busy_timeout(std::time::Duration::from_secs(5))?;

        self.conn.execute("PRAGMA foreign_keys=ON", [])?;

        Ok(())
    }

    /// The URL this connection was opened from
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Execute a SQL statement
    pub fn execute(&self, sql: &str) -> Result<usize> {
        Ok(self.conn.execute(sql, [])?)
    }

    /// Check if a table exists in the database
    pub fn table_exists(&self, table_name: &str) -> Result<bool> {
        crate::migration::table_exists(&self.conn, table_name)
    }
}

/// Translate a connection URL into a SQLite file path
///
/// Returns `Ok(None)` for an in-memory database. Non-SQLite schemes are
/// recognised but rejected with [`AdminError::UnsupportedDriver`].
pub fn sqlite_path_from_url(url: &str) -> Result<Option<String>> {
    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| AdminError::InvalidUrl(url.to_string()))?;

    if !scheme.eq_ignore_ascii_case("sqlite") {
        return Err(AdminError::UnsupportedDriver(scheme.to_string()));
    }

    match rest {
        "" | "/" | "/:memory:" => Ok(None),
        _ => match rest.strip_prefix('/') {
            Some(path) => Ok(Some(path.to_string())),
            // sqlite://host/... has no meaning for a file database
            None => Err(AdminError::InvalidUrl(url.to_string())),
        },
    }
}
