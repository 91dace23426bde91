//! Core database infrastructure
//!
//! This module provides the foundational database components:
//! - `DatabaseConn`: SQLite connection wrapper addressed by URL
//! - `VersionTracker`: reads and appends `dbversion` records
//! - `SchemaDefinitions`: DDL for the version history table

mod connection;
mod schema;

pub use connection::{sqlite_path_from_url, DatabaseConn};
pub use schema::{SchemaDefinitions, VersionRecord, VersionTracker};
