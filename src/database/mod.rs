//! Database module
//!
//! This module provides the storage side of database administration:
//!
//! - **core**: SQLite connection wrapper and the `dbversion` history table
//! - **logical**: the logical databases (CATALOGS, MASTER, WORKFLOW) and the
//!   set of opened connections
//! - **resolver**: connection URL assembly from configuration
//!
//! # Architecture
//!
//! ```text
//! database/
//! ├── core/           # Foundation
//! │   ├── connection  # SQLite DatabaseConn wrapper
//! │   └── schema      # dbversion table and VersionTracker
//! ├── logical         # LogicalDatabase, Connections
//! └── resolver        # AdminConfig -> connection URLs
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use wfdb_admin::database::{ConnectionResolver, LogicalDatabase, VersionTracker};
//!
//! let connections = ConnectionResolver::new(&config).open()?;
//! if let Some(master) = connections.get(LogicalDatabase::Master) {
//!     let tracker = VersionTracker::new(&master.conn, LogicalDatabase::Master);
//!     println!("master is at v{}", tracker.current_version()?);
//! }
//! ```

pub mod core;
mod logical;
mod resolver;

pub use core::{
    sqlite_path_from_url, DatabaseConn, SchemaDefinitions, VersionRecord, VersionTracker,
};
pub use logical::{Connections, LogicalDatabase};
pub use resolver::{catalog_url_from_properties, ConnectionResolver, WORKFLOW_DB_FILE};
