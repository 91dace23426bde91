#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! wfdb-admin - schema version management for workflow databases
//!
//! A workflow deployment keeps its state in up to three logical databases:
//! the replica catalog (CATALOGS), the master workflow catalog (MASTER) and
//! the per-workflow monitoring database (WORKFLOW). Every release of the
//! workflow system expects a particular schema version of each of them.
//! wfdb-admin records which version a database is at, discovers it for
//! databases that were never tracked, and walks databases up or down one
//! version step at a time.
//!
//! It can be used as both a command-line application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `display` | Table rendering of command output | `tabled` |
//! | `cli` | The `wfdb-admin` binary | All above + `clap`, `tracing-subscriber` |
//!
//! The library itself (configuration, connections, version tracking and
//! migration) is always available:
//!
//! ```toml
//! wfdb-admin = { version = "0.3", default-features = false }
//! ```
//!
//! # Architecture
//!
//! - **[`database`]**: SQLite connections, the `dbversion` history table and
//!   connection resolution for the logical databases
//! - **[`migration`]**: compatibility table, version steps and their
//!   registry, and the [`MigrationOrchestrator`]
//! - **[`config`]**: configuration file and environment handling
//! - **[`error`]**: the [`AdminError`] taxonomy
//! - **[`utils`]**: output formats of the command line tool
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use wfdb_admin::{AdminConfig, MigrationOrchestrator};
//!
//! let config = AdminConfig::new(&None)?;
//! let orchestrator = MigrationOrchestrator::from_config(&config)?;
//!
//! if !orchestrator.verify(None, None)? {
//!     let report = orchestrator.update(None, None, false)?;
//!     println!("applied {} steps", report.steps_applied());
//! }
//! ```
//!
//! ## Custom version steps
//!
//! Steps are registered per version number. Besides the `v{N}` SQL
//! directories loaded from the configured steps directory, any type
//! implementing [`VersionStep`] can be registered in code:
//!
//! ```rust,ignore
//! use wfdb_admin::migration::{table_exists, StepContext, VersionStep};
//!
//! struct AddArchiveTable<'a>(StepContext<'a>);
//!
//! impl VersionStep for AddArchiveTable<'_> {
//!     fn is_compatible(&self) -> wfdb_admin::Result<bool> {
//!         table_exists(self.0.conn, "archive")
//!     }
//!     // ...
//! }
//!
//! registry.register(4, |ctx| Box::new(AddArchiveTable(ctx)));
//! ```

pub mod config;
pub mod database;
pub mod error;
pub mod migration;
pub mod utils;

pub use config::AdminConfig;
pub use database::{Connections, DatabaseConn, LogicalDatabase, VersionTracker};
pub use error::{AdminError, Direction, Result};
pub use migration::{
    CompatibilityTable, CurrentVersion, MigrationOrchestrator, MigrationReport, VersionStep,
    VersionStepRegistry,
};
pub use utils::OutputFormat;
