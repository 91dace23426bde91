//! Schema version migration
//!
//! - **compat**: release identifier to schema version table
//! - **step**: the [`VersionStep`] interface and schema helpers for steps
//! - **registry**: version number to step factory lookup
//! - **sql_step**: steps loaded from `v{N}` directories of SQL scripts
//! - **orchestrator**: verify, current_version, update and downgrade
//! - **report**: results of the orchestrator operations
//!
//! # Usage
//!
//! ```rust,ignore
//! use wfdb_admin::migration::MigrationOrchestrator;
//!
//! let orchestrator = MigrationOrchestrator::from_config(&config)?;
//! let report = orchestrator.update(Some("4.5.0"), None, false)?;
//! for db in report.failures() {
//!     eprintln!("{}: {:?}", db.database, db.error);
//! }
//! ```

mod compat;
mod orchestrator;
mod registry;
mod report;
mod sql_step;
mod step;

pub use compat::{
    CompatibilityEntry, CompatibilityTable, CURRENT_DB_VERSION, DEFAULT_COMPATIBILITY,
};
pub use orchestrator::MigrationOrchestrator;
pub use registry::{StepFactory, VersionStepRegistry};
pub use report::{CurrentVersion, DatabaseMigration, MigrationReport};
pub use sql_step::{parse_version_dir, SqlScripts, SqlStep, SqlStepDefinition};
pub use step::{
    column_exists, execute_in_transaction, row_count, table_exists, StepContext, VersionStep,
};
