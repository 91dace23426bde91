//! Version steps loaded from SQL scripts
//!
//! A steps directory holds one sub-directory per schema version, named
//! `v{N}`. Inside, each logical database has its own directory with up to
//! five scripts:
//!
//! ```text
//! versions/
//! └── v2/
//!     ├── master/
//!     │   ├── upgrade.sql            # v1 -> v2, one transaction
//!     │   ├── downgrade.sql          # v2 -> v1, one transaction
//!     │   ├── probe.sql              # non-zero first column when schema is v2
//!     │   ├── upgrade.guard.sql      # non-zero count refuses upgrade unless forced
//!     │   └── downgrade.guard.sql    # non-zero count refuses downgrade unless forced
//!     └── workflow/
//!         └── ...
//! ```
//!
//! A missing upgrade or downgrade script means the version leaves that
//! database untouched. A missing probe means the version can not be
//! recognised in that database.
//!
//! Probes and guards are read from the first column of the first row.
//! INTEGER, REAL and numeric TEXT values are accepted; no row or NULL
//! counts as zero.

use crate::database::LogicalDatabase;
use crate::error::{AdminError, Direction, Result};
use crate::migration::registry::VersionStepRegistry;
use crate::migration::step::{execute_in_transaction, StepContext, VersionStep};
use rusqlite::types::Value;
use rusqlite::OptionalExtension;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Scripts of one version for one logical database
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SqlScripts {
    pub upgrade: Option<String>,
    pub downgrade: Option<String>,
    pub probe: Option<String>,
    pub upgrade_guard: Option<String>,
    pub downgrade_guard: Option<String>,
}

impl SqlScripts {
    fn load(dir: &Path) -> Result<Self> {
        Ok(SqlScripts {
            upgrade: read_script(dir, "upgrade.sql")?,
            downgrade: read_script(dir, "downgrade.sql")?,
            probe: read_script(dir, "probe.sql")?,
            upgrade_guard: read_script(dir, "upgrade.guard.sql")?,
            downgrade_guard: read_script(dir, "downgrade.guard.sql")?,
        })
    }

    fn is_empty(&self) -> bool {
        self == &SqlScripts::default()
    }
}

/// All scripts of one schema version
#[derive(Debug, Clone, Default)]
pub struct SqlStepDefinition {
    pub version: u32,
    scripts: BTreeMap<LogicalDatabase, SqlScripts>,
}

impl SqlStepDefinition {
    pub fn new(version: u32) -> Self {
        Self {
            version,
            scripts: BTreeMap::new(),
        }
    }

    pub fn with_scripts(mut self, database: LogicalDatabase, scripts: SqlScripts) -> Self {
        self.scripts.insert(database, scripts);
        self
    }

    /// Load the scripts of `version` from its `v{N}` directory
    pub fn load(version: u32, dir: &Path) -> Result<Self> {
        let mut definition = Self::new(version);
        for database in LogicalDatabase::ALL {
            let db_dir = dir.join(database.dir_name());
            if !db_dir.is_dir() {
                continue;
            }
            let scripts = SqlScripts::load(&db_dir)?;
            if !scripts.is_empty() {
                definition.scripts.insert(database, scripts);
            }
        }
        Ok(definition)
    }

    pub fn scripts_for(&self, database: LogicalDatabase) -> Option<&SqlScripts> {
        self.scripts.get(&database)
    }
}

/// A [`SqlStepDefinition`] bound to one database connection
pub struct SqlStep<'a> {
    definition: Arc<SqlStepDefinition>,
    ctx: StepContext<'a>,
}

impl<'a> SqlStep<'a> {
    pub fn new(definition: Arc<SqlStepDefinition>, ctx: StepContext<'a>) -> Self {
        Self { definition, ctx }
    }

    fn scripts(&self) -> Option<&SqlScripts> {
        self.definition.scripts_for(self.ctx.database)
    }

    fn run(&self, direction: Direction, force: bool) -> Result<()> {
        let (script, guard) = match (self.scripts(), direction) {
            (Some(s), Direction::Upgrade) => (s.upgrade.as_deref(), s.upgrade_guard.as_deref()),
            (Some(s), Direction::Downgrade) => {
                (s.downgrade.as_deref(), s.downgrade_guard.as_deref())
            }
            (None, _) => (None, None),
        };

        let Some(script) = script else {
            debug!(
                "v{} has no {} script for {}, nothing to do",
                self.ctx.version, direction, self.ctx.database
            );
            return Ok(());
        };

        if let Some(guard) = guard {
            let count = self.query_number(guard).map_err(|e| self.failure(direction, e))?;
            if count != 0.0 && !force {
                return Err(self.failure(
                    direction,
                    format!(
                        "guard reported {} affected rows; re-run with force to proceed",
                        count
                    ),
                ));
            }
        }

        execute_in_transaction(self.ctx.conn, script).map_err(|e| self.failure(direction, e))
    }

    /// First column of the first row as a number
    fn query_number(&self, sql: &str) -> Result<f64> {
        let value: Option<Value> = self
            .ctx
            .conn
            .query_row(sql, [], |row| row.get(0))
            .optional()?;

        match value {
            None | Some(Value::Null) => Ok(0.0),
            Some(Value::Integer(i)) => Ok(i as f64),
            Some(Value::Real(f)) => Ok(f),
            Some(Value::Text(text)) => text
                .trim()
                .parse()
                .map_err(|_| AdminError::NonNumericResult(format!("text '{}'", text))),
            Some(Value::Blob(_)) => Err(AdminError::NonNumericResult("a blob".to_string())),
        }
    }

    fn failure(&self, direction: Direction, reason: impl ToString) -> AdminError {
        AdminError::migration(
            self.ctx.version,
            self.ctx.database,
            direction,
            reason.to_string(),
        )
    }
}

impl VersionStep for SqlStep<'_> {
    fn is_compatible(&self) -> Result<bool> {
        let Some(probe) = self.scripts().and_then(|s| s.probe.as_deref()) else {
            return Ok(false);
        };

        match self.query_number(probe) {
            Ok(count) => Ok(count != 0.0),
            Err(e @ AdminError::NonNumericResult(_)) => {
                warn!(
                    "v{} probe on {} returned an unusable result: {}",
                    self.ctx.version, self.ctx.database, e
                );
                Ok(false)
            }
            // a probe touching a table that does not exist yet simply does not match
            Err(e) => {
                debug!(
                    "v{} probe failed on {}: {}",
                    self.ctx.version, self.ctx.database, e
                );
                Ok(false)
            }
        }
    }

    fn apply_upgrade(&self, force: bool) -> Result<()> {
        self.run(Direction::Upgrade, force)
    }

    fn apply_downgrade(&self, force: bool) -> Result<()> {
        self.run(Direction::Downgrade, force)
    }
}

/// Parse a version directory name such as `v12`
pub fn parse_version_dir(name: &str) -> Option<u32> {
    name.strip_prefix('v')
        .or_else(|| name.strip_prefix('V'))
        .and_then(|n| n.parse().ok())
}

impl VersionStepRegistry {
    /// Register a SQL step for every `v{N}` directory under `dir`
    ///
    /// Returns the number of steps registered. A missing directory registers
    /// nothing.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize> {
        if !dir.is_dir() {
            debug!("version step directory {} does not exist", dir.display());
            return Ok(0);
        }

        let mut loaded = 0;
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let Some(version) = parse_version_dir(&entry.file_name().to_string_lossy()) else {
                continue;
            };

            let definition = Arc::new(SqlStepDefinition::load(version, &entry.path())?);
            self.register(version, move |ctx| {
                Box::new(SqlStep::new(Arc::clone(&definition), ctx))
            });
            loaded += 1;
        }

        info!("loaded {} version steps from {}", loaded, dir.display());
        Ok(loaded)
    }
}

fn read_script(dir: &Path, name: &str) -> Result<Option<String>> {
    let path = dir.join(name);
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    if content.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(content))
}
