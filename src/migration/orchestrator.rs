//! Migration orchestrator
//!
//! Drives every configured logical database to a target schema version, one
//! version step at a time. Each database is in one of two states: untracked
//! (no `dbversion` record) or at a known version. Untracked databases have
//! their version discovered by probing every version step; known databases
//! are walked up or down, recording the new version after each step so that
//! an interrupted walk resumes where it stopped.

use crate::config::AdminConfig;
use crate::database::{
    ConnectionResolver, Connections, DatabaseConn, LogicalDatabase, VersionTracker,
};
use crate::error::{AdminError, Direction, Result};
use crate::migration::compat::CompatibilityTable;
use crate::migration::registry::VersionStepRegistry;
use crate::migration::report::{CurrentVersion, DatabaseMigration, MigrationReport};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

pub struct MigrationOrchestrator {
    connections: Connections,
    registry: VersionStepRegistry,
    compatibility: CompatibilityTable,
}

impl MigrationOrchestrator {
    pub fn new(
        connections: Connections,
        registry: VersionStepRegistry,
        compatibility: CompatibilityTable,
    ) -> Self {
        Self {
            connections,
            registry,
            compatibility,
        }
    }

    /// Open the configured databases and load the version steps directory
    pub fn from_config(config: &AdminConfig) -> Result<Self> {
        let connections = ConnectionResolver::new(config).open()?;

        let mut registry = VersionStepRegistry::new();
        registry.load_dir(Path::new(&config.steps_dir))?;

        Ok(Self::new(connections, registry, CompatibilityTable::default()))
    }

    pub fn connections(&self) -> &Connections {
        &self.connections
    }

    pub fn connection(&self, database: LogicalDatabase) -> Option<&DatabaseConn> {
        self.connections.get(database)
    }

    pub fn registry(&self) -> &VersionStepRegistry {
        &self.registry
    }

    pub fn compatibility(&self) -> &CompatibilityTable {
        &self.compatibility
    }

    /// Check whether the databases are at the version of `release`
    ///
    /// `release` defaults to the newest known version. Unconfigured
    /// databases are skipped, so an empty deployment always verifies. When no
    /// database is named, one whose version can not be determined counts as
    /// not verified and the others are still checked.
    pub fn verify(
        &self,
        release: Option<&str>,
        database: Option<LogicalDatabase>,
    ) -> Result<bool> {
        let target = self.compatibility.resolve(release)?;
        let mut verified = true;

        for db in self.scope(database) {
            let version = match self.version_of(db) {
                Ok(Some(version)) => version,
                Ok(None) => continue,
                Err(e) if database.is_none() => {
                    warn!("unable to determine version of {} database: {}", db, e);
                    verified = false;
                    continue;
                }
                Err(e) => return Err(e),
            };
            if version != target {
                info!("{} database is at v{}, expected v{}", db, version, target);
                verified = false;
            }
        }
        Ok(verified)
    }

    /// Current version of one or all databases, discovering it when needed
    ///
    /// With `resolve_release` the version is replaced by the first release
    /// identifier mapping to it, when there is one. With `print_friendly`
    /// (and no `database`) keys carry the connection URL, or
    /// `Not configured`. Without `database`, a failure is reported as
    /// [`CurrentVersion::Error`] for that database only.
    pub fn current_version(
        &self,
        database: Option<LogicalDatabase>,
        resolve_release: bool,
        print_friendly: bool,
    ) -> Result<BTreeMap<String, CurrentVersion>> {
        let mut versions = BTreeMap::new();

        for db in self.scope(database) {
            let key = match (database, print_friendly, self.connections.get(db)) {
                (None, true, Some(conn)) => format!("{} ({})", db, conn.url()),
                (None, true, None) => format!("{} (Not configured)", db),
                _ => db.to_string(),
            };

            let value = match self.version_of(db) {
                Ok(None) => CurrentVersion::NotConfigured,
                Ok(Some(v)) if resolve_release => match self.compatibility.release_for(v) {
                    Some(release) => CurrentVersion::Release(release.to_string()),
                    None => CurrentVersion::Version(v),
                },
                Ok(Some(v)) => CurrentVersion::Version(v),
                Err(e) if database.is_none() => {
                    warn!("unable to determine version of {} database: {}", db, e);
                    CurrentVersion::Error {
                        error: e.to_string(),
                    }
                }
                Err(e) => return Err(e),
            };
            versions.insert(key, value);
        }

        Ok(versions)
    }

    /// Upgrade databases to the version of `release` (default: newest)
    ///
    /// Fails only when `release` is unknown; per-database failures are
    /// collected in the report and do not stop the other databases.
    pub fn update(
        &self,
        release: Option<&str>,
        database: Option<LogicalDatabase>,
        force: bool,
    ) -> Result<MigrationReport> {
        let target = self.compatibility.resolve(release)?;
        Ok(self.migrate(Direction::Upgrade, target, database, force))
    }

    /// Downgrade databases to the version of `release`
    ///
    /// Without a release the target is one below the newest known version,
    /// wherever the databases currently are.
    pub fn downgrade(
        &self,
        release: Option<&str>,
        database: Option<LogicalDatabase>,
        force: bool,
    ) -> Result<MigrationReport> {
        let target = match release {
            Some(_) => self.compatibility.resolve(release)?,
            None => self.compatibility.current_version().saturating_sub(1),
        };
        Ok(self.migrate(Direction::Downgrade, target, database, force))
    }

    fn migrate(
        &self,
        direction: Direction,
        target: u32,
        database: Option<LogicalDatabase>,
        force: bool,
    ) -> MigrationReport {
        let mut databases = Vec::new();

        for db in self.scope(database) {
            let Some(conn) = self.connections.get(db) else {
                debug!("{} database is not configured, skipping", db);
                continue;
            };

            let mut migration = DatabaseMigration::new(db, target);
            if let Err(e) = self.walk(conn, direction, force, &mut migration) {
                warn!("{} of {} database stopped: {}", direction, db, e);
                migration.error = Some(e);
            }
            databases.push(migration);
        }

        MigrationReport {
            direction,
            target_version: target,
            databases,
        }
    }

    fn walk(
        &self,
        conn: &DatabaseConn,
        direction: Direction,
        force: bool,
        migration: &mut DatabaseMigration,
    ) -> Result<()> {
        let db = migration.database;
        let target = migration.target_version;
        let current = self.version_of(db)?.unwrap_or_default();
        migration.from_version = Some(current);
        migration.to_version = Some(current);

        match direction {
            Direction::Upgrade if current < target => {
                info!("upgrading {} database from v{} to v{}", db, current, target);
                for version in (current + 1)..=target {
                    let step = self.registry.resolve(version, db, &conn.conn)?;
                    step.apply_upgrade(force)?;
                    self.record_version(db, version)?;
                    migration.steps.push(version);
                    migration.to_version = Some(version);
                }
            }
            Direction::Downgrade if current > target => {
                info!("downgrading {} database from v{} to v{}", db, current, target);
                for version in ((target + 1)..=current).rev() {
                    let step = self.registry.resolve(version, db, &conn.conn)?;
                    step.apply_downgrade(force)?;
                    self.record_version(db, version - 1)?;
                    migration.steps.push(version);
                    migration.to_version = Some(version - 1);
                }
            }
            _ => debug!("{} database already at v{}, no {} needed", db, current, direction),
        }

        Ok(())
    }

    /// Databases covered by a call, in processing order
    fn scope(&self, database: Option<LogicalDatabase>) -> Vec<LogicalDatabase> {
        match database {
            Some(db) => vec![db],
            None => LogicalDatabase::ALL.to_vec(),
        }
    }

    fn tracker(&self, database: LogicalDatabase) -> Option<VersionTracker<'_>> {
        self.connections
            .get(database)
            .map(|conn| VersionTracker::new(&conn.conn, database))
    }

    /// Recorded version, discovered when there is no record yet
    ///
    /// `None` for an unconfigured database.
    fn version_of(&self, database: LogicalDatabase) -> Result<Option<u32>> {
        let Some(tracker) = self.tracker(database) else {
            return Ok(None);
        };

        match tracker.current_version() {
            Ok(version) => Ok(Some(version)),
            Err(AdminError::NoVersionRecord(_)) => self.discover_version(database).map(Some),
            Err(e) => Err(e),
        }
    }

    /// Probe every version step and keep the highest compatible version
    ///
    /// Newer schemas may also satisfy older probes, so the scan never stops
    /// early. A result of 0 is not recorded.
    fn discover_version(&self, database: LogicalDatabase) -> Result<u32> {
        let Some(conn) = self.connections.get(database) else {
            return Ok(0);
        };

        let mut version = 0;
        for candidate in 1..=self.compatibility.current_version() {
            let step = self.registry.resolve(candidate, database, &conn.conn)?;
            if step.is_compatible()? {
                version = candidate;
            }
        }

        if version > 0 {
            info!("discovered {} database at v{}", database, version);
            self.record_version(database, version)?;
        } else {
            info!("{} database matches no known schema version", database);
        }
        Ok(version)
    }

    fn record_version(&self, database: LogicalDatabase, version: u32) -> Result<()> {
        match self.tracker(database) {
            Some(tracker) => tracker.record_version(version),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration::step::VersionStep;
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Call {
        Probe(LogicalDatabase, u32),
        Upgrade(LogicalDatabase, u32, bool),
        Downgrade(LogicalDatabase, u32, bool),
    }

    /// Shared behaviour and call log of the mock steps
    #[derive(Default)]
    struct Script {
        compatible: HashSet<(LogicalDatabase, u32)>,
        failing: HashSet<(LogicalDatabase, u32)>,
        calls: Vec<Call>,
    }

    type SharedScript = Arc<Mutex<Script>>;

    struct MockStep {
        version: u32,
        database: LogicalDatabase,
        script: SharedScript,
    }

    impl MockStep {
        fn call(&self, call: Call, direction: Direction) -> Result<()> {
            let mut script = self.script.lock().unwrap();
            script.calls.push(call);
            if script.failing.contains(&(self.database, self.version)) {
                return Err(AdminError::migration(
                    self.version,
                    self.database,
                    direction,
                    "scripted failure",
                ));
            }
            Ok(())
        }
    }

    impl VersionStep for MockStep {
        fn is_compatible(&self) -> Result<bool> {
            let mut script = self.script.lock().unwrap();
            script.calls.push(Call::Probe(self.database, self.version));
            Ok(script.compatible.contains(&(self.database, self.version)))
        }

        fn apply_upgrade(&self, force: bool) -> Result<()> {
            self.call(
                Call::Upgrade(self.database, self.version, force),
                Direction::Upgrade,
            )
        }

        fn apply_downgrade(&self, force: bool) -> Result<()> {
            self.call(
                Call::Downgrade(self.database, self.version, force),
                Direction::Downgrade,
            )
        }
    }

    fn mock_registry(script: &SharedScript, versions: &[u32]) -> VersionStepRegistry {
        let mut registry = VersionStepRegistry::new();
        for version in versions {
            let script = Arc::clone(script);
            registry.register(*version, move |ctx| {
                Box::new(MockStep {
                    version: ctx.version,
                    database: ctx.database,
                    script: Arc::clone(&script),
                })
            });
        }
        registry
    }

    fn table() -> CompatibilityTable {
        CompatibilityTable::new([("4.3.0", 1), ("4.4.0", 2), ("4.5.0", 3)], 3)
    }

    /// Open an in-memory database already recorded at `version`
    fn db_at(database: LogicalDatabase, version: Option<u32>) -> DatabaseConn {
        let db = DatabaseConn::open_in_memory().unwrap();
        if let Some(v) = version {
            VersionTracker::new(&db.conn, database).record_version(v).unwrap();
        }
        db
    }

    fn orchestrator(
        script: &SharedScript,
        dbs: &[(LogicalDatabase, Option<u32>)],
    ) -> MigrationOrchestrator {
        let mut connections = Connections::new();
        for (database, version) in dbs {
            connections.set(*database, Some(db_at(*database, *version)));
        }
        MigrationOrchestrator::new(connections, mock_registry(script, &[1, 2, 3]), table())
    }

    fn recorded(orch: &MigrationOrchestrator, database: LogicalDatabase) -> Vec<u32> {
        let conn = orch.connection(database).unwrap();
        VersionTracker::new(&conn.conn, database)
            .history()
            .unwrap()
            .into_iter()
            .map(|r| r.version_number)
            .collect()
    }

    fn calls(script: &SharedScript) -> Vec<Call> {
        script.lock().unwrap().calls.clone()
    }

    fn clear_calls(script: &SharedScript) {
        script.lock().unwrap().calls.clear();
    }

    const MASTER: LogicalDatabase = LogicalDatabase::Master;
    const WORKFLOW: LogicalDatabase = LogicalDatabase::Workflow;
    const CATALOGS: LogicalDatabase = LogicalDatabase::Catalogs;

    #[test]
    fn test_update_then_default_downgrade() {
        let script = SharedScript::default();
        let orch = orchestrator(&script, &[(MASTER, Some(1))]);

        let report = orch.update(Some("4.5.0"), None, false).unwrap();
        assert!(report.is_success());
        assert_eq!(
            calls(&script),
            vec![Call::Upgrade(MASTER, 2, false), Call::Upgrade(MASTER, 3, false)]
        );
        assert_eq!(recorded(&orch, MASTER), vec![1, 2, 3]);
        let master = report.database(MASTER).unwrap();
        assert_eq!(master.from_version, Some(1));
        assert_eq!(master.to_version, Some(3));
        assert_eq!(master.steps, vec![2, 3]);

        clear_calls(&script);
        let report = orch.downgrade(None, None, true).unwrap();
        assert_eq!(report.target_version, 2);
        assert_eq!(calls(&script), vec![Call::Downgrade(MASTER, 3, true)]);
        assert_eq!(recorded(&orch, MASTER), vec![1, 2, 3, 2]);
    }

    #[test]
    fn test_update_is_idempotent() {
        let script = SharedScript::default();
        let orch = orchestrator(&script, &[(MASTER, Some(1)), (WORKFLOW, Some(2))]);

        let first = orch.update(None, None, false).unwrap();
        assert_eq!(first.steps_applied(), 3);

        clear_calls(&script);
        let second = orch.update(None, None, false).unwrap();
        assert_eq!(second.steps_applied(), 0);
        assert!(calls(&script).is_empty());
        assert_eq!(recorded(&orch, WORKFLOW), vec![2, 3]);
    }

    #[test]
    fn test_unknown_release_touches_nothing() {
        let script = SharedScript::default();
        let orch = orchestrator(&script, &[(MASTER, Some(1)), (WORKFLOW, None)]);

        assert!(matches!(
            orch.update(Some("9.9.9"), None, false),
            Err(AdminError::UnknownRelease(_))
        ));
        assert!(matches!(
            orch.downgrade(Some("9.9.9"), None, false),
            Err(AdminError::UnknownRelease(_))
        ));
        assert!(matches!(
            orch.verify(Some("9.9.9"), None),
            Err(AdminError::UnknownRelease(_))
        ));

        // not even discovery ran
        assert!(calls(&script).is_empty());
        assert_eq!(recorded(&orch, MASTER), vec![1]);
        assert!(recorded(&orch, WORKFLOW).is_empty());
    }

    #[test]
    fn test_failed_step_keeps_partial_progress() {
        let script = SharedScript::default();
        script.lock().unwrap().failing.insert((MASTER, 3));
        let orch = orchestrator(&script, &[(MASTER, Some(1))]);

        let report = orch.update(Some("4.5.0"), None, false).unwrap();
        assert!(!report.is_success());
        let master = report.database(MASTER).unwrap();
        assert_eq!(master.steps, vec![2]);
        assert_eq!(master.to_version, Some(2));
        assert!(matches!(
            master.error,
            Some(AdminError::Migration { version: 3, .. })
        ));
        assert_eq!(recorded(&orch, MASTER), vec![1, 2]);
    }

    #[test]
    fn test_failed_first_step_is_retried() {
        let script = SharedScript::default();
        script.lock().unwrap().failing.insert((MASTER, 2));
        let orch = orchestrator(&script, &[(MASTER, Some(1))]);

        let report = orch.update(Some("4.5.0"), None, false).unwrap();
        assert_eq!(report.steps_applied(), 0);
        assert_eq!(calls(&script), vec![Call::Upgrade(MASTER, 2, false)]);
        assert_eq!(recorded(&orch, MASTER), vec![1]);

        // after remediation the walk resumes from v1
        script.lock().unwrap().failing.clear();
        clear_calls(&script);
        let report = orch.update(Some("4.5.0"), None, false).unwrap();
        assert!(report.is_success());
        assert_eq!(
            calls(&script),
            vec![Call::Upgrade(MASTER, 2, false), Call::Upgrade(MASTER, 3, false)]
        );
        assert_eq!(recorded(&orch, MASTER), vec![1, 2, 3]);
    }

    #[test]
    fn test_failure_does_not_stop_siblings() {
        let script = SharedScript::default();
        script.lock().unwrap().failing.insert((MASTER, 2));
        let orch = orchestrator(&script, &[(MASTER, Some(1)), (WORKFLOW, Some(1))]);

        let report = orch.update(None, None, false).unwrap();
        assert_eq!(report.failures().count(), 1);
        assert_eq!(report.database(WORKFLOW).unwrap().steps, vec![2, 3]);
        assert_eq!(recorded(&orch, WORKFLOW), vec![1, 2, 3]);
        assert_eq!(recorded(&orch, MASTER), vec![1]);
    }

    #[test]
    fn test_missing_step_is_unsupported() {
        let script = SharedScript::default();
        let connections = Connections::new().with(MASTER, db_at(MASTER, Some(1)));
        let orch =
            MigrationOrchestrator::new(connections, mock_registry(&script, &[1, 2]), table());

        let report = orch.update(None, None, false).unwrap();
        let master = report.database(MASTER).unwrap();
        assert_eq!(master.steps, vec![2]);
        assert!(matches!(
            master.error,
            Some(AdminError::UnsupportedVersion {
                version: 3,
                database: LogicalDatabase::Master
            })
        ));
        assert_eq!(recorded(&orch, MASTER), vec![1, 2]);
    }

    #[test]
    fn test_downgrade_walks_descending() {
        let script = SharedScript::default();
        let orch = orchestrator(&script, &[(WORKFLOW, Some(3))]);

        let report = orch.downgrade(Some("4.3.0"), None, false).unwrap();
        assert_eq!(report.database(WORKFLOW).unwrap().steps, vec![3, 2]);
        assert_eq!(
            calls(&script),
            vec![
                Call::Downgrade(WORKFLOW, 3, false),
                Call::Downgrade(WORKFLOW, 2, false)
            ]
        );
        assert_eq!(recorded(&orch, WORKFLOW), vec![3, 2, 1]);
    }

    #[test]
    fn test_default_downgrade_target_ignores_current() {
        let script = SharedScript::default();
        let orch = orchestrator(&script, &[(MASTER, Some(1))]);

        // target is CURRENT_DB_VERSION - 1 = 2, above the current v1
        let report = orch.downgrade(None, None, false).unwrap();
        assert_eq!(report.target_version, 2);
        assert_eq!(report.steps_applied(), 0);
        assert_eq!(recorded(&orch, MASTER), vec![1]);

        // update and downgrade do nothing in the wrong direction
        let report = orch.update(Some("4.3.0"), None, false).unwrap();
        assert_eq!(report.steps_applied(), 0);
        assert!(calls(&script).is_empty());
    }

    #[test]
    fn test_discovery_keeps_highest_compatible() {
        let script = SharedScript::default();
        {
            let mut s = script.lock().unwrap();
            s.compatible.insert((MASTER, 1));
            s.compatible.insert((MASTER, 3));
        }
        let orch = orchestrator(&script, &[(MASTER, None)]);

        let versions = orch.current_version(Some(MASTER), false, false).unwrap();
        assert_eq!(versions.get("MASTER"), Some(&CurrentVersion::Version(3)));
        assert_eq!(
            calls(&script),
            vec![
                Call::Probe(MASTER, 1),
                Call::Probe(MASTER, 2),
                Call::Probe(MASTER, 3)
            ]
        );
        assert_eq!(recorded(&orch, MASTER), vec![3]);

        // the record memoizes discovery
        clear_calls(&script);
        orch.current_version(Some(MASTER), false, false).unwrap();
        assert!(calls(&script).is_empty());
    }

    #[test]
    fn test_discovery_without_match_records_nothing() {
        let script = SharedScript::default();
        let orch = orchestrator(&script, &[(WORKFLOW, None)]);

        let versions = orch.current_version(None, false, false).unwrap();
        assert_eq!(versions.get("WORKFLOW"), Some(&CurrentVersion::Version(0)));
        assert_eq!(versions.get("MASTER"), Some(&CurrentVersion::NotConfigured));
        assert!(recorded(&orch, WORKFLOW).is_empty());

        // an untracked database is upgraded from scratch
        clear_calls(&script);
        let report = orch.update(Some("4.4.0"), Some(WORKFLOW), false).unwrap();
        assert_eq!(report.database(WORKFLOW).unwrap().steps, vec![1, 2]);
        assert_eq!(recorded(&orch, WORKFLOW), vec![1, 2]);
    }

    #[test]
    fn test_verify() {
        let script = SharedScript::default();
        let orch = orchestrator(&script, &[(MASTER, Some(3)), (WORKFLOW, Some(2))]);

        assert!(!orch.verify(None, None).unwrap());
        assert!(orch.verify(None, Some(MASTER)).unwrap());
        assert!(orch.verify(Some("4.4.0"), Some(WORKFLOW)).unwrap());
        assert!(!orch.verify(Some("4.4.0"), None).unwrap());
        // unconfigured databases are skipped
        assert!(orch.verify(Some("4.3.0"), Some(CATALOGS)).unwrap());
    }

    #[test]
    fn test_verify_empty_deployment() {
        let script = SharedScript::default();
        let orch = orchestrator(&script, &[]);

        assert!(orch.verify(None, None).unwrap());
        assert!(orch.verify(Some("4.3.0"), None).unwrap());
        assert_eq!(orch.update(None, None, false).unwrap().databases.len(), 0);
    }

    #[test]
    fn test_current_version_release_and_keys() {
        let script = SharedScript::default();
        let orch = orchestrator(&script, &[(MASTER, Some(2)), (WORKFLOW, None)]);

        let versions = orch.current_version(None, true, true).unwrap();
        assert_eq!(
            versions.get("MASTER (sqlite://)"),
            Some(&CurrentVersion::Release("4.4.0".to_string()))
        );
        // v0 has no release identifier
        assert_eq!(
            versions.get("WORKFLOW (sqlite://)"),
            Some(&CurrentVersion::Version(0))
        );
        assert_eq!(
            versions.get("CATALOGS (Not configured)"),
            Some(&CurrentVersion::NotConfigured)
        );

        // a named database always uses the plain key
        let versions = orch.current_version(Some(MASTER), true, true).unwrap();
        assert_eq!(versions.keys().collect::<Vec<_>>(), vec!["MASTER"]);
    }

    #[test]
    fn test_failed_discovery_does_not_hide_siblings() {
        let script = SharedScript::default();
        let mut connections = Connections::new();
        connections.set(MASTER, Some(db_at(MASTER, Some(2))));
        connections.set(WORKFLOW, Some(db_at(WORKFLOW, None)));
        let orch =
            MigrationOrchestrator::new(connections, mock_registry(&script, &[1, 3]), table());

        let versions = orch.current_version(None, false, false).unwrap();
        assert_eq!(versions.get("MASTER"), Some(&CurrentVersion::Version(2)));
        assert!(matches!(
            versions.get("WORKFLOW"),
            Some(CurrentVersion::Error { error }) if error.contains("schema version 2")
        ));

        // a named database still reports its own failure
        assert!(matches!(
            orch.current_version(Some(WORKFLOW), false, false),
            Err(AdminError::UnsupportedVersion { version: 2, .. })
        ));

        assert!(orch.verify(Some("4.4.0"), Some(MASTER)).unwrap());
        assert!(!orch.verify(Some("4.4.0"), None).unwrap());
        assert!(matches!(
            orch.verify(Some("4.4.0"), Some(WORKFLOW)),
            Err(AdminError::UnsupportedVersion { version: 2, .. })
        ));
    }

    #[test]
    fn test_scoped_update() {
        let script = SharedScript::default();
        let orch = orchestrator(&script, &[(MASTER, Some(1)), (WORKFLOW, Some(1))]);

        let report = orch.update(None, Some(WORKFLOW), false).unwrap();
        assert_eq!(report.databases.len(), 1);
        assert_eq!(recorded(&orch, WORKFLOW), vec![1, 2, 3]);
        assert_eq!(recorded(&orch, MASTER), vec![1]);
    }

    #[test]
    fn test_from_config_with_sql_steps() {
        let tmp = tempfile::tempdir().unwrap();
        let steps = [
            (
                1,
                "CREATE TABLE workflow (wf_id INTEGER PRIMARY KEY);",
                "DROP TABLE workflow;",
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'workflow'",
            ),
            (
                2,
                "ALTER TABLE workflow ADD COLUMN db_url TEXT;",
                "ALTER TABLE workflow DROP COLUMN db_url;",
                "SELECT COUNT(*) FROM pragma_table_info('workflow') WHERE name = 'db_url'",
            ),
            (
                3,
                "CREATE TABLE archive (id INTEGER);",
                "DROP TABLE archive;",
                "SELECT COUNT(*) FROM sqlite_master WHERE name = 'archive'",
            ),
        ];
        for (version, upgrade, downgrade, probe) in steps {
            let dir = tmp
                .path()
                .join("versions")
                .join(format!("v{}", version))
                .join("master");
            std::fs::create_dir_all(&dir).unwrap();
            std::fs::write(dir.join("upgrade.sql"), upgrade).unwrap();
            std::fs::write(dir.join("downgrade.sql"), downgrade).unwrap();
            std::fs::write(dir.join("probe.sql"), probe).unwrap();
        }

        let data_dir = tmp.path().to_string_lossy().to_string();
        let config = AdminConfig::from_settings(&Default::default(), &data_dir).unwrap();
        let orch = MigrationOrchestrator::from_config(&config).unwrap();
        assert_eq!(orch.registry().versions(), vec![1, 2, 3]);
        assert!(orch.connection(WORKFLOW).is_none());
        assert!(orch.connection(CATALOGS).is_none());

        // an empty database matches no probe and is built from scratch
        let report = orch.update(None, None, false).unwrap();
        assert!(report.is_success());
        assert_eq!(report.database(MASTER).unwrap().steps, vec![1, 2, 3]);
        assert!(orch.verify(None, None).unwrap());

        let report = orch.downgrade(Some("4.3.0"), None, false).unwrap();
        assert_eq!(report.database(MASTER).unwrap().steps, vec![3, 2]);
        let conn = &orch.connection(MASTER).unwrap().conn;
        assert!(crate::migration::table_exists(conn, "workflow").unwrap());
        assert!(!crate::migration::table_exists(conn, "archive").unwrap());
        assert!(!crate::migration::column_exists(conn, "workflow", "db_url").unwrap());
        assert!(orch.verify(Some("4.3.2"), Some(MASTER)).unwrap());
    }

    #[test]
    fn test_record_version_unconfigured_is_noop() {
        let script = SharedScript::default();
        let orch = orchestrator(&script, &[]);
        orch.record_version(CATALOGS, 2).unwrap();
        assert_eq!(orch.discover_version(CATALOGS).unwrap(), 0);
    }
}
