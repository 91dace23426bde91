//! Version step registry
//!
//! Maps schema version numbers to factories producing [`VersionStep`]s.
//! The orchestrator only ever asks for "the step of version N", so new
//! versions are added by registering a factory at startup, either in code
//! or by dropping a `v{N}` directory into the steps directory (see
//! [`VersionStepRegistry::load_dir`]).

use crate::database::LogicalDatabase;
use crate::error::{AdminError, Result};
use crate::migration::step::{StepContext, VersionStep};
use rusqlite::Connection;
use std::collections::BTreeMap;

/// Builds the step of one version bound to a connection
pub type StepFactory =
    Box<dyn for<'a> Fn(StepContext<'a>) -> Box<dyn VersionStep + 'a> + Send + Sync>;

#[derive(Default)]
pub struct VersionStepRegistry {
    factories: BTreeMap<u32, StepFactory>,
}

impl VersionStepRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the factory for `version`, replacing any earlier one
    pub fn register<F>(&mut self, version: u32, factory: F) -> &mut Self
    where
        F: for<'a> Fn(StepContext<'a>) -> Box<dyn VersionStep + 'a> + Send + Sync + 'static,
    {
        self.factories.insert(version, Box::new(factory));
        self
    }

    /// Builder-style [`register`](Self::register)
    pub fn with<F>(mut self, version: u32, factory: F) -> Self
    where
        F: for<'a> Fn(StepContext<'a>) -> Box<dyn VersionStep + 'a> + Send + Sync + 'static,
    {
        self.register(version, factory);
        self
    }

    /// Resolve the step of `version` bound to `database`'s connection
    pub fn resolve<'a>(
        &self,
        version: u32,
        database: LogicalDatabase,
        conn: &'a Connection,
    ) -> Result<Box<dyn VersionStep + 'a>> {
        let factory = self
            .factories
            .get(&version)
            .ok_or(AdminError::UnsupportedVersion { version, database })?;

        Ok(factory(StepContext {
            version,
            database,
            conn,
        }))
    }

    pub fn contains(&self, version: u32) -> bool {
        self.factories.contains_key(&version)
    }

    /// Registered versions in ascending order
    pub fn versions(&self) -> Vec<u32> {
        self.factories.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
