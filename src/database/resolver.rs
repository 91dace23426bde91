//! Connection resolution
//!
//! Turns an [`AdminConfig`] into at most one connection URL per logical
//! database and opens them. A database without a URL is unconfigured.

use crate::config::{AdminConfig, CatalogProperties};
use crate::database::core::DatabaseConn;
use crate::database::{Connections, LogicalDatabase};
use crate::error::Result;
use tracing::{info, warn};

/// File name of the workflow database inside a submit directory
pub const WORKFLOW_DB_FILE: &str = "workflow.stampede.db";

pub struct ConnectionResolver<'a> {
    config: &'a AdminConfig,
}

impl<'a> ConnectionResolver<'a> {
    pub fn new(config: &'a AdminConfig) -> Self {
        Self { config }
    }

    /// Connection URL for `database`, or `None` when it is not configured
    pub fn url_for(&self, database: LogicalDatabase) -> Result<Option<String>> {
        match database {
            LogicalDatabase::Catalogs => Ok(self.catalogs_url()),
            LogicalDatabase::Master => self.master_url().map(Some),
            LogicalDatabase::Workflow => Ok(self.workflow_url()),
        }
    }

    /// Open every configured database
    pub fn open(&self) -> Result<Connections> {
        let mut connections = Connections::new();
        for database in LogicalDatabase::ALL {
            if let Some(url) = self.url_for(database)? {
                info!("connecting to {} database at {}", database, url);
                connections.set(database, Some(DatabaseConn::open_url(&url)?));
            }
        }
        Ok(connections)
    }

    fn catalogs_url(&self) -> Option<String> {
        let catalog = &self.config.catalog;
        if !catalog.is_database_backed() {
            return None;
        }
        if let Some(url) = &self.config.database_url {
            return Some(url.clone());
        }
        let url = catalog_url_from_properties(catalog);
        if url.is_none() {
            warn!("replica catalog is JDBCRC but its driver or url is missing or unsupported");
        }
        url
    }

    fn master_url(&self) -> Result<String> {
        if let Some(url) = &self.config.database_url {
            return Ok(url.clone());
        }
        if let Some(url) = &self.config.master_url {
            return Ok(url.clone());
        }

        std::fs::create_dir_all(&self.config.data_dir)?;
        Ok(format!("sqlite:///{}", self.config.master_db_path()))
    }

    fn workflow_url(&self) -> Option<String> {
        if let Some(url) = &self.config.database_url {
            return Some(url.clone());
        }
        if let Some(url) = &self.config.workflow_url {
            return Some(url.clone());
        }
        self.config.submit_dir.as_ref().map(|dir| {
            format!(
                "sqlite:///{}/{}",
                dir.trim_end_matches('/'),
                WORKFLOW_DB_FILE
            )
        })
    }
}

/// Build the replica catalog URL from its JDBC connection properties
///
/// The `jdbc:` prefix is dropped and host/database are taken from the
/// remaining URL. SQLite catalogs live in `workflow.db` under the host part.
pub fn catalog_url_from_properties(catalog: &CatalogProperties) -> Option<String> {
    let driver = catalog.driver.as_deref()?.to_lowercase();
    let url = catalog.url.as_deref()?;
    let (host, database) = split_jdbc_url(url);

    let user = catalog.user.as_deref().unwrap_or_default();
    let password = catalog.password.as_deref().unwrap_or_default();

    match driver.as_str() {
        "mysql" => Some(format!(
            "mysql://{}:{}@{}/{}",
            user, password, host, database
        )),
        "postgresql" => Some(format!(
            "postgresql://{}:{}@{}/{}",
            user, password, host, database
        )),
        "sqlite" => {
            let path = if host.is_empty() {
                "workflow.db".to_string()
            } else {
                format!("{}/workflow.db", host)
            };
            Some(format!("sqlite:///{}", path))
        }
        _ => None,
    }
}

/// Split `jdbc:scheme://host/database` into `(host, database)`
fn split_jdbc_url(url: &str) -> (String, String) {
    let url = url.replace("jdbc:", "");
    let rest = match url.split_once(':') {
        Some((_scheme, rest)) => rest,
        None => url.as_str(),
    };

    match rest.strip_prefix("//") {
        Some(authority_and_path) => match authority_and_path.split_once('/') {
            Some((host, path)) => (host.to_string(), path.replace('/', "")),
            None => (authority_and_path.to_string(), String::new()),
        },
        None => (String::new(), rest.replace('/', "")),
    }
}
