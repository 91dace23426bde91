use anyhow::{anyhow, Result};
use config::Config;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Replica catalog type that stores its data in a relational database
pub const JDBC_REPLICA_CATALOG: &str = "JDBCRC";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminConfig {
    /// Path to the directory holding the master database and version steps
    pub data_dir: String,

    /// Directory containing `v{N}` version step directories
    pub steps_dir: String,

    /// Single URL used for every logical database, overriding the rest
    pub database_url: Option<String>,

    /// URL of the master database (default: `{data_dir}/workflow.db`)
    pub master_url: Option<String>,

    /// Workflow submit directory
    pub submit_dir: Option<String>,

    /// URL of the workflow database
    pub workflow_url: Option<String>,

    /// Replica catalog settings
    pub catalog: CatalogProperties,
}

/// Connection properties of the replica catalog
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CatalogProperties {
    /// Replica catalog type, only `JDBCRC` is backed by a database
    pub replica: Option<String>,
    pub driver: Option<String>,
    pub url: Option<String>,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
}

impl CatalogProperties {
    /// Whether the replica catalog lives in a database we manage
    pub fn is_database_backed(&self) -> bool {
        self.replica
            .as_deref()
            .map(|r| r.eq_ignore_ascii_case(JDBC_REPLICA_CATALOG))
            .unwrap_or(false)
    }
}

const EMPTY_CONFIG: &str = r#"### wfdb-admin configuration file

### directory holding the master database and version steps
# data_dir = "~/.wfdb"

### directory of `v{N}` version step directories
# steps_dir = "~/.wfdb/versions"

### one URL for all databases (overrides everything below)
# database_url = "sqlite:////path/to/workflow.db"

### master database
# master_url = "sqlite:////home/user/.wfdb/workflow.db"

### workflow database: either a URL or a submit directory
# workflow_url = "sqlite:////path/to/run0001/workflow.stampede.db"
# submit_dir = "/path/to/run0001"

### replica catalog (only JDBCRC is database backed)
# replica_catalog = "JDBCRC"
# catalog_driver = "sqlite"
# catalog_url = "jdbc:sqlite:/path/to/catalog"
# catalog_user = ""
# catalog_password = ""
"#;

impl Default for AdminConfig {
    fn default() -> Self {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| ".".to_string());
        let data_dir = format!("{}/.wfdb", home_dir);

        Self {
            steps_dir: format!("{}/versions", data_dir),
            data_dir,
            database_url: None,
            master_url: None,
            submit_dir: None,
            workflow_url: None,
            catalog: CatalogProperties::default(),
        }
    }
}

impl AdminConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<AdminConfig> {
        let mut builder = Config::builder();

        // By default use $HOME/.wfdb/wfdb-admin.toml as the configuration file path
        let home_dir = dirs::home_dir()
            .ok_or_else(|| anyhow!("Could not find home directory"))?
            .to_str()
            .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?
            .to_owned();
        let admin_dir = format!("{}/.wfdb", home_dir.as_str());

        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                std::fs::create_dir_all(admin_dir.as_str())
                    .map_err(|e| anyhow!("Unable to create wfdb directory: {}", e))?;
                let p = format!("{}/wfdb-admin.toml", admin_dir.as_str());
                if Path::new(p.as_str()).exists() {
                    builder = builder.add_source(config::File::with_name(p.as_str()));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG).map_err(|e| {
                        anyhow!("Unable to create config file {}: {}", p.as_str(), e)
                    })?;
                }
            }
        }

        // E.g., `WFDB_ADMIN_SUBMIT_DIR=/path/to/run0001 wfdb-admin version`
        builder = builder.add_source(config::Environment::with_prefix("WFDB_ADMIN"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_settings(&config, &admin_dir)
    }

    /// Build a configuration from flat key/value settings
    ///
    /// `default_data_dir` is used when `data_dir` is not set.
    pub fn from_settings(
        settings: &HashMap<String, String>,
        default_data_dir: &str,
    ) -> Result<AdminConfig> {
        let get = |key: &str| {
            settings
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let data_dir = match get("data_dir") {
            Some(p) => expand_home(&p)?,
            None => default_data_dir.to_string(),
        };
        let data_dir = data_dir.trim_end_matches('/').to_string();

        let steps_dir = match get("steps_dir") {
            Some(p) => expand_home(&p)?,
            None => format!("{}/versions", data_dir),
        };

        let submit_dir = match get("submit_dir") {
            Some(p) => Some(expand_home(&p)?),
            None => None,
        };

        Ok(AdminConfig {
            data_dir,
            steps_dir,
            database_url: get("database_url"),
            master_url: get("master_url"),
            submit_dir,
            workflow_url: get("workflow_url"),
            catalog: CatalogProperties {
                replica: get("replica_catalog"),
                driver: get("catalog_driver"),
                url: get("catalog_url"),
                user: get("catalog_user"),
                password: get("catalog_password"),
            },
        })
    }

    /// Default path of the master database file
    pub fn master_db_path(&self) -> String {
        format!("{}/workflow.db", self.data_dir)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".to_string());

        let mut lines = vec![
            format!("Data Directory:     {}", self.data_dir),
            format!("Steps Directory:    {}", self.steps_dir),
        ];
        if let Some(url) = &self.database_url {
            lines.push(format!("Database URL:       {}", url));
        }
        lines.push(format!(
            "Master URL:         {}",
            self.master_url
                .clone()
                .unwrap_or_else(|| format!("sqlite:///{}", self.master_db_path()))
        ));
        lines.push(format!("Workflow URL:       {}", show(&self.workflow_url)));
        lines.push(format!("Submit Directory:   {}", show(&self.submit_dir)));
        lines.push(format!("Replica Catalog:    {}", show(&self.catalog.replica)));
        if self.catalog.is_database_backed() {
            lines.push(format!("Catalog Driver:     {}", show(&self.catalog.driver)));
            lines.push(format!("Catalog URL:        {}", show(&self.catalog.url)));
        }

        lines.join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.wfdb/wfdb-admin.toml", home_dir)
    }
}

fn expand_home(path: &str) -> Result<String> {
    match path.strip_prefix("~") {
        Some(rest) => {
            let home = dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
            let home_str = home
                .to_str()
                .ok_or_else(|| anyhow!("Could not convert home directory path to string"))?;
            Ok(format!("{}{}", home_str, rest))
        }
        None => Ok(path.to_string()),
    }
}
