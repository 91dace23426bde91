use anyhow::Result;
use clap::Args;
use serde::Serialize;
use std::path::Path;
use wfdb_admin::database::ConnectionResolver;
use wfdb_admin::{AdminConfig, LogicalDatabase, OutputFormat};

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {
    /// Also show the connection URL resolved for each database
    #[clap(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Serialize)]
struct ConfigInfo<'a> {
    config_file: String,
    steps_dir_exists: bool,
    #[serde(flatten)]
    config: &'a AdminConfig,
    #[serde(skip_serializing_if = "Option::is_none")]
    connections: Option<Vec<ConnectionInfo>>,
}

#[derive(Debug, Serialize)]
struct ConnectionInfo {
    database: LogicalDatabase,
    url: Option<String>,
}

pub fn run(config: &AdminConfig, args: ConfigArgs, output_format: OutputFormat) -> Result<()> {
    let ConfigArgs { verbose } = args;

    let connections = if verbose {
        let resolver = ConnectionResolver::new(config);
        let mut list = Vec::new();
        for database in LogicalDatabase::ALL {
            list.push(ConnectionInfo {
                database,
                url: resolver.url_for(database)?,
            });
        }
        Some(list)
    } else {
        None
    };

    let info = ConfigInfo {
        config_file: AdminConfig::config_file_path(),
        steps_dir_exists: Path::new(&config.steps_dir).is_dir(),
        config,
        connections,
    };

    if output_format.is_json() {
        println!("{}", output_format.json(&info)?);
        return Ok(());
    }

    println!("wfdb-admin Configuration");
    println!("========================\n");
    println!("Config File:        {}", info.config_file);
    println!("{}", config.summary());
    if !info.steps_dir_exists {
        println!("                    (steps directory does not exist)");
    }

    if let Some(connections) = &info.connections {
        println!();
        println!("Connections:");
        for conn in connections {
            println!(
                "  {:<10} {}",
                conn.database.name(),
                conn.url.as_deref().unwrap_or("Not configured")
            );
        }
    }

    eprintln!();
    eprintln!("Tips:");
    eprintln!("  Use --verbose (-v) to see the resolved database URLs");
    eprintln!("  Use --format json for machine-readable output");
    eprintln!("  Edit ~/.wfdb/wfdb-admin.toml or set WFDB_ADMIN_* variables to customize settings");
    Ok(())
}
