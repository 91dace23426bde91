use anyhow::{anyhow, Result};
use clap::Args;
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::Tabled;
use wfdb_admin::{AdminConfig, CurrentVersion, LogicalDatabase, OutputFormat};

/// Arguments for the Version command
#[derive(Args)]
pub struct VersionArgs {
    /// Only show this database: catalogs, master or workflow
    #[clap(short, long)]
    pub database: Option<LogicalDatabase>,

    /// Show release identifiers instead of schema version numbers
    #[clap(short, long)]
    pub release: bool,
}

#[derive(Tabled, Serialize)]
struct VersionRow {
    database: String,
    version: String,
}

pub fn run(config: &AdminConfig, args: VersionArgs, output_format: OutputFormat) -> Result<()> {
    let VersionArgs { database, release } = args;

    let orchestrator = super::open_orchestrator(config)?;

    if output_format.is_json() {
        let versions = orchestrator.current_version(database, release, false)?;
        println!("{}", output_format.json(&versions)?);
        return check_errors(&versions);
    }

    let versions = orchestrator.current_version(database, release, true)?;
    let rows: Vec<VersionRow> = versions
        .iter()
        .map(|(database, version)| VersionRow {
            database: database.clone(),
            version: version.to_string(),
        })
        .collect();
    println!("{}", output_format.render(&rows)?);
    check_errors(&versions)
}

fn check_errors(versions: &BTreeMap<String, CurrentVersion>) -> Result<()> {
    let failed = versions
        .values()
        .filter(|v| matches!(v, CurrentVersion::Error { .. }))
        .count();
    if failed > 0 {
        return Err(anyhow!(
            "unable to determine the version of {} database(s)",
            failed
        ));
    }
    Ok(())
}
