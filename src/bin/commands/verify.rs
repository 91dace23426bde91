use anyhow::{anyhow, Result};
use clap::Args;
use serde::Serialize;
use wfdb_admin::{AdminConfig, LogicalDatabase, OutputFormat};

/// Arguments for the Verify command
#[derive(Args)]
pub struct VerifyArgs {
    /// Release to verify against, e.g. 4.4.0; defaults to the newest release
    #[clap(short, long)]
    pub release: Option<String>,

    /// Only verify this database: catalogs, master or workflow
    #[clap(short, long)]
    pub database: Option<LogicalDatabase>,
}

#[derive(Serialize)]
struct VerifyResult {
    release: Option<String>,
    schema_version: u32,
    compatible: bool,
}

pub fn run(config: &AdminConfig, args: VerifyArgs, output_format: OutputFormat) -> Result<()> {
    let VerifyArgs { release, database } = args;

    let orchestrator = super::open_orchestrator(config)?;
    let schema_version = orchestrator.compatibility().resolve(release.as_deref())?;
    let compatible = orchestrator.verify(release.as_deref(), database)?;

    if output_format.is_json() {
        let result = VerifyResult {
            release: release.clone(),
            schema_version,
            compatible,
        };
        println!("{}", output_format.json(&result)?);
    } else if compatible {
        println!("Databases are compatible with schema version {}", schema_version);
    }

    if !compatible {
        return Err(anyhow!(
            "Databases are not compatible with schema version {}, run `wfdb-admin update`",
            schema_version
        ));
    }
    Ok(())
}
