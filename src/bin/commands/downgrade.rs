use anyhow::Result;
use clap::Args;
use wfdb_admin::{AdminConfig, LogicalDatabase, OutputFormat};

/// Arguments for the Downgrade command
#[derive(Args)]
pub struct DowngradeArgs {
    /// Release to downgrade to, e.g. 4.3.0; defaults to one version below the newest
    #[clap(short, long)]
    pub release: Option<String>,

    /// Only downgrade this database: catalogs, master or workflow
    #[clap(short, long)]
    pub database: Option<LogicalDatabase>,

    /// Apply steps even when their safety checks fail, e.g. when data would be lost
    #[clap(long)]
    pub force: bool,
}

pub fn run(config: &AdminConfig, args: DowngradeArgs, output_format: OutputFormat) -> Result<()> {
    let DowngradeArgs {
        release,
        database,
        force,
    } = args;

    let orchestrator = super::open_orchestrator(config)?;
    let report = orchestrator.downgrade(release.as_deref(), database, force)?;
    super::print_report(report, output_format)
}
