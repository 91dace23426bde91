use anyhow::Result;
use clap::Args;
use wfdb_admin::{AdminConfig, LogicalDatabase, OutputFormat};

/// Arguments for the Update command
#[derive(Args)]
pub struct UpdateArgs {
    /// Release to upgrade to, e.g. 4.5.0; defaults to the newest release
    #[clap(short, long)]
    pub release: Option<String>,

    /// Only upgrade this database: catalogs, master or workflow
    #[clap(short, long)]
    pub database: Option<LogicalDatabase>,

    /// Apply steps even when their safety checks fail
    #[clap(long)]
    pub force: bool,
}

pub fn run(config: &AdminConfig, args: UpdateArgs, output_format: OutputFormat) -> Result<()> {
    let UpdateArgs {
        release,
        database,
        force,
    } = args;

    let orchestrator = super::open_orchestrator(config)?;
    let report = orchestrator.update(release.as_deref(), database, force)?;
    super::print_report(report, output_format)
}
