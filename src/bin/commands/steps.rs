use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use wfdb_admin::{AdminConfig, OutputFormat};

/// Arguments for the Steps command
#[derive(Args)]
pub struct StepsArgs {}

#[derive(Tabled, Serialize)]
struct StepRow {
    version: u32,
    releases: String,
    registered: bool,
}

pub fn run(config: &AdminConfig, _args: StepsArgs, output_format: OutputFormat) -> Result<()> {
    let orchestrator = super::open_orchestrator(config)?;
    let compatibility = orchestrator.compatibility();
    let registry = orchestrator.registry();

    let mut versions: Vec<u32> = (1..=compatibility.current_version()).collect();
    versions.extend(registry.versions());
    versions.sort_unstable();
    versions.dedup();

    let rows: Vec<StepRow> = versions
        .into_iter()
        .map(|version| StepRow {
            version,
            releases: compatibility
                .entries()
                .iter()
                .filter(|e| e.schema_version == version)
                .map(|e| e.release.as_str())
                .collect::<Vec<_>>()
                .join(", "),
            registered: registry.contains(version),
        })
        .collect();
    println!("{}", output_format.render(&rows)?);

    if !output_format.is_json() {
        eprintln!();
        eprintln!("Steps directory: {}", config.steps_dir);
    }
    Ok(())
}
