pub mod config;
pub mod downgrade;
pub mod steps;
pub mod update;
pub mod verify;
pub mod version;

use anyhow::{anyhow, Result};
use serde::Serialize;
use tabled::Tabled;
use wfdb_admin::{AdminConfig, MigrationOrchestrator, MigrationReport, OutputFormat};

pub(crate) fn open_orchestrator(config: &AdminConfig) -> Result<MigrationOrchestrator> {
    MigrationOrchestrator::from_config(config)
        .map_err(|e| anyhow!("Failed to open databases: {}", e))
}

#[derive(Tabled, Serialize)]
struct MigrationRow {
    database: String,
    from: String,
    to: String,
    target: u32,
    steps: String,
    status: String,
}

/// Print an update or downgrade report, failing if any database failed
pub(crate) fn print_report(report: MigrationReport, output_format: OutputFormat) -> Result<()> {
    let show = |v: Option<u32>| v.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string());

    if output_format.is_json() {
        println!("{}", output_format.json(&report)?);
    } else if report.databases.is_empty() {
        eprintln!("No configured databases");
    } else {
        let rows: Vec<MigrationRow> = report
            .databases
            .iter()
            .map(|db| MigrationRow {
                database: db.database.to_string(),
                from: show(db.from_version),
                to: show(db.to_version),
                target: db.target_version,
                steps: db
                    .steps
                    .iter()
                    .map(|v| v.to_string())
                    .collect::<Vec<_>>()
                    .join(","),
                status: match &db.error {
                    Some(e) => format!("failed: {}", e),
                    None => "ok".to_string(),
                },
            })
            .collect();
        println!("{}", output_format.render(&rows)?);
    }

    let failed = report.failures().count();
    if failed > 0 {
        return Err(anyhow!(
            "{} to v{} failed for {} database(s)",
            report.direction,
            report.target_version,
            failed
        ));
    }
    Ok(())
}
