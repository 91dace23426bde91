use clap::{Parser, Subcommand};
use tracing::Level;
use wfdb_admin::{AdminConfig, OutputFormat};

mod commands;

use commands::{
    config::ConfigArgs, downgrade::DowngradeArgs, steps::StepsArgs, update::UpdateArgs,
    verify::VerifyArgs, version::VersionArgs,
};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.wfdb/wfdb-admin.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    /// Use this database URL for every database, e.g. sqlite:////tmp/workflow.db
    #[clap(long, global = true)]
    database_url: Option<String>,

    /// Workflow submit directory holding the WORKFLOW database
    #[clap(long, global = true)]
    submit_dir: Option<String>,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that databases are at the schema version of a release
    Verify(VerifyArgs),

    /// Show the current schema version of each database
    Version(VersionArgs),

    /// Upgrade databases to the schema version of a release
    Update(UpdateArgs),

    /// Downgrade databases to the schema version of a release
    Downgrade(DowngradeArgs),

    /// List registered version steps and known releases
    Steps(StepsArgs),

    /// Show the effective configuration
    Config(ConfigArgs),
}

fn main() {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            // show step-level events from the tracker and the orchestrator
            .with_max_level(Level::DEBUG)
            .init();
    }

    let mut config = match AdminConfig::new(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };
    if cli.database_url.is_some() {
        config.database_url = cli.database_url;
    }
    if cli.submit_dir.is_some() {
        config.submit_dir = cli.submit_dir;
    }

    let output_format = cli.format;
    let result = match cli.command {
        Commands::Verify(args) => commands::verify::run(&config, args, output_format),
        Commands::Version(args) => commands::version::run(&config, args, output_format),
        Commands::Update(args) => commands::update::run(&config, args, output_format),
        Commands::Downgrade(args) => commands::downgrade::run(&config, args, output_format),
        Commands::Steps(args) => commands::steps::run(&config, args, output_format),
        Commands::Config(args) => commands::config::run(&config, args, output_format),
    };

    if let Err(e) = result {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}
