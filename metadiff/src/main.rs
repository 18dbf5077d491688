// metadiff/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr: stdout carries the text report.
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { source } => commands::extract::execute(cli.config, source).await,
        Commands::Stage { dir, warehouse } => {
            commands::stage::execute(cli.config, dir, warehouse).await
        }
        Commands::Report { warehouse, report } => {
            commands::report::execute(cli.config, warehouse, report).await
        }
        Commands::Compare { report } => commands::compare::execute(cli.config, report).await,
    }
}
