// metadiff/src/commands/mod.rs
//
// Shared plumbing between commands: settings, warehouse selection, report flags.

pub mod compare;
pub mod extract;
pub mod report;
pub mod stage;

use anyhow::{Context, bail};
use std::path::Path;
use tracing::debug;

use metadiff_core::MetadiffError;
use metadiff_core::application::ReportOutput;
use metadiff_core::domain::kind::WarehouseKind;
use metadiff_core::domain::template::{SchemaFilter, SchemaMapping};
use metadiff_core::infrastructure::config::project::load_project_config;
use metadiff_core::infrastructure::config::{
    DuckDBParams, PostgresParams, ProjectConfig, WarehouseConnection,
};

use crate::cli::{ReportArgs, WarehouseArgs};

/// Settings from `--config` or the current directory.
pub fn load_config(config: Option<&Path>) -> anyhow::Result<ProjectConfig> {
    println!("⚙️  Loading configuration...");
    let project_dir = std::env::current_dir()?;
    debug!(project_dir = ?project_dir, config = ?config, "Resolving settings");
    load_project_config(config, &project_dir).with_context(|| {
        format!(
            "Failed to load settings from {:?}",
            config.unwrap_or(project_dir.as_path())
        )
    })
}

/// Warehouse flags layered over the settings' warehouse.
pub fn resolve_warehouse(
    args: &WarehouseArgs,
    config: &ProjectConfig,
) -> anyhow::Result<WarehouseConnection> {
    let kind = args
        .warehouse
        .or_else(|| args.warehouse_url.as_ref().map(|_| WarehouseKind::Postgres))
        .or_else(|| args.warehouse_path.as_ref().map(|_| WarehouseKind::DuckDB))
        .unwrap_or_else(|| config.warehouse.kind());

    match kind {
        WarehouseKind::DuckDB => match (&args.warehouse_path, &config.warehouse) {
            (Some(path), _) => Ok(WarehouseConnection::DuckDB(DuckDBParams { path: path.clone() })),
            (None, WarehouseConnection::DuckDB(params)) => {
                Ok(WarehouseConnection::DuckDB(params.clone()))
            }
            (None, _) => bail!(
                "❌ A DuckDB warehouse needs --warehouse-path or a duckdb `warehouse` in the settings"
            ),
        },
        WarehouseKind::Postgres => match (&args.warehouse_url, &config.warehouse) {
            (Some(url), _) => Ok(WarehouseConnection::Postgres(PostgresParams {
                url: Some(url.clone()),
                ..PostgresParams::default()
            })),
            (None, WarehouseConnection::Postgres(params)) => {
                Ok(WarehouseConnection::Postgres(params.clone()))
            }
            (None, _) => bail!(
                "❌ A Postgres warehouse needs --warehouse-url or a postgres `warehouse` in the settings"
            ),
        },
    }
}

pub fn staging_schema(args: &WarehouseArgs, config: &ProjectConfig) -> String {
    args.schema
        .clone()
        .unwrap_or_else(|| config.settings.staging_schema.clone())
}

pub fn report_filters(
    args: &ReportArgs,
) -> anyhow::Result<(Option<SchemaFilter>, Option<SchemaMapping>)> {
    let filter = args.schemas_to_compare.as_deref().and_then(SchemaFilter::parse);
    let mapping = args
        .schema_mapping
        .as_deref()
        .map(SchemaMapping::parse)
        .transpose()?;
    Ok((filter, mapping))
}

pub fn print_output(output: &ReportOutput) {
    match output {
        ReportOutput::Text(text) => println!("\n{}", text),
        ReportOutput::Html(path) => println!("✨ Report written to {}", path.display()),
    }
}

/// Print a pipeline failure with its diagnostic and exit non-zero.
pub fn fail(stage: &str, err: MetadiffError) -> ! {
    eprintln!("\n💥 {} FAILED", stage);
    eprintln!("{:?}", miette::Report::new(err));
    std::process::exit(1);
}
