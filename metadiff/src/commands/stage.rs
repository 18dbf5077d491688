// metadiff/src/commands/stage.rs
//
// USE CASE: Load extract archives into the staging schema.

use std::path::PathBuf;

use metadiff_core::application::{StageReport, stage_extracts};
use metadiff_core::infrastructure::config::FileSecretStore;

use super::{fail, load_config, resolve_warehouse, staging_schema};
use crate::cli::WarehouseArgs;

pub async fn execute(
    config: Option<PathBuf>,
    dir: Option<PathBuf>,
    warehouse_args: WarehouseArgs,
) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    let project = load_config(config.as_deref())?;
    let warehouse = resolve_warehouse(&warehouse_args, &project)?;
    let schema = staging_schema(&warehouse_args, &project);
    let dir = dir.unwrap_or_else(|| project.settings.extracts_dir.clone());

    println!(
        "🚚 Staging '{}' into {} schema '{}'...",
        dir.display(),
        warehouse.kind(),
        schema
    );

    let secrets = FileSecretStore::from_env();
    let report = match stage_extracts(&warehouse, &project.settings, &dir, &schema, &secrets).await
    {
        Ok(report) => report,
        Err(e) => fail("STAGING", e),
    };

    print_summary(&report);
    println!("\n✨ Staging finished in {:.2?}", start.elapsed());
    Ok(())
}

pub fn print_summary(report: &StageReport) {
    for loaded in &report.loaded {
        println!("   ➜ {} → {} ({} rows)", loaded.file, loaded.table, loaded.rows);
    }
    for archive in &report.corrupt_archives {
        eprintln!("   ⚠️  Corrupt archive skipped: {}", archive.display());
    }
    for name in &report.skipped {
        eprintln!("   ⚠️  No table name in '{}', left in place", name);
    }
    for (file, error) in &report.failed {
        eprintln!("   ❌ {}: {}", file, error);
    }
    println!(
        "📊 {} files, {} rows, {} failed",
        report.loaded.len(),
        report.total_rows(),
        report.failed.len()
    );
}
