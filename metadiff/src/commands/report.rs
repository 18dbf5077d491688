// metadiff/src/commands/report.rs
//
// USE CASE: Run the comparison templates against staged data and render the report.

use std::path::PathBuf;

use metadiff_core::application::{build_report, publish_report};
use metadiff_core::infrastructure::config::FileSecretStore;

use super::{fail, load_config, print_output, report_filters, resolve_warehouse, staging_schema};
use crate::cli::{ReportArgs, WarehouseArgs};

pub async fn execute(
    config: Option<PathBuf>,
    warehouse_args: WarehouseArgs,
    report_args: ReportArgs,
) -> anyhow::Result<()> {
    let mut project = load_config(config.as_deref())?;
    if let Some(dir) = &report_args.output_dir {
        project.settings.report.output_dir = dir.clone();
    }
    let warehouse = resolve_warehouse(&warehouse_args, &project)?;
    let schema = staging_schema(&warehouse_args, &project);
    let (filter, mapping) = report_filters(&report_args)?;

    println!("📊 Comparing instances staged in '{}'...", schema);

    let secrets = FileSecretStore::from_env();
    let report = match build_report(
        &warehouse,
        &project.settings,
        &schema,
        filter.as_ref(),
        mapping.as_ref(),
        &secrets,
    )
    .await
    {
        Ok(report) => report,
        Err(e) => fail("REPORT", e),
    };
    println!(
        "   Instances: {} ↔ {} ({} sections)",
        report.instances.first,
        report.instances.second,
        report.sections.len()
    );

    match publish_report(&report, report_args.format, &project.settings.report.output_dir) {
        Ok(output) => print_output(&output),
        Err(e) => fail("RENDERING", e),
    }
    Ok(())
}
