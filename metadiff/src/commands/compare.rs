// metadiff/src/commands/compare.rs
//
// USE CASE: Extract both configured sources, stage them, report on the pair.

use std::path::PathBuf;

use metadiff_core::application::{CompareOptions, run_comparison};
use metadiff_core::infrastructure::config::FileSecretStore;

use super::{fail, load_config, print_output, report_filters};
use crate::cli::ReportArgs;
use crate::commands::stage::print_summary;

pub async fn execute(config: Option<PathBuf>, report_args: ReportArgs) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    let mut project = load_config(config.as_deref())?;
    if let Some(dir) = &report_args.output_dir {
        project.settings.report.output_dir = dir.clone();
    }
    let (filter, mapping) = report_filters(&report_args)?;

    for source in &project.sources {
        let identity = source.identity();
        println!("   Source: {} ({})", identity.label, identity.kind);
    }
    println!("   Warehouse: {}", project.warehouse.kind());

    let options = CompareOptions {
        format: report_args.format,
        filter,
        mapping,
    };
    let secrets = FileSecretStore::from_env();
    let outcome = match run_comparison(&project, &secrets, &options).await {
        Ok(outcome) => outcome,
        Err(e) => fail("COMPARISON", e),
    };

    for extract in &outcome.extracts {
        println!(
            "📦 {} ({} files, {} rows)",
            extract.archive.display(),
            extract.files.len(),
            extract.total_rows
        );
    }
    print_summary(&outcome.staged);
    print_output(&outcome.output);

    println!("\n✨ SUCCESS! Comparison finished in {:.2?}", start.elapsed());
    Ok(())
}
