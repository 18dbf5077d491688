// metadiff-core/src/application/pipeline.rs

// Stage orchestration. Each step opens its own connection and drops it before returning,
// so a DuckDB warehouse file is never held by two steps at once.

use std::path::Path;
use tracing::{info, instrument};

use crate::application::extract::{ExtractOutcome, ExtractRequest, run_extraction};
use crate::application::report::{ReportOutput, ReportRequest, publish_report, run_report};
use crate::application::stage::{StageOptions, StageReport, run_staging};
use crate::domain::kind::ReportFormat;
use crate::domain::report::ComparisonReport;
use crate::domain::settings::Settings;
use crate::domain::template::{SchemaFilter, SchemaMapping};
use crate::error::MetadiffError;
use crate::infrastructure::adapters::{connect_source, connect_warehouse};
use crate::infrastructure::config::connection::{SourceSpec, WarehouseConnection};
use crate::infrastructure::config::project::ProjectConfig;
use crate::infrastructure::config::queries::{load_comparison, load_query_set};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::secrets::SecretStore;

/// Extract one source into `out_dir`, using `queries` or the settings' query file for its kind.
#[instrument(skip_all, fields(source = %spec.identity().label))]
pub async fn extract_source(
    spec: &SourceSpec,
    settings: &Settings,
    queries: Option<&Path>,
    out_dir: &Path,
    secrets: &dyn SecretStore,
) -> Result<ExtractOutcome, MetadiffError> {
    let identity = spec.identity();
    let query_file = queries.unwrap_or_else(|| settings.query_file(identity.kind));
    let query_set = load_query_set(query_file)?;

    let connector = connect_source(spec, secrets).await?;
    let request = ExtractRequest {
        identity: &identity,
        queries: &query_set,
        view_type: spec.view_type,
        user: spec.connection.user(),
        host_prefix: spec.host_prefix,
        out_dir,
    };
    run_extraction(connector.as_ref(), &request).await
}

/// Stage every extract in `dir` into `schema` on `warehouse`.
pub async fn stage_extracts(
    warehouse: &WarehouseConnection,
    settings: &Settings,
    dir: &Path,
    schema: &str,
    secrets: &dyn SecretStore,
) -> Result<StageReport, MetadiffError> {
    let connector = connect_warehouse(warehouse, secrets).await?;
    let options = StageOptions {
        dir,
        schema,
        reset: warehouse.kind().reset_strategy(),
        exclude_patterns: &settings.exclude_patterns,
        archive_dir: &settings.archive_dir,
        batch_size: settings.batch_size,
    };
    run_staging(connector.as_ref(), &options).await
}

/// Run the comparison templates against the staged data. A mapping switches to the
/// schema-mapped config and template directory.
pub async fn build_report(
    warehouse: &WarehouseConnection,
    settings: &Settings,
    schema: &str,
    filter: Option<&SchemaFilter>,
    mapping: Option<&SchemaMapping>,
    secrets: &dyn SecretStore,
) -> Result<ComparisonReport, MetadiffError> {
    let report_settings = &settings.report;
    let (config_path, queries_dir) = report_settings.layout(mapping.is_some());
    let sections = load_comparison(config_path, queries_dir)?;

    let connector = connect_warehouse(warehouse, secrets).await?;
    let request = ReportRequest {
        schema,
        dataset: warehouse.kind().dataset_token(schema),
        instance_table: &report_settings.instance_table,
        instance_key: &report_settings.instance_key,
        sections: &sections,
        filter,
        mapping,
        audit_log: &report_settings.audit_log,
    };
    run_report(connector.as_ref(), &request).await
}

#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    pub format: ReportFormat,
    pub filter: Option<SchemaFilter>,
    pub mapping: Option<SchemaMapping>,
}

#[derive(Debug)]
pub struct CompareOutcome {
    pub extracts: Vec<ExtractOutcome>,
    pub staged: StageReport,
    pub report: ComparisonReport,
    pub output: ReportOutput,
}

/// Extract both configured sources in order, stage them, and report on the pair.
#[instrument(skip_all)]
pub async fn run_comparison(
    config: &ProjectConfig,
    secrets: &dyn SecretStore,
    options: &CompareOptions,
) -> Result<CompareOutcome, MetadiffError> {
    if config.sources.len() != 2 {
        return Err(InfrastructureError::ConfigError(format!(
            "compare needs exactly two sources, {} configured",
            config.sources.len()
        ))
        .into());
    }
    let settings = &config.settings;

    let mut extracts = Vec::with_capacity(2);
    for spec in &config.sources {
        let outcome = extract_source(spec, settings, None, &settings.extracts_dir, secrets).await?;
        info!(archive = ?outcome.archive, "Source extracted");
        extracts.push(outcome);
    }

    let staged = stage_extracts(
        &config.warehouse,
        settings,
        &settings.extracts_dir,
        &settings.staging_schema,
        secrets,
    )
    .await?;

    let report = build_report(
        &config.warehouse,
        settings,
        &settings.staging_schema,
        options.filter.as_ref(),
        options.mapping.as_ref(),
        secrets,
    )
    .await?;
    let output = publish_report(&report, options.format, &settings.report.output_dir)?;

    Ok(CompareOutcome {
        extracts,
        staged,
        report,
        output,
    })
}
