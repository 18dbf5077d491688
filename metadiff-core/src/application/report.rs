// metadiff-core/src/application/report.rs

use chrono::Local;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::application::engine::run_named_query;
use crate::application::ports::ReportRenderer;
use crate::domain::comparison::SectionTemplate;
use crate::domain::error::DomainError;
use crate::domain::instance::InstancePair;
use crate::domain::kind::ReportFormat;
use crate::domain::report::{ComparisonReport, SectionResult};
use crate::domain::template::{ReportBindings, SchemaFilter, SchemaMapping};
use crate::error::MetadiffError;
use crate::infrastructure::audit::QueryAuditLog;
use crate::infrastructure::render::{HtmlRenderer, TextRenderer, write_html_report};
use crate::ports::connector::Connector;

#[derive(Debug, Clone)]
pub struct ReportRequest<'a> {
    pub schema: &'a str,
    /// Value of `<dataset_name>`.
    pub dataset: &'a str,
    pub instance_table: &'a str,
    pub instance_key: &'a str,
    pub sections: &'a [SectionTemplate],
    pub filter: Option<&'a SchemaFilter>,
    pub mapping: Option<&'a SchemaMapping>,
    pub audit_log: &'a Path,
}

/// The two instances present in the staged data, by first appearance.
pub async fn discover_instances(
    connector: &dyn Connector,
    schema: &str,
    table: &str,
    key: &str,
) -> Result<InstancePair, MetadiffError> {
    let values = connector.list_distinct(schema, table, key).await?;
    let found = values.len();
    InstancePair::from_values(values).ok_or_else(|| {
        DomainError::NotEnoughInstances {
            table: format!("{}.{}", schema, table),
            found,
        }
        .into()
    })
}

/// Resolve every section against the instance pair, then run them in config order.
#[instrument(skip_all, fields(schema = request.schema, sections = request.sections.len()))]
pub async fn run_report(
    connector: &dyn Connector,
    request: &ReportRequest<'_>,
) -> Result<ComparisonReport, MetadiffError> {
    let mut audit = QueryAuditLog::create(request.audit_log)?;

    let instances = discover_instances(
        connector,
        request.schema,
        request.instance_table,
        request.instance_key,
    )
    .await?;
    info!(first = %instances.first, second = %instances.second, "Comparing instances");

    let bindings = ReportBindings {
        instances: &instances,
        filter: request.filter,
        mapping: request.mapping,
        dataset: request.dataset,
    }
    .to_bindings();

    let resolved = request
        .sections
        .iter()
        .map(|section| Ok((section, bindings.resolve(&section.file_name, &section.sql)?)))
        .collect::<Result<Vec<_>, DomainError>>()?;

    let mut sections = Vec::with_capacity(resolved.len());
    for (section, sql) in resolved {
        audit.record(&section.file_name, &sql)?;
        let rows = run_named_query(connector, &section.file_name, &sql).await?;
        info!(section = %section.title, rows = rows.len(), "Section executed");
        sections.push(SectionResult {
            title: section.title.clone(),
            template: section.file_name.clone(),
            records: rows.into_records(),
        });
    }

    Ok(ComparisonReport {
        instances,
        sections,
        generated_at: Local::now(),
    })
}

/// Where a rendered report ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportOutput {
    Text(String),
    Html(PathBuf),
}

/// Render `report`; HTML is written to `output_dir`, text is returned for printing.
pub fn publish_report(
    report: &ComparisonReport,
    format: ReportFormat,
    output_dir: &Path,
) -> Result<ReportOutput, MetadiffError> {
    match format {
        ReportFormat::Text => Ok(ReportOutput::Text(TextRenderer.render(report)?)),
        ReportFormat::Html => {
            let html = HtmlRenderer::new()?.render(report)?;
            let path = write_html_report(output_dir, &html, report)?;
            info!(path = ?path, "HTML report written");
            Ok(ReportOutput::Html(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::DuckDBConnector;
    use anyhow::Result;
    use tempfile::tempdir;

    async fn staged() -> Result<DuckDBConnector> {
        let connector = DuckDBConnector::new(":memory:")?;
        connector
            .execute(
                "CREATE SCHEMA stage;
                 CREATE TABLE stage.instances (pkey VARCHAR);
                 INSERT INTO stage.instances VALUES ('orcl'), ('orcl'), ('pgprod'), ('third');
                 CREATE TABLE stage.tables (pkey VARCHAR, owner VARCHAR, table_name VARCHAR);
                 INSERT INTO stage.tables VALUES ('orcl', 'HR', 'EMP'), ('orcl', 'HR', 'DEPT'), ('pgprod', 'HR', 'EMP');",
            )
            .await?;
        Ok(connector)
    }

    fn section(title: &str, file: &str, sql: &str) -> SectionTemplate {
        SectionTemplate {
            title: title.into(),
            file_name: file.into(),
            sql: sql.into(),
        }
    }

    #[tokio::test]
    async fn test_instances_first_two_distinct() -> Result<()> {
        let connector = staged().await?;
        let pair = discover_instances(&connector, "stage", "instances", "pkey").await?;
        assert_eq!(pair.first, "orcl");
        assert_eq!(pair.second, "pgprod");
        Ok(())
    }

    #[tokio::test]
    async fn test_single_instance_is_an_error() -> Result<()> {
        let connector = DuckDBConnector::new(":memory:")?;
        connector
            .execute("CREATE SCHEMA stage; CREATE TABLE stage.instances (pkey VARCHAR); INSERT INTO stage.instances VALUES ('only');")
            .await?;
        let err = discover_instances(&connector, "stage", "instances", "pkey").await;
        assert!(matches!(
            err,
            Err(MetadiffError::Domain(DomainError::NotEnoughInstances { found: 1, .. }))
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_missing_tables_section_and_empty_section() -> Result<()> {
        let dir = tempdir()?;
        let audit = dir.path().join("executed_reporter_queries.sql");
        let connector = staged().await?;
        let sections = vec![
            section(
                "Tables",
                "tables.sql",
                "SELECT i1.owner, i1.table_name FROM <dataset_name>.tables i1 \
                 WHERE i1.pkey = '<instance_1_id>' <schema_filter> AND NOT EXISTS \
                 (SELECT 1 FROM <dataset_name>.tables i2 WHERE i2.pkey = '<instance_2_id>' \
                 AND i2.table_name = i1.table_name) ORDER BY 2",
            ),
            section(
                "Columns",
                "columns.sql",
                "SELECT owner FROM <dataset_name>.tables <w_schema_filter> LIMIT 0",
            ),
        ];
        let filter = SchemaFilter::parse("HR");
        let request = ReportRequest {
            schema: "stage",
            dataset: "stage",
            instance_table: "instances",
            instance_key: "pkey",
            sections: &sections,
            filter: filter.as_ref(),
            mapping: None,
            audit_log: &audit,
        };

        let report = run_report(&connector, &request).await?;
        assert_eq!(report.sections.len(), 2);
        assert_eq!(report.sections[0].records.len(), 1);
        assert_eq!(
            report.sections[0].records[0].get("table_name").map(|v| v.to_string()),
            Some("DEPT".to_string())
        );
        assert!(report.sections[1].records.is_empty());

        let text = match publish_report(&report, ReportFormat::Text, dir.path())? {
            ReportOutput::Text(text) => text,
            other => anyhow::bail!("unexpected output {other:?}"),
        };
        let columns = text.split("### Columns").nth(1).unwrap_or_default();
        assert!(columns.contains("No results found."));

        let log = std::fs::read_to_string(&audit)?;
        assert!(log.contains("Executed Query tables.sql:"));
        assert!(log.contains("i1.OWNER in ('HR')"));
        assert!(log.contains("Executed Query columns.sql:"));
        Ok(())
    }

    #[tokio::test]
    async fn test_unresolved_placeholder_runs_nothing() -> Result<()> {
        let dir = tempdir()?;
        let audit = dir.path().join("audit.sql");
        let connector = staged().await?;
        let sections = vec![
            section("Ok", "ok.sql", "SELECT 1"),
            section("Mapped", "mapped.sql", "SELECT '<instance_1_owner>'"),
        ];
        let request = ReportRequest {
            schema: "stage",
            dataset: "stage",
            instance_table: "instances",
            instance_key: "pkey",
            sections: &sections,
            filter: None,
            mapping: None,
            audit_log: &audit,
        };

        let err = run_report(&connector, &request).await;
        assert!(matches!(
            err,
            Err(MetadiffError::Domain(DomainError::UnresolvedPlaceholder { .. }))
        ));
        // Truncated at start, nothing executed.
        assert_eq!(std::fs::read_to_string(&audit)?, "");
        Ok(())
    }

    #[tokio::test]
    async fn test_html_is_written_to_output_dir() -> Result<()> {
        let dir = tempdir()?;
        let connector = staged().await?;
        let sections = vec![section("Instance Tables", "t.sql", "SELECT * FROM <dataset_name>.tables")];
        let request = ReportRequest {
            schema: "stage",
            dataset: "stage",
            instance_table: "instances",
            instance_key: "pkey",
            sections: &sections,
            filter: None,
            mapping: None,
            audit_log: &dir.path().join("audit.sql"),
        };
        let report = run_report(&connector, &request).await?;
        match publish_report(&report, ReportFormat::Html, dir.path())? {
            ReportOutput::Html(path) => {
                let html = std::fs::read_to_string(path)?;
                assert!(html.contains("href=\"#Instance_Tables\""));
                assert!(html.contains("id=\"Instance_Tables\""));
            }
            other => anyhow::bail!("unexpected output {other:?}"),
        }
        Ok(())
    }
}
