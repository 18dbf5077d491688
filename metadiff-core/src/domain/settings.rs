// metadiff-core/src/domain/settings.rs

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::domain::kind::SourceKind;

/// Project settings (`metadiff.yaml`). Every field has a default, so an empty file is valid.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    #[serde(rename = "extracts-dir", default = "default_extracts_dir")]
    pub extracts_dir: PathBuf,

    #[serde(rename = "archive-dir", default = "default_archive_dir")]
    pub archive_dir: String,

    #[serde(rename = "exclude-patterns", default = "default_exclude_patterns")]
    pub exclude_patterns: Vec<String>,

    #[serde(rename = "staging-schema", default = "default_staging_schema")]
    pub staging_schema: String,

    #[serde(rename = "batch-size", default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default)]
    pub queries: QueryFiles,

    #[serde(default)]
    pub report: ReportSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            extracts_dir: default_extracts_dir(),
            archive_dir: default_archive_dir(),
            exclude_patterns: default_exclude_patterns(),
            staging_schema: default_staging_schema(),
            batch_size: default_batch_size(),
            queries: QueryFiles::default(),
            report: ReportSettings::default(),
        }
    }
}

impl Settings {
    /// Make relative paths relative to `base` (the directory of the settings file).
    pub fn rebase(&mut self, base: &Path) {
        rebase(&mut self.extracts_dir, base);
        rebase(&mut self.queries.oracle, base);
        rebase(&mut self.queries.postgres, base);
        rebase(&mut self.queries.duckdb, base);
        let report = &mut self.report;
        for path in [
            &mut report.config,
            &mut report.queries_dir,
            &mut report.mapped_config,
            &mut report.mapped_queries_dir,
            &mut report.audit_log,
            &mut report.output_dir,
        ] {
            rebase(path, base);
        }
    }

    pub fn query_file(&self, kind: SourceKind) -> &Path {
        match kind {
            SourceKind::Oracle => &self.queries.oracle,
            SourceKind::Postgres => &self.queries.postgres,
            SourceKind::DuckDB => &self.queries.duckdb,
        }
    }
}

fn rebase(path: &mut PathBuf, base: &Path) {
    if path.is_relative() {
        *path = base.join(&*path);
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct QueryFiles {
    #[serde(default = "default_oracle_queries")]
    pub oracle: PathBuf,
    #[serde(default = "default_postgres_queries")]
    pub postgres: PathBuf,
    #[serde(default = "default_duckdb_queries")]
    pub duckdb: PathBuf,
}

impl Default for QueryFiles {
    fn default() -> Self {
        Self {
            oracle: default_oracle_queries(),
            postgres: default_postgres_queries(),
            duckdb: default_duckdb_queries(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ReportSettings {
    #[serde(default = "default_report_config")]
    pub config: PathBuf,

    #[serde(rename = "queries-dir", default = "default_report_queries_dir")]
    pub queries_dir: PathBuf,

    #[serde(rename = "mapped-config", default = "default_mapped_config")]
    pub mapped_config: PathBuf,

    #[serde(rename = "mapped-queries-dir", default = "default_mapped_queries_dir")]
    pub mapped_queries_dir: PathBuf,

    #[serde(rename = "audit-log", default = "default_audit_log")]
    pub audit_log: PathBuf,

    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: PathBuf,

    #[serde(rename = "instance-table", default = "default_instance_table")]
    pub instance_table: String,

    #[serde(rename = "instance-key", default = "default_instance_key")]
    pub instance_key: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            config: default_report_config(),
            queries_dir: default_report_queries_dir(),
            mapped_config: default_mapped_config(),
            mapped_queries_dir: default_mapped_queries_dir(),
            audit_log: default_audit_log(),
            output_dir: default_output_dir(),
            instance_table: default_instance_table(),
            instance_key: default_instance_key(),
        }
    }
}

impl ReportSettings {
    /// Config file and template directory, switching to the mapped variants when a schema
    /// mapping is in effect.
    pub fn layout(&self, mapped: bool) -> (&Path, &Path) {
        if mapped {
            (&self.mapped_config, &self.mapped_queries_dir)
        } else {
            (&self.config, &self.queries_dir)
        }
    }
}

fn default_extracts_dir() -> PathBuf {
    PathBuf::from("extracts")
}
fn default_archive_dir() -> String {
    "archives".to_string()
}
fn default_exclude_patterns() -> Vec<String> {
    vec!["defines".to_string(), "eoj".to_string()]
}
fn default_staging_schema() -> String {
    "schema_compare".to_string()
}
fn default_batch_size() -> usize {
    500
}
fn default_oracle_queries() -> PathBuf {
    PathBuf::from("assets/queries/oracle.yaml")
}
fn default_postgres_queries() -> PathBuf {
    PathBuf::from("assets/queries/postgres.yaml")
}
fn default_duckdb_queries() -> PathBuf {
    PathBuf::from("assets/queries/duckdb.yaml")
}
fn default_report_config() -> PathBuf {
    PathBuf::from("assets/report/query_config.yaml")
}
fn default_report_queries_dir() -> PathBuf {
    PathBuf::from("assets/report/queries")
}
fn default_mapped_config() -> PathBuf {
    PathBuf::from("assets/report/query_config_schema_mapped.yaml")
}
fn default_mapped_queries_dir() -> PathBuf {
    PathBuf::from("assets/report/queries_schema_mapped")
}
fn default_audit_log() -> PathBuf {
    PathBuf::from("executed_reporter_queries.sql")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_instance_table() -> String {
    "instances".to_string()
}
fn default_instance_key() -> String {
    "pkey".to_string()
}
