use anyhow::{Context, Result};
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// A scratch project: two DuckDB sources, a settings file pointing at the shipped assets.
struct MetadiffTestEnv {
    _tmp: TempDir,
    root: PathBuf,
}

impl MetadiffTestEnv {
    fn new() -> Result<Self> {
        let tmp = tempfile::tempdir()?;
        let root = tmp.path().to_path_buf();
        let assets = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .parent()
            .context("Workspace root not found")?
            .join("assets");

        Self::create_source(
            &root.join("alpha.duckdb"),
            "CREATE SCHEMA hr;
             CREATE TABLE hr.emp (id INTEGER, name VARCHAR);
             CREATE TABLE hr.dept (id INTEGER);",
        )?;
        Self::create_source(
            &root.join("beta.duckdb"),
            "CREATE SCHEMA hr;
             CREATE TABLE hr.emp (id INTEGER, name VARCHAR);",
        )?;

        let settings = format!(
            r#"
extracts-dir: extracts
queries:
  duckdb: {assets}/queries/duckdb.yaml
report:
  config: {assets}/report/query_config.yaml
  queries-dir: {assets}/report/queries
  mapped-config: {assets}/report/query_config_schema_mapped.yaml
  mapped-queries-dir: {assets}/report/queries_schema_mapped
warehouse:
  type: duckdb
  path: warehouse.duckdb
sources:
  - type: duckdb
    path: {root}/alpha.duckdb
  - type: duckdb
    path: {root}/beta.duckdb
"#,
            assets = assets.display(),
            root = root.display()
        );
        std::fs::write(root.join("metadiff.yaml"), settings)?;

        Ok(Self { _tmp: tmp, root })
    }

    fn create_source(path: &Path, ddl: &str) -> Result<()> {
        let conn = duckdb::Connection::open(path)?;
        conn.execute_batch(ddl)?;
        Ok(())
    }

    fn metadiff(&self) -> Command {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("metadiff"));
        cmd.current_dir(&self.root);
        cmd
    }
}

#[test]
fn test_compare_prints_text_report() -> Result<()> {
    let env = MetadiffTestEnv::new()?;

    env.metadiff()
        .args(["compare", "--format", "text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("## Database Comparison Report"))
        .stdout(predicate::str::contains("Instance 1: alpha"))
        .stdout(predicate::str::contains("### Missing Tables"))
        .stdout(predicate::str::contains("dept"));

    assert!(env.root.join("executed_reporter_queries.sql").exists());
    Ok(())
}

#[test]
fn test_extract_stage_report_step_by_step() -> Result<()> {
    let env = MetadiffTestEnv::new()?;

    for source in ["alpha.duckdb", "beta.duckdb"] {
        let path = env.root.join(source);
        env.metadiff()
            .args(["extract", "duckdb", "--path"])
            .arg(&path)
            .assert()
            .success()
            .stdout(predicate::str::contains("archived to"));
    }
    assert!(env.root.join("extracts/duckdb-extract-alpha.zip").exists());

    env.metadiff()
        .args(["stage", "--warehouse-path", "steps.duckdb"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12 files"));

    env.metadiff()
        .args([
            "report",
            "--warehouse-path",
            "steps.duckdb",
            "--output-dir",
            "reports",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("database_comparison_report_"));
    assert_eq!(std::fs::read_dir(env.root.join("reports"))?.count(), 1);
    Ok(())
}

#[test]
fn test_missing_source_file_fails() -> Result<()> {
    let env = MetadiffTestEnv::new()?;
    env.metadiff()
        .args(["extract", "duckdb", "--path", "nowhere.duckdb"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("EXTRACTION FAILED"));
    assert!(!env.root.join("nowhere.duckdb").exists());
    Ok(())
}

#[test]
fn test_malformed_schema_mapping_fails() -> Result<()> {
    let env = MetadiffTestEnv::new()?;
    env.metadiff()
        .args(["report", "--schema-mapping", "HR"])
        .assert()
        .failure();
    Ok(())
}
