// metadiff/src/commands/extract.rs
//
// USE CASE: Extract one database's catalog metadata into an archive.

use std::path::PathBuf;

use metadiff_core::application::extract_source;
use metadiff_core::infrastructure::config::{
    DuckDBParams, FileSecretStore, OracleParams, PostgresParams, SourceConnection, SourceSpec,
};

use super::{fail, load_config};
use crate::cli::{ExtractArgs, ExtractSource};

fn into_spec(source: ExtractSource) -> (SourceSpec, ExtractArgs) {
    let (connection, args) = match source {
        ExtractSource::Postgres { connection, extract } => (
            SourceConnection::Postgres(PostgresParams {
                url: connection.url,
                host: connection.host,
                port: connection.port,
                database: connection.database,
                user: connection.user,
                password: connection.password,
            }),
            extract,
        ),
        ExtractSource::Oracle { connection, extract } => (
            SourceConnection::Oracle(OracleParams {
                host: connection.host,
                port: connection.port,
                service: connection.service,
                user: connection.user,
                password: connection.password,
                protocol: connection.protocol,
            }),
            extract,
        ),
        ExtractSource::Duckdb { path, extract } => {
            (SourceConnection::DuckDB(DuckDBParams { path }), extract)
        }
    };

    let mut spec = SourceSpec::new(connection);
    spec.alias = args.alias.clone();
    spec.view_type = args.view_type;
    spec.host_prefix = !args.no_host_prefix;
    (spec, args)
}

pub async fn execute(config: Option<PathBuf>, source: ExtractSource) -> anyhow::Result<()> {
    let start = std::time::Instant::now();
    let project = load_config(config.as_deref())?;
    let (spec, args) = into_spec(source);
    let identity = spec.identity();
    let out_dir = args
        .out
        .clone()
        .unwrap_or_else(|| project.settings.extracts_dir.clone());

    println!(
        "📦 Extracting {} metadata from '{}' ({} views)...",
        identity.kind, identity.label, spec.view_type
    );

    let secrets = FileSecretStore::from_env();
    let outcome = match extract_source(
        &spec,
        &project.settings,
        args.queries.as_deref(),
        &out_dir,
        &secrets,
    )
    .await
    {
        Ok(outcome) => outcome,
        Err(e) => fail("EXTRACTION", e),
    };

    for file in &outcome.files {
        println!("   ➜ {}", file);
    }
    println!(
        "\n✨ {} rows archived to {} in {:.2?}",
        outcome.total_rows,
        outcome.archive.display(),
        start.elapsed()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use metadiff_core::domain::kind::ViewType;

    #[test]
    fn test_flags_become_a_source_spec() {
        let (spec, _) = into_spec(ExtractSource::Duckdb {
            path: "/data/inventory.duckdb".into(),
            extract: ExtractArgs {
                queries: None,
                out: None,
                alias: Some("inv".into()),
                view_type: ViewType::Dba,
                no_host_prefix: true,
            },
        });
        assert_eq!(spec.alias.as_deref(), Some("inv"));
        assert_eq!(spec.view_type, ViewType::Dba);
        assert!(!spec.host_prefix);
        assert_eq!(spec.identity().label, "inv");
    }
}
