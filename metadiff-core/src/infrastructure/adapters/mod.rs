// metadiff-core/src/infrastructure/adapters/mod.rs

// Kind-aware connection factories. Callers get a `Connector` and never see the engine type.

pub mod duckdb;
#[cfg(feature = "oracle")]
pub mod oracle;
pub mod postgres;

use std::path::Path;
use tracing::info;

use crate::error::MetadiffError;
use crate::infrastructure::config::connection::{SourceConnection, SourceSpec, WarehouseConnection};
use crate::infrastructure::error::InfrastructureError;
use crate::ports::connector::Connector;
use crate::ports::secrets::SecretStore;

pub use self::duckdb::DuckDBConnector;
pub use self::postgres::PostgresConnector;

/// Open a connection to a metadata source.
pub async fn connect_source(
    spec: &SourceSpec,
    secrets: &dyn SecretStore,
) -> Result<Box<dyn Connector>, MetadiffError> {
    match &spec.connection {
        SourceConnection::Postgres(params) => {
            let config = params.to_config(secrets)?;
            info!(addr = %params.target(), "Connecting to Postgres source");
            let connector = PostgresConnector::connect(&config, &params.target()).await?;
            Ok(Box::new(connector))
        }
        SourceConnection::DuckDB(params) => {
            // Opening a missing file would silently create an empty database.
            if params.path != ":memory:" && !Path::new(&params.path).exists() {
                return Err(InfrastructureError::ConfigNotFound(params.path.clone()).into());
            }
            info!(path = %params.path, "Opening DuckDB source");
            Ok(Box::new(DuckDBConnector::new(&params.path)?))
        }
        SourceConnection::Oracle(params) => connect_oracle(params, secrets),
    }
}

#[cfg(feature = "oracle")]
fn connect_oracle(
    params: &crate::infrastructure::config::connection::OracleParams,
    secrets: &dyn SecretStore,
) -> Result<Box<dyn Connector>, MetadiffError> {
    let password = crate::ports::secrets::resolve_password(&params.password, secrets)?;
    let connect_string = self::oracle::easy_connect(
        params.protocol.as_deref(),
        &params.host,
        params.port,
        &params.service,
    );
    info!(addr = %connect_string, "Connecting to Oracle source");
    let connector = self::oracle::OracleConnector::connect(&params.user, &password, &connect_string)?;
    Ok(Box::new(connector))
}

#[cfg(not(feature = "oracle"))]
fn connect_oracle(
    _params: &crate::infrastructure::config::connection::OracleParams,
    _secrets: &dyn SecretStore,
) -> Result<Box<dyn Connector>, MetadiffError> {
    Err(InfrastructureError::ConfigError(
        "Oracle sources need metadiff built with the `oracle` feature".to_string(),
    )
    .into())
}

/// Open the staging warehouse.
pub async fn connect_warehouse(
    connection: &WarehouseConnection,
    secrets: &dyn SecretStore,
) -> Result<Box<dyn Connector>, MetadiffError> {
    match connection {
        WarehouseConnection::DuckDB(params) => {
            if let Some(parent) = Path::new(&params.path)
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
            {
                std::fs::create_dir_all(parent)?;
            }
            info!(path = %params.path, "Opening DuckDB warehouse");
            Ok(Box::new(DuckDBConnector::new(&params.path)?))
        }
        WarehouseConnection::Postgres(params) => {
            let config = params.to_config(secrets)?;
            info!(addr = %params.target(), "Connecting to Postgres warehouse");
            Ok(Box::new(
                PostgresConnector::connect(&config, &params.target()).await?,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::config::connection::DuckDBParams;
    use crate::infrastructure::config::secrets::FileSecretStore;
    use anyhow::Result;

    #[tokio::test]
    async fn test_missing_duckdb_source_is_rejected() -> Result<()> {
        let spec = SourceSpec::new(SourceConnection::DuckDB(DuckDBParams {
            path: "/nonexistent/source.duckdb".into(),
        }));
        let secrets = FileSecretStore::new("/nonexistent", None);
        assert!(connect_source(&spec, &secrets).await.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_in_memory_warehouse() -> Result<()> {
        let secrets = FileSecretStore::new("/nonexistent", None);
        let warehouse = connect_warehouse(
            &WarehouseConnection::DuckDB(DuckDBParams {
                path: ":memory:".into(),
            }),
            &secrets,
        )
        .await?;
        assert_eq!(warehouse.engine_name(), "duckdb");
        Ok(())
    }

    #[cfg(not(feature = "oracle"))]
    #[tokio::test]
    async fn test_oracle_without_feature_is_config_error() -> Result<()> {
        use crate::infrastructure::config::connection::OracleParams;

        let spec = SourceSpec::new(SourceConnection::Oracle(OracleParams {
            host: "db01".into(),
            port: 1521,
            service: "ORCL".into(),
            user: "scott".into(),
            password: "tiger".into(),
            protocol: None,
        }));
        let secrets = FileSecretStore::new("/nonexistent", None);
        let err = connect_source(&spec, &secrets).await;
        assert!(matches!(
            err,
            Err(MetadiffError::Infrastructure(InfrastructureError::ConfigError(_)))
        ));
        Ok(())
    }
}
