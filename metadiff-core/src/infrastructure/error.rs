// metadiff-core/src/infrastructure/error.rs

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(metadiff::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),

    #[error("Postgres Error: {0}")]
    #[diagnostic(code(metadiff::infra::database::postgres))]
    Postgres(#[from] tokio_postgres::Error),

    #[cfg(feature = "oracle")]
    #[error("Oracle Error: {0}")]
    #[diagnostic(code(metadiff::infra::database::oracle))]
    Oracle(#[from] oracle::Error),

    #[error("{0}")]
    #[diagnostic(code(metadiff::infra::database::unsupported))]
    Unsupported(String),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    #[error("Could not connect to {target}: {source}")]
    #[diagnostic(
        code(metadiff::infra::connection),
        help("Check host, port, credentials and network reachability.")
    )]
    Connection {
        target: String,
        #[source]
        source: DatabaseError,
    },

    #[error("Query '{name}' failed: {source}")]
    #[diagnostic(code(metadiff::infra::query))]
    QueryExecution {
        name: String,
        #[source]
        source: Box<crate::error::MetadiffError>,
    },

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(metadiff::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- ARCHIVES / DELIMITED FILES ---
    #[error("Corrupt archive {path:?}: {source}")]
    #[diagnostic(code(metadiff::infra::archive))]
    ArchiveCorruption {
        path: PathBuf,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Archive Error: {0}")]
    #[diagnostic(code(metadiff::infra::archive))]
    Archive(#[from] zip::result::ZipError),

    #[error("Delimited File Error: {0}")]
    #[diagnostic(
        code(metadiff::infra::delimited),
        help("Extract files are '|' delimited with a header row.")
    )]
    Delimited(#[from] csv::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(metadiff::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    #[diagnostic(code(metadiff::infra::config))]
    ConfigError(String),

    #[error("Configuration not found at '{0}'")]
    #[diagnostic(code(metadiff::infra::config_missing))]
    ConfigNotFound(String),

    #[error("Missing configuration: {0}")]
    #[diagnostic(
        code(metadiff::infra::missing_configuration),
        help("Set the required environment variable or settings entry.")
    )]
    MissingConfiguration(String),

    // --- TEMPLATING ---
    #[error("Template Rendering Error: {0}")]
    #[diagnostic(code(metadiff::infra::template))]
    TemplateError(#[from] minijinja::Error),
}

impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}

impl From<tokio_postgres::Error> for InfrastructureError {
    fn from(err: tokio_postgres::Error) -> Self {
        InfrastructureError::Database(DatabaseError::Postgres(err))
    }
}

// Lets `.with_context(..)` results flow into `?` in the config loaders.
impl From<anyhow::Error> for InfrastructureError {
    fn from(err: anyhow::Error) -> Self {
        InfrastructureError::ConfigError(format!("{:#}", err))
    }
}
