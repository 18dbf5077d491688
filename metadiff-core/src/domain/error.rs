// metadiff-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Unresolved placeholder(s) {tokens:?} in '{template}'")]
    #[diagnostic(
        code(metadiff::domain::placeholder),
        help("Every <token> in a SQL template must be bound before the query is executed.")
    )]
    UnresolvedPlaceholder {
        template: String,
        tokens: Vec<String>,
    },

    #[error("Invalid schema mapping '{0}'")]
    #[diagnostic(
        code(metadiff::domain::schema_mapping),
        help("Exactly one mapping is allowed, written as 'SCHEMA_1/SCHEMA_2'.")
    )]
    InvalidSchemaMapping(String),

    #[error("Not enough instances found in {table}: expected 2, found {found}")]
    #[diagnostic(
        code(metadiff::domain::instances),
        help("Stage the extracts of two databases before generating a report.")
    )]
    NotEnoughInstances { table: String, found: usize },

    #[error("File '{0}' does not name a staging table")]
    #[diagnostic(
        code(metadiff::domain::file_name),
        help("Staging files are named '<prefix>__<table_name>.<ext>'.")
    )]
    InvalidStagingFileName(String),

    #[error("Unknown {kind} '{value}'")]
    #[diagnostic(code(metadiff::domain::unknown_variant))]
    UnknownVariant { kind: &'static str, value: String },
}
