// metadiff-core/src/infrastructure/config/mod.rs

pub mod connection;
pub mod project;
pub mod queries;
pub mod secrets;

pub use connection::{
    DuckDBParams, OracleParams, PostgresParams, SourceConnection, SourceIdentity, SourceSpec,
    WarehouseConnection,
};
pub use project::{ProjectConfig, load_project_config};
pub use queries::{load_comparison, load_query_set};
pub use secrets::FileSecretStore;
