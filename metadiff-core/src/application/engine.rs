// metadiff-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

use crate::domain::value::ResultSet;
use crate::error::MetadiffError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::connector::Connector;

/// Run one named query with timing, wrapping failures with the query name.
#[instrument(skip(connector, sql), fields(engine = connector.engine_name(), sql.len = sql.len()))]
pub async fn run_named_query(
    connector: &dyn Connector,
    name: &str,
    sql: &str,
) -> Result<ResultSet, MetadiffError> {
    let start = Instant::now();
    debug!("⚡ Executing Query {}: {}", name, sql);

    let result = connector.run_query(sql).await;
    let duration = start.elapsed();

    match result {
        Ok(rows) => {
            debug!("✅ Query {} returned {} rows in {:.2?}", name, rows.len(), duration);
            Ok(rows)
        }
        Err(e) => {
            error!("❌ Query {} failed after {:.2?}: {}", name, duration, e);
            Err(InfrastructureError::QueryExecution {
                name: name.to_string(),
                source: Box::new(e),
            }
            .into())
        }
    }
}
