// metadiff-core/src/infrastructure/adapters/postgres.rs

use async_trait::async_trait;
use tokio_postgres::{Client, Config, NoTls, SimpleQueryMessage};
use tracing::{debug, error};

use crate::domain::inference::ColumnType;
use crate::domain::value::{ResultSet, Value};
use crate::error::MetadiffError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::Connector;

/// PostgreSQL, as a metadata source or as a staging warehouse.
///
/// Queries go through the simple query protocol: every value comes back as text, which is
/// exactly what extract files and reports need.
pub struct PostgresConnector {
    client: Client,
}

impl PostgresConnector {
    pub async fn connect(config: &Config, target: &str) -> Result<Self, InfrastructureError> {
        let (client, connection) =
            config
                .connect(NoTls)
                .await
                .map_err(|e| InfrastructureError::Connection {
                    target: target.to_string(),
                    source: DatabaseError::Postgres(e),
                })?;

        // The connection object drives the socket; it ends when the client is dropped.
        let target = target.to_string();
        tokio::spawn(async move {
            if let Err(e) = connection.await {
                error!("Postgres connection to {} failed: {}", target, e);
            }
        });

        Ok(Self { client })
    }
}

fn db_err(e: tokio_postgres::Error) -> MetadiffError {
    MetadiffError::Infrastructure(InfrastructureError::Database(DatabaseError::Postgres(e)))
}

#[async_trait]
impl Connector for PostgresConnector {
    fn engine_name(&self) -> &str {
        "postgres"
    }

    fn column_type_name(&self, ty: ColumnType) -> &'static str {
        match ty {
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE PRECISION",
            ColumnType::Text => "TEXT",
        }
    }

    async fn execute(&self, sql: &str) -> Result<(), MetadiffError> {
        self.client.batch_execute(sql).await.map_err(db_err)
    }

    async fn run_query(&self, sql: &str) -> Result<ResultSet, MetadiffError> {
        let messages = self.client.simple_query(sql).await.map_err(db_err)?;

        let mut result: Option<ResultSet> = None;
        for message in messages {
            match message {
                SimpleQueryMessage::RowDescription(columns) => {
                    if result.is_none() {
                        result = Some(ResultSet::new(
                            columns.iter().map(|c| c.name().to_string()).collect(),
                        ));
                    }
                }
                SimpleQueryMessage::Row(row) => {
                    let set = result.get_or_insert_with(|| {
                        ResultSet::new(
                            row.columns().iter().map(|c| c.name().to_string()).collect(),
                        )
                    });
                    let values = (0..row.len()).map(|idx| Value::from(row.get(idx))).collect();
                    set.rows.push(values);
                }
                SimpleQueryMessage::CommandComplete(count) => {
                    debug!("Postgres statement complete ({} rows)", count);
                }
                _ => {}
            }
        }

        Ok(result.unwrap_or_default())
    }
}
