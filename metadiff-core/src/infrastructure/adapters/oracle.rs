// metadiff-core/src/infrastructure/adapters/oracle.rs

use async_trait::async_trait;
use oracle::Connection;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::inference::ColumnType;
use crate::domain::value::{ResultSet, Value};
use crate::error::MetadiffError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::Connector;

/// Oracle metadata source. The driver is synchronous, like DuckDB, so calls run inline.
pub struct OracleConnector {
    conn: Arc<Mutex<Connection>>,
}

/// Easy Connect string: `[tcps://]host:port/service`.
pub fn easy_connect(protocol: Option<&str>, host: &str, port: u16, service: &str) -> String {
    match protocol {
        Some(p) if p.eq_ignore_ascii_case("tcps") => {
            format!("tcps://{}:{}/{}", host, port, service)
        }
        _ => format!("{}:{}/{}", host, port, service),
    }
}

impl OracleConnector {
    pub fn connect(
        user: &str,
        password: &str,
        connect_string: &str,
    ) -> Result<Self, InfrastructureError> {
        let conn = Connection::connect(user, password, connect_string).map_err(|e| {
            InfrastructureError::Connection {
                target: connect_string.to_string(),
                source: DatabaseError::Oracle(e),
            }
        })?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, MetadiffError> {
        self.conn.lock().map_err(|_| {
            MetadiffError::Infrastructure(InfrastructureError::Io(std::io::Error::other(
                "Oracle Mutex Poisoned",
            )))
        })
    }
}

fn db_err(e: oracle::Error) -> MetadiffError {
    MetadiffError::Infrastructure(InfrastructureError::Database(DatabaseError::Oracle(e)))
}

#[async_trait]
impl Connector for OracleConnector {
    fn engine_name(&self) -> &str {
        "oracle"
    }

    fn column_type_name(&self, ty: ColumnType) -> &'static str {
        match ty {
            ColumnType::Boolean => "VARCHAR2(5)",
            ColumnType::BigInt => "NUMBER(19)",
            ColumnType::Double => "BINARY_DOUBLE",
            ColumnType::Text => "VARCHAR2(4000)",
        }
    }

    async fn execute(&self, sql: &str) -> Result<(), MetadiffError> {
        let conn = self.lock()?;
        conn.execute(sql, &[]).map(|_| ()).map_err(db_err)
    }

    async fn run_query(&self, sql: &str) -> Result<ResultSet, MetadiffError> {
        let conn = self.lock()?;
        let rows = conn.query(sql, &[]).map_err(db_err)?;
        let columns: Vec<String> = rows
            .column_info()
            .iter()
            .map(|c| c.name().to_string())
            .collect();
        let mut result = ResultSet::new(columns);

        for row in rows {
            let row = row.map_err(db_err)?;
            let mut values = Vec::with_capacity(result.columns.len());
            for idx in 0..result.columns.len() {
                // The driver renders every catalog type (NUMBER, DATE, ...) as text.
                let value: Option<String> = row.get(idx).map_err(db_err)?;
                values.push(value.map(Value::Text).unwrap_or(Value::Null));
            }
            result.rows.push(values);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easy_connect() {
        assert_eq!(easy_connect(None, "db01", 1521, "ORCL"), "db01:1521/ORCL");
        assert_eq!(
            easy_connect(Some("TCPS"), "db01", 2484, "ORCL"),
            "tcps://db01:2484/ORCL"
        );
        assert_eq!(easy_connect(Some("tcp"), "db01", 1521, "ORCL"), "db01:1521/ORCL");
    }
}
