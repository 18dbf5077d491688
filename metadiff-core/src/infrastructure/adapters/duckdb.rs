// metadiff-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::types::{TimeUnit, Value as DuckValue};
use duckdb::{Config, Connection};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::inference::ColumnType;
use crate::domain::value::{ResultSet, Value};
use crate::error::MetadiffError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::connector::Connector;

/// Embedded DuckDB database, used both as a metadata source and as a staging warehouse.
pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, MetadiffError> {
        self.conn.lock().map_err(|_| {
            MetadiffError::Infrastructure(InfrastructureError::Io(std::io::Error::other(
                "DuckDB Mutex Poisoned",
            )))
        })
    }
}

fn db_err(e: duckdb::Error) -> MetadiffError {
    MetadiffError::Infrastructure(InfrastructureError::Database(DatabaseError::DuckDB(e)))
}

fn to_value(value: DuckValue) -> Value {
    match value {
        DuckValue::Null => Value::Null,
        DuckValue::Boolean(b) => Value::Bool(b),
        DuckValue::TinyInt(i) => Value::Int(i.into()),
        DuckValue::SmallInt(i) => Value::Int(i.into()),
        DuckValue::Int(i) => Value::Int(i.into()),
        DuckValue::BigInt(i) => Value::Int(i),
        DuckValue::UTinyInt(i) => Value::Int(i.into()),
        DuckValue::USmallInt(i) => Value::Int(i.into()),
        DuckValue::UInt(i) => Value::Int(i.into()),
        DuckValue::UBigInt(i) => i64::try_from(i)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(i.to_string())),
        DuckValue::HugeInt(i) => i64::try_from(i)
            .map(Value::Int)
            .unwrap_or_else(|_| Value::Text(i.to_string())),
        DuckValue::Float(f) => Value::Float(f.into()),
        DuckValue::Double(f) => Value::Float(f),
        DuckValue::Decimal(d) => Value::Text(d.to_string()),
        DuckValue::Text(s) | DuckValue::Enum(s) => Value::Text(s),
        DuckValue::Date32(days) => chrono::DateTime::from_timestamp(i64::from(days) * 86_400, 0)
            .map(|d| Value::Text(d.date_naive().to_string()))
            .unwrap_or(Value::Null),
        DuckValue::Timestamp(unit, raw) => {
            chrono::DateTime::from_timestamp_micros(to_micros(unit, raw))
                .map(|d| Value::Text(d.naive_utc().to_string()))
                .unwrap_or(Value::Null)
        }
        other => Value::Text(format!("{:?}", other)),
    }
}

fn to_micros(unit: TimeUnit, raw: i64) -> i64 {
    match unit {
        TimeUnit::Second => raw.saturating_mul(1_000_000),
        TimeUnit::Millisecond => raw.saturating_mul(1_000),
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    fn engine_name(&self) -> &str {
        "duckdb"
    }

    fn column_type_name(&self, ty: ColumnType) -> &'static str {
        match ty {
            ColumnType::Boolean => "BOOLEAN",
            ColumnType::BigInt => "BIGINT",
            ColumnType::Double => "DOUBLE",
            ColumnType::Text => "VARCHAR",
        }
    }

    async fn execute(&self, sql: &str) -> Result<(), MetadiffError> {
        let conn = self.lock()?;
        conn.execute_batch(sql).map_err(db_err)
    }

    async fn run_query(&self, sql: &str) -> Result<ResultSet, MetadiffError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(sql).map_err(db_err)?;
        let mut rows = stmt.query([]).map_err(db_err)?;

        // Column names are only known once the statement has run.
        let columns: Vec<String> = rows
            .as_ref()
            .map(|s| s.column_names())
            .unwrap_or_default();
        let mut result = ResultSet::new(columns);

        while let Some(row) = rows.next().map_err(db_err)? {
            let mut values = Vec::with_capacity(result.columns.len());
            for idx in 0..result.columns.len() {
                let value: DuckValue = row.get(idx).map_err(db_err)?;
                values.push(to_value(value));
            }
            result.rows.push(values);
        }

        Ok(result)
    }
}
