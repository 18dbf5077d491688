// metadiff-core/src/ports/connector.rs

// What the pipeline needs from a database, whatever the engine behind it. Sources only use
// `run_query`; warehouses use the catalog and loading helpers, which default to portable
// information_schema SQL.

use crate::domain::inference::ColumnType;
use crate::domain::staging::{DelimitedTable, insert_statements, sql_literal};
use crate::domain::value::ResultSet;
use crate::error::MetadiffError;
use async_trait::async_trait;
use tracing::{debug, warn};

/// A column as reported by the warehouse catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: ColumnType,
}

fn text_literal(value: &str) -> String {
    sql_literal(Some(value), ColumnType::Text)
}

#[async_trait]
pub trait Connector: Send + Sync {
    fn engine_name(&self) -> &str;

    fn quote_identifier(&self, ident: &str) -> String {
        format!("\"{}\"", ident.replace('"', "\"\""))
    }

    /// DDL type name used when creating or widening staging columns.
    fn column_type_name(&self, ty: ColumnType) -> &'static str;

    /// Run one or more statements, discarding any result.
    async fn execute(&self, sql: &str) -> Result<(), MetadiffError>;

    async fn run_query(&self, sql: &str) -> Result<ResultSet, MetadiffError>;

    fn table_ref(&self, schema: &str, table: &str) -> String {
        format!(
            "{}.{}",
            self.quote_identifier(schema),
            self.quote_identifier(table)
        )
    }

    async fn ensure_schema(&self, schema: &str) -> Result<(), MetadiffError> {
        self.execute(&format!(
            "CREATE SCHEMA IF NOT EXISTS {}",
            self.quote_identifier(schema)
        ))
        .await
    }

    async fn list_tables(&self, schema: &str) -> Result<Vec<String>, MetadiffError> {
        let sql = format!(
            "SELECT table_name FROM information_schema.tables \
             WHERE table_schema = {} AND table_type = 'BASE TABLE' ORDER BY table_name",
            text_literal(schema)
        );
        Ok(self.run_query(&sql).await?.first_column())
    }

    async fn list_columns(
        &self,
        schema: &str,
        table: &str,
    ) -> Result<Vec<ColumnSchema>, MetadiffError> {
        let sql = format!(
            "SELECT column_name, data_type FROM information_schema.columns \
             WHERE table_schema = {} AND table_name = {} ORDER BY ordinal_position",
            text_literal(schema),
            text_literal(table)
        );
        let result = self.run_query(&sql).await?;
        Ok(result
            .rows
            .iter()
            .filter_map(|row| match row.as_slice() {
                [name, data_type, ..] => Some(ColumnSchema {
                    name: name.to_string(),
                    data_type: ColumnType::from_sql_name(&data_type.to_string()),
                }),
                _ => None,
            })
            .collect())
    }

    async fn drop_table(&self, schema: &str, table: &str) -> Result<(), MetadiffError> {
        self.execute(&format!("DROP TABLE IF EXISTS {}", self.table_ref(schema, table)))
            .await
    }

    /// Append `data` to `schema.table` in one transaction, creating the table or adding and
    /// widening columns as needed. Returns the number of rows inserted.
    async fn bulk_load(
        &self,
        schema: &str,
        table: &str,
        data: &DelimitedTable,
        batch_size: usize,
    ) -> Result<u64, MetadiffError> {
        let table_ref = self.table_ref(schema, table);
        let existing = self.list_columns(schema, table).await?;
        let inferred = data.column_types();

        let mut ddl = Vec::new();
        let mut types = Vec::with_capacity(inferred.len());
        if existing.is_empty() {
            let defs = data
                .columns
                .iter()
                .zip(&inferred)
                .map(|(name, ty)| {
                    format!(
                        "{} {}",
                        self.quote_identifier(name),
                        self.column_type_name(*ty)
                    )
                })
                .collect::<Vec<_>>()
                .join(", ");
            ddl.push(format!("CREATE TABLE IF NOT EXISTS {} ({})", table_ref, defs));
            types = inferred;
        } else {
            for (name, ty) in data.columns.iter().zip(inferred) {
                match existing.iter().find(|c| &c.name == name) {
                    None => {
                        debug!("Adding column {}.{}", table, name);
                        ddl.push(format!(
                            "ALTER TABLE {} ADD COLUMN {} {}",
                            table_ref,
                            self.quote_identifier(name),
                            self.column_type_name(ty)
                        ));
                        types.push(ty);
                    }
                    Some(column) => {
                        let merged = column.data_type.merge(ty);
                        if merged != column.data_type {
                            debug!("Widening column {}.{} to {}", table, name, merged);
                            ddl.push(format!(
                                "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
                                table_ref,
                                self.quote_identifier(name),
                                self.column_type_name(merged)
                            ));
                        }
                        types.push(merged);
                    }
                }
            }
        }

        let quoted: Vec<String> = data
            .columns
            .iter()
            .map(|c| self.quote_identifier(c))
            .collect();
        let inserts = insert_statements(&table_ref, &quoted, &types, &data.rows, batch_size);

        self.execute("BEGIN TRANSACTION").await?;
        for statement in ddl.iter().chain(inserts.iter()) {
            if let Err(e) = self.execute(statement).await {
                if let Err(rollback) = self.execute("ROLLBACK").await {
                    warn!("Rollback failed on {}: {}", table_ref, rollback);
                }
                return Err(e);
            }
        }
        self.execute("COMMIT").await?;

        Ok(data.len() as u64)
    }

    /// Values of `column` in storage order, including duplicates and without NULLs.
    async fn list_values(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<Vec<String>, MetadiffError> {
        let sql = format!(
            "SELECT {} FROM {}",
            self.quote_identifier(column),
            self.table_ref(schema, table)
        );
        Ok(self.run_query(&sql).await?.first_column())
    }

    /// Distinct values of `column`, in first-seen order.
    async fn list_distinct(
        &self,
        schema: &str,
        table: &str,
        column: &str,
    ) -> Result<Vec<String>, MetadiffError> {
        let values = self.list_values(schema, table, column).await?;
        Ok(crate::domain::instance::distinct_in_order(values))
    }
}
