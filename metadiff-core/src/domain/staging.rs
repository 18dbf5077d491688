// metadiff-core/src/domain/staging.rs

use crate::domain::inference::{ColumnType, infer_column_types};

/// Parsed content of one delimited extract file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DelimitedTable {
    /// Lower-cased header names.
    pub columns: Vec<String>,
    /// Empty fields are `None`.
    pub rows: Vec<Vec<Option<String>>>,
}

impl DelimitedTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        Self {
            columns: headers.into_iter().map(|h| h.trim().to_lowercase()).collect(),
            rows,
        }
    }

    pub fn column_types(&self) -> Vec<ColumnType> {
        infer_column_types(self.columns.len(), &self.rows)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Typed SQL literal for a staged field.
pub fn sql_literal(field: Option<&str>, ty: ColumnType) -> String {
    match (field, ty) {
        (None, _) => "NULL".to_string(),
        (Some(v), ColumnType::Boolean) => v.to_ascii_uppercase(),
        (Some(v), ColumnType::BigInt | ColumnType::Double) => v.to_string(),
        (Some(v), ColumnType::Text) => format!("'{}'", v.replace('\'', "''")),
    }
}

/// Multi-row `INSERT` statements of at most `batch_size` rows each.
///
/// `table_ref` and `quoted_columns` are already quoted for the target engine. Short rows are
/// padded with NULLs.
pub fn insert_statements(
    table_ref: &str,
    quoted_columns: &[String],
    types: &[ColumnType],
    rows: &[Vec<Option<String>>],
    batch_size: usize,
) -> Vec<String> {
    let column_list = quoted_columns.join(", ");
    rows.chunks(batch_size.max(1))
        .map(|chunk| {
            let values = chunk
                .iter()
                .map(|row| {
                    let cells = types
                        .iter()
                        .enumerate()
                        .map(|(idx, ty)| {
                            sql_literal(row.get(idx).and_then(|f| f.as_deref()), *ty)
                        })
                        .collect::<Vec<_>>()
                        .join(", ");
                    format!("({})", cells)
                })
                .collect::<Vec<_>>()
                .join(",\n");
            format!("INSERT INTO {} ({}) VALUES\n{}", table_ref, column_list, values)
        })
        .collect()
}
