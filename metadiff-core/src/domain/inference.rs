// metadiff-core/src/domain/inference.rs

// Column types are inferred from the text of a delimited file. A column takes the narrowest type
// that accepts every non-empty field; empty fields are NULL and do not constrain the type.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ColumnType {
    Boolean,
    BigInt,
    Double,
    Text,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Boolean => write!(f, "BOOLEAN"),
            ColumnType::BigInt => write!(f, "BIGINT"),
            ColumnType::Double => write!(f, "DOUBLE"),
            ColumnType::Text => write!(f, "TEXT"),
        }
    }
}

impl ColumnType {
    /// Read back a type name reported by the warehouse catalog.
    pub fn from_sql_name(name: &str) -> ColumnType {
        match name.trim().to_ascii_lowercase().as_str() {
            "boolean" | "bool" => ColumnType::Boolean,
            "bigint" | "int8" => ColumnType::BigInt,
            "double" | "double precision" | "float8" => ColumnType::Double,
            _ => ColumnType::Text,
        }
    }

    /// Smallest type holding values of both `self` and `other`.
    pub fn merge(self, other: ColumnType) -> ColumnType {
        match (self, other) {
            (a, b) if a == b => a,
            (ColumnType::BigInt, ColumnType::Double) | (ColumnType::Double, ColumnType::BigInt) => {
                ColumnType::Double
            }
            _ => ColumnType::Text,
        }
    }
}

pub fn is_bigint(field: &str) -> bool {
    let digits = field.strip_prefix(['-', '+']).unwrap_or(field);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) && field.parse::<i64>().is_ok()
}

// `f64::from_str` also accepts "inf" and "NaN"; metadata never means those.
pub fn is_double(field: &str) -> bool {
    field.bytes().any(|b| b.is_ascii_digit())
        && field
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'E' | b'+' | b'-'))
        && field.parse::<f64>().is_ok()
}

pub fn is_boolean(field: &str) -> bool {
    field.eq_ignore_ascii_case("true") || field.eq_ignore_ascii_case("false")
}

fn fits(field: &str, ty: ColumnType) -> bool {
    match ty {
        ColumnType::Boolean => is_boolean(field),
        ColumnType::BigInt => is_bigint(field),
        ColumnType::Double => is_double(field),
        ColumnType::Text => true,
    }
}

fn narrowest(field: &str) -> ColumnType {
    if is_boolean(field) {
        ColumnType::Boolean
    } else if is_bigint(field) {
        ColumnType::BigInt
    } else if is_double(field) {
        ColumnType::Double
    } else {
        ColumnType::Text
    }
}

/// Widen `current` just enough to also accept `field`.
fn widen(current: Option<ColumnType>, field: &str) -> ColumnType {
    let Some(current) = current else {
        return narrowest(field);
    };
    if fits(field, current) {
        return current;
    }
    current.merge(narrowest(field))
}

/// Infer one type per column. Columns with only NULLs are TEXT.
pub fn infer_column_types(column_count: usize, rows: &[Vec<Option<String>>]) -> Vec<ColumnType> {
    let mut types: Vec<Option<ColumnType>> = vec![None; column_count];
    for row in rows {
        for (idx, field) in row.iter().enumerate().take(column_count) {
            if let Some(field) = field {
                types[idx] = Some(widen(types[idx], field));
            }
        }
    }
    types
        .into_iter()
        .map(|t| t.unwrap_or(ColumnType::Text))
        .collect()
}
