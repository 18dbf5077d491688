// metadiff-core/src/domain/kind.rs

use crate::domain::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Database engine a metadata extract is taken from.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Oracle,
    Postgres,
    DuckDB,
}

impl SourceKind {
    /// Prefix of the archive produced for this kind (`<prefix>-extract-<label>.zip`).
    pub fn archive_prefix(&self) -> &'static str {
        match self {
            SourceKind::Oracle => "orcl",
            SourceKind::Postgres => "pg",
            SourceKind::DuckDB => "duckdb",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Oracle => write!(f, "oracle"),
            SourceKind::Postgres => write!(f, "postgres"),
            SourceKind::DuckDB => write!(f, "duckdb"),
        }
    }
}

/// How the stager clears a table before the first append of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStrategy {
    /// Drop each table the first time a file targets it.
    PerTable,
    /// Drop every table of the staging schema once, before loading anything.
    WholeSchema,
}

/// Warehouse holding the staging schema.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum WarehouseKind {
    #[default]
    DuckDB,
    Postgres,
}

impl WarehouseKind {
    pub fn reset_strategy(&self) -> ResetStrategy {
        match self {
            WarehouseKind::DuckDB => ResetStrategy::PerTable,
            WarehouseKind::Postgres => ResetStrategy::WholeSchema,
        }
    }

    /// Value substituted for `<dataset_name>` in report templates.
    pub fn dataset_token<'a>(&self, staging_schema: &'a str) -> &'a str {
        match self {
            WarehouseKind::DuckDB | WarehouseKind::Postgres => staging_schema,
        }
    }
}

impl fmt::Display for WarehouseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarehouseKind::DuckDB => write!(f, "duckdb"),
            WarehouseKind::Postgres => write!(f, "postgres"),
        }
    }
}

impl FromStr for WarehouseKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "duckdb" => Ok(WarehouseKind::DuckDB),
            "postgres" | "postgresql" => Ok(WarehouseKind::Postgres),
            _ => Err(DomainError::UnknownVariant {
                kind: "warehouse",
                value: s.to_string(),
            }),
        }
    }
}

/// Breadth of the catalog views queried (`all_*`, `user_*`, `dba_*`).
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    All,
    User,
    Dba,
}

impl ViewType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ViewType::All => "all",
            ViewType::User => "user",
            ViewType::Dba => "dba",
        }
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ViewType::All),
            "user" => Ok(ViewType::User),
            "dba" => Ok(ViewType::Dba),
            _ => Err(DomainError::UnknownVariant {
                kind: "view type",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    #[default]
    Html,
}

impl FromStr for ReportFormat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(ReportFormat::Text),
            "html" => Ok(ReportFormat::Html),
            _ => Err(DomainError::UnknownVariant {
                kind: "report format",
                value: s.to_string(),
            }),
        }
    }
}
