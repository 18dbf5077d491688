// metadiff-core/src/domain/naming.rs

// File naming conventions shared by the extractor and the stager.

use crate::domain::error::DomainError;
use crate::domain::kind::SourceKind;
use chrono::{DateTime, TimeZone};

pub const DELIMITED_EXTENSION: &str = "csv";
pub const ARCHIVE_EXTENSION: &str = "zip";
pub const TABLE_SEPARATOR: &str = "__";

/// Database identity token substituted for `<db-name>`.
///
/// Alphabetic characters of the host only; a numeric host (an IP address) has none, so it
/// becomes `ip_` followed by the host with every non-alphanumeric replaced by `_`.
pub fn db_token(host: &str) -> String {
    let alpha: String = host.chars().filter(|c| c.is_alphabetic()).collect();
    if !alpha.is_empty() {
        return alpha;
    }
    let digits: String = host
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '_' })
        .collect();
    format!("ip_{}", digits)
}

/// Keeps a label usable as a single path component.
pub fn sanitize_label(label: &str) -> String {
    label
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// `[<host_token>_]<query_name>.csv`
pub fn extract_file_name(host_token: Option<&str>, query_name: &str) -> String {
    match host_token {
        Some(token) => format!("{}_{}.{}", token, query_name, DELIMITED_EXTENSION),
        None => format!("{}.{}", query_name, DELIMITED_EXTENSION),
    }
}

/// `<prefix>-extract-<label>`
pub fn archive_stem(kind: SourceKind, label: &str) -> String {
    format!("{}-extract-{}", kind.archive_prefix(), sanitize_label(label))
}

pub fn archive_name(kind: SourceKind, label: &str) -> String {
    format!("{}.{}", archive_stem(kind, label), ARCHIVE_EXTENSION)
}

/// Staging table targeted by `<anything>__<table_name>.<ext>`, lower-cased.
///
/// The table is whatever follows the last separator: host tokens such as `ip___1` may contain one.
pub fn staging_table_name(file_name: &str) -> Result<String, DomainError> {
    let (_, segment) = file_name
        .rsplit_once(TABLE_SEPARATOR)
        .ok_or_else(|| DomainError::InvalidStagingFileName(file_name.to_string()))?;
    let table = match segment.rsplit_once('.') {
        Some((stem, _ext)) => stem,
        None => segment,
    };
    if table.is_empty() {
        return Err(DomainError::InvalidStagingFileName(file_name.to_string()));
    }
    Ok(table.to_lowercase())
}

/// Metadata-definition and end-of-job marker files are never loaded as data.
pub fn is_excluded(file_name: &str, patterns: &[String]) -> bool {
    patterns
        .iter()
        .any(|p| !p.is_empty() && file_name.contains(p.as_str()))
}

/// `database_comparison_report_YYYYMMDD_HHMMSS.html`
pub fn report_file_name<Tz: TimeZone>(generated_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "database_comparison_report_{}.html",
        generated_at.format("%Y%m%d_%H%M%S")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use chrono::Utc;

    #[test]
    fn test_db_token_alpha_projection() {
        assert_eq!(db_token("db-prod-01.example.com"), "dbprodexamplecom");
    }

    #[test]
    fn test_db_token_numeric_host() {
        assert_eq!(db_token("10.0.0.12"), "ip_10_0_0_12");
    }

    #[test]
    fn test_extract_file_name() {
        assert_eq!(
            extract_file_name(Some("orcl"), "ora__tables"),
            "orcl_ora__tables.csv"
        );
        assert_eq!(extract_file_name(None, "tables"), "tables.csv");
    }

    #[test]
    fn test_archive_name() {
        assert_eq!(
            archive_name(SourceKind::Oracle, "db01:1521"),
            "orcl-extract-db01_1521.zip"
        );
    }

    #[test]
    fn test_staging_table_name() -> Result<()> {
        assert_eq!(staging_table_name("orcl_ora__Tables.csv")?, "tables");
        assert_eq!(staging_table_name("x__columns")?, "columns");
        assert!(staging_table_name("tables.csv").is_err());
        assert!(staging_table_name("x__.csv").is_err());
        Ok(())
    }

    #[test]
    fn test_staging_table_name_with_ipv6_host_prefix() -> Result<()> {
        let token = db_token("::1");
        assert_eq!(token, "ip___1");
        let file = extract_file_name(Some(&token), "pg__tables");
        assert_eq!(file, "ip___1_pg__tables.csv");
        assert_eq!(staging_table_name(&file)?, "tables");
        Ok(())
    }

    #[test]
    fn test_exclusions() {
        let patterns = vec!["defines".to_string(), "eoj".to_string()];
        assert!(is_excluded("orcl__defines.csv", &patterns));
        assert!(is_excluded("run__eoj.csv", &patterns));
        assert!(!is_excluded("orcl__tables.csv", &patterns));
    }

    #[test]
    fn test_report_file_name() -> Result<()> {
        let at = Utc
            .with_ymd_and_hms(2024, 3, 9, 7, 5, 1)
            .single()
            .ok_or_else(|| anyhow::anyhow!("invalid date"))?;
        assert_eq!(
            report_file_name(&at),
            "database_comparison_report_20240309_070501.html"
        );
        Ok(())
    }
}
