// metadiff-core/src/domain/template/placeholder.rs

// A template is plain SQL with `<token>` markers. Resolution is a single explicit pass over a
// closed set of placeholders, in a fixed order, followed by a check that nothing is left behind.

use crate::domain::error::DomainError;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

fn re_token() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"<[A-Za-z][A-Za-z0-9_-]*>").unwrap_or_else(|_| {
            // Fallback regex that never matches
            Regex::new("$^").unwrap_or_else(|_| unreachable!())
        })
    })
}

/// The complete placeholder vocabulary. Declaration order is resolution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Placeholder {
    ViewType,
    DbName,
    Instance1Id,
    Instance2Id,
    WSchemaFilter,
    ASchemaFilter,
    SchemaFilter,
    Instance1Owner,
    Instance2Owner,
    DatasetName,
}

impl Placeholder {
    pub const ALL: [Placeholder; 10] = [
        Placeholder::ViewType,
        Placeholder::DbName,
        Placeholder::Instance1Id,
        Placeholder::Instance2Id,
        Placeholder::WSchemaFilter,
        Placeholder::ASchemaFilter,
        Placeholder::SchemaFilter,
        Placeholder::Instance1Owner,
        Placeholder::Instance2Owner,
        Placeholder::DatasetName,
    ];

    pub fn token(&self) -> &'static str {
        match self {
            Placeholder::ViewType => "<view_type>",
            Placeholder::DbName => "<db-name>",
            Placeholder::Instance1Id => "<instance_1_id>",
            Placeholder::Instance2Id => "<instance_2_id>",
            Placeholder::WSchemaFilter => "<w_schema_filter>",
            Placeholder::ASchemaFilter => "<a_schema_filter>",
            Placeholder::SchemaFilter => "<schema_filter>",
            Placeholder::Instance1Owner => "<instance_1_owner>",
            Placeholder::Instance2Owner => "<instance_2_owner>",
            Placeholder::DatasetName => "<dataset_name>",
        }
    }

    pub fn from_token(token: &str) -> Option<Placeholder> {
        Placeholder::ALL.into_iter().find(|p| p.token() == token)
    }
}

/// Values bound to placeholders for one resolution pass.
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: BTreeMap<Placeholder, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(mut self, placeholder: Placeholder, value: impl Into<String>) -> Self {
        self.values.insert(placeholder, value.into());
        self
    }

    /// Resolve `template`, failing if it contains a token that is unknown or unbound.
    ///
    /// The check runs on the template text before substitution, so values that happen to
    /// contain angle brackets can never be mistaken for leftovers.
    pub fn resolve(&self, template_name: &str, template: &str) -> Result<String, DomainError> {
        let mut missing: Vec<String> = Vec::new();
        for m in re_token().find_iter(template) {
            let token = m.as_str();
            let bound = Placeholder::from_token(token).is_some_and(|p| self.values.contains_key(&p));
            if !bound && !missing.iter().any(|t| t == token) {
                missing.push(token.to_string());
            }
        }
        if !missing.is_empty() {
            return Err(DomainError::UnresolvedPlaceholder {
                template: template_name.to_string(),
                tokens: missing,
            });
        }

        let mut sql = template.to_string();
        // BTreeMap iterates in declaration order of the enum
        for (placeholder, value) in &self.values {
            sql = sql.replace(placeholder.token(), value);
        }
        Ok(sql)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[test]
    fn test_resolve_all_bound() -> Result<()> {
        let bindings = Bindings::new()
            .bind(Placeholder::ViewType, "all")
            .bind(Placeholder::DbName, "orcl");
        let sql = bindings.resolve(
            "tables",
            "SELECT '<db-name>' AS pkey, table_name FROM <view_type>_tables",
        )?;
        assert_eq!(sql, "SELECT 'orcl' AS pkey, table_name FROM all_tables");
        Ok(())
    }

    #[test]
    fn test_unbound_placeholder_is_fatal() {
        let bindings = Bindings::new().bind(Placeholder::Instance1Id, "a");
        let err = bindings
            .resolve(
                "missing.sql",
                "SELECT * FROM t WHERE pkey IN ('<instance_1_id>', '<instance_2_id>')",
            )
            .unwrap_err();
        match err {
            DomainError::UnresolvedPlaceholder { template, tokens } => {
                assert_eq!(template, "missing.sql");
                assert_eq!(tokens, vec!["<instance_2_id>".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unknown_token_is_fatal() {
        let err = Bindings::new().resolve("x", "SELECT <typo_token> FROM dual");
        assert!(matches!(
            err,
            Err(DomainError::UnresolvedPlaceholder { .. })
        ));
    }

    #[test]
    fn test_comparison_operators_are_not_tokens() -> Result<()> {
        let sql = Bindings::new().resolve("x", "SELECT 1 WHERE a <> b AND c < d AND e > f")?;
        assert_eq!(sql, "SELECT 1 WHERE a <> b AND c < d AND e > f");
        Ok(())
    }

    #[test]
    fn test_empty_binding_removes_token() -> Result<()> {
        let sql = Bindings::new()
            .bind(Placeholder::WSchemaFilter, "")
            .resolve("x", "SELECT * FROM t <w_schema_filter>")?;
        assert_eq!(sql.trim_end(), "SELECT * FROM t");
        Ok(())
    }

    #[test]
    fn test_substituted_value_is_not_rescanned() -> Result<()> {
        let sql = Bindings::new()
            .bind(Placeholder::Instance1Id, "<weird>")
            .resolve("x", "SELECT '<instance_1_id>'")?;
        assert_eq!(sql, "SELECT '<weird>'");
        Ok(())
    }
}
