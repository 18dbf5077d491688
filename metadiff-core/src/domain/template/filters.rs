// metadiff-core/src/domain/template/filters.rs

use crate::domain::error::DomainError;
use crate::domain::instance::InstancePair;
use crate::domain::template::placeholder::{Bindings, Placeholder};

/// Owners (schemas) a report is restricted to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaFilter {
    owners: Vec<String>,
}

impl SchemaFilter {
    /// Parse a comma-separated list. Returns `None` when nothing usable is listed.
    pub fn parse(list: &str) -> Option<Self> {
        let owners: Vec<String> = list
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        if owners.is_empty() {
            None
        } else {
            Some(Self { owners })
        }
    }

    /// `'A','B'` with embedded quotes doubled.
    pub fn sql_list(&self) -> String {
        self.owners
            .iter()
            .map(|o| format!("'{}'", o.replace('\'', "''")))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// One `SCHEMA_1/SCHEMA_2` owner remapping between the two instances.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaMapping {
    pub instance_1_owner: String,
    pub instance_2_owner: String,
}

impl SchemaMapping {
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let parts: Vec<&str> = raw.split('/').map(str::trim).collect();
        match parts.as_slice() {
            [a, b] if !a.is_empty() && !b.is_empty() => Ok(Self {
                instance_1_owner: a.to_string(),
                instance_2_owner: b.to_string(),
            }),
            _ => Err(DomainError::InvalidSchemaMapping(raw.to_string())),
        }
    }
}

/// Everything a comparison template may reference.
#[derive(Debug, Clone)]
pub struct ReportBindings<'a> {
    pub instances: &'a InstancePair,
    pub filter: Option<&'a SchemaFilter>,
    pub mapping: Option<&'a SchemaMapping>,
    pub dataset: &'a str,
}

impl ReportBindings<'_> {
    pub fn to_bindings(&self) -> Bindings {
        let mut bindings = Bindings::new()
            .bind(Placeholder::Instance1Id, self.instances.first.as_str())
            .bind(Placeholder::Instance2Id, self.instances.second.as_str());

        bindings = match self.filter {
            Some(filter) => {
                let list = filter.sql_list();
                bindings
                    .bind(
                        Placeholder::WSchemaFilter,
                        format!("WHERE OWNER in ({})", list),
                    )
                    .bind(
                        Placeholder::ASchemaFilter,
                        format!("AND a.OWNER in ({})", list),
                    )
                    .bind(
                        Placeholder::SchemaFilter,
                        format!("AND i1.OWNER in ({})", list),
                    )
            }
            None => bindings
                .bind(Placeholder::WSchemaFilter, "")
                .bind(Placeholder::ASchemaFilter, "")
                .bind(Placeholder::SchemaFilter, ""),
        };

        if let Some(mapping) = self.mapping {
            bindings = bindings
                .bind(Placeholder::Instance1Owner, mapping.instance_1_owner.as_str())
                .bind(Placeholder::Instance2Owner, mapping.instance_2_owner.as_str());
        }

        bindings.bind(Placeholder::DatasetName, self.dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;

    fn pair() -> InstancePair {
        InstancePair {
            first: "orcl".into(),
            second: "pgprod".into(),
        }
    }

    #[test]
    fn test_schema_filter_parse() {
        let filter = SchemaFilter::parse(" HR, SALES ,,").unwrap_or_else(|| unreachable!());
        assert_eq!(filter.sql_list(), "'HR','SALES'");
        assert!(SchemaFilter::parse(" , ").is_none());
    }

    #[test]
    fn test_schema_mapping_requires_one_pair() -> Result<()> {
        let mapping = SchemaMapping::parse("HR/HR_PG")?;
        assert_eq!(mapping.instance_1_owner, "HR");
        assert_eq!(mapping.instance_2_owner, "HR_PG");

        assert!(SchemaMapping::parse("HR").is_err());
        assert!(SchemaMapping::parse("A/B/C").is_err());
        assert!(SchemaMapping::parse("A/").is_err());
        Ok(())
    }

    #[test]
    fn test_filters_with_list() -> Result<()> {
        let instances = pair();
        let filter = SchemaFilter::parse("HR").unwrap_or_else(|| unreachable!());
        let bindings = ReportBindings {
            instances: &instances,
            filter: Some(&filter),
            mapping: None,
            dataset: "schema_compare",
        }
        .to_bindings();

        let sql = bindings.resolve(
            "t.sql",
            "SELECT * FROM <dataset_name>.tables i1 <w_schema_filter> <a_schema_filter> <schema_filter>",
        )?;
        assert_eq!(
            sql,
            "SELECT * FROM schema_compare.tables i1 WHERE OWNER in ('HR') AND a.OWNER in ('HR') AND i1.OWNER in ('HR')"
        );
        Ok(())
    }

    #[test]
    fn test_filters_without_list_are_blank() -> Result<()> {
        let instances = pair();
        let bindings = ReportBindings {
            instances: &instances,
            filter: None,
            mapping: None,
            dataset: "ds",
        }
        .to_bindings();
        let sql = bindings.resolve("t.sql", "X<w_schema_filter><a_schema_filter><schema_filter>Y")?;
        assert_eq!(sql, "XY");
        Ok(())
    }

    #[test]
    fn test_owner_tokens_need_mapping() -> Result<()> {
        let instances = pair();
        let template = "WHERE i1.owner = '<instance_1_owner>' AND i2.owner = '<instance_2_owner>'";

        let unmapped = ReportBindings {
            instances: &instances,
            filter: None,
            mapping: None,
            dataset: "ds",
        }
        .to_bindings();
        assert!(unmapped.resolve("m.sql", template).is_err());

        let mapping = SchemaMapping::parse("HR/hr_pg")?;
        let mapped = ReportBindings {
            instances: &instances,
            filter: None,
            mapping: Some(&mapping),
            dataset: "ds",
        }
        .to_bindings();
        assert_eq!(
            mapped.resolve("m.sql", template)?,
            "WHERE i1.owner = 'HR' AND i2.owner = 'hr_pg'"
        );
        Ok(())
    }
}
