// metadiff-core/src/infrastructure/config/queries.rs

use std::fs;
use std::path::Path;
use tracing::{debug, info};

use crate::domain::comparison::{ComparisonConfig, SectionTemplate};
use crate::domain::query::{QuerySet, QuerySpec};
use crate::infrastructure::config::project::load_fragment;
use crate::infrastructure::error::InfrastructureError;

/// Load a query set file (`queries: [{name, query}, ...]`).
pub fn load_query_set(path: &Path) -> Result<Vec<QuerySpec>, InfrastructureError> {
    if !path.exists() {
        return Err(InfrastructureError::ConfigNotFound(format!("{:?}", path)));
    }
    let set: QuerySet = load_fragment(path)?;
    if set.queries.is_empty() {
        return Err(InfrastructureError::ConfigError(format!(
            "Query set {:?} defines no queries",
            path
        )));
    }
    info!(path = ?path, count = set.queries.len(), "Loaded query set");
    Ok(set.queries)
}

/// Load a comparison config and the text of every template it lists, in section order.
pub fn load_comparison(
    config_path: &Path,
    queries_dir: &Path,
) -> Result<Vec<SectionTemplate>, InfrastructureError> {
    if !config_path.exists() {
        return Err(InfrastructureError::ConfigNotFound(format!(
            "{:?}",
            config_path
        )));
    }
    let config: ComparisonConfig = load_fragment(config_path)?;

    let mut sections = Vec::with_capacity(config.len());
    for (title, file_name) in config.sections {
        let path = queries_dir.join(&file_name);
        debug!(section = %title, path = ?path, "Loading template");
        let sql = fs::read_to_string(&path).map_err(|e| {
            InfrastructureError::ConfigError(format!(
                "Cannot read template {:?} for section '{}': {}",
                path, title, e
            ))
        })?;
        sections.push(SectionTemplate {
            title,
            file_name,
            sql,
        });
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_load_query_set() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("q.yaml");
        fs::write(
            &path,
            "queries:\n  - name: x__tables\n    query: SELECT 1\n  - name: x__columns\n    query: SELECT 2\n",
        )?;
        let queries = load_query_set(&path)?;
        let names: Vec<&str> = queries.iter().map(|q| q.name.as_str()).collect();
        assert_eq!(names, vec!["x__tables", "x__columns"]);
        Ok(())
    }

    #[test]
    fn test_empty_query_set_is_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("q.yaml");
        fs::write(&path, "queries: []\n")?;
        assert!(load_query_set(&path).is_err());
        Ok(())
    }

    #[test]
    fn test_load_comparison_in_order() -> Result<()> {
        let dir = tempdir()?;
        fs::write(dir.path().join("tables.sql"), "SELECT 1")?;
        fs::write(dir.path().join("columns.sql"), "SELECT 2")?;
        let config = dir.path().join("config.yaml");
        fs::write(&config, "Tables: tables.sql\nColumns: columns.sql\n")?;

        let sections = load_comparison(&config, dir.path())?;
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].title, "Tables");
        assert_eq!(sections[1].sql, "SELECT 2");
        Ok(())
    }

    #[test]
    fn test_missing_template_is_an_error() -> Result<()> {
        let dir = tempdir()?;
        let config = dir.path().join("config.yaml");
        fs::write(&config, "Tables: tables.sql\n")?;
        assert!(load_comparison(&config, dir.path()).is_err());
        Ok(())
    }
}
