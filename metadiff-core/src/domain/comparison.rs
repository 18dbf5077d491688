// metadiff-core/src/domain/comparison.rs

use indexmap::IndexMap;
use serde::Deserialize;

/// Report sections in table-of-contents order: title → template file.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct ComparisonConfig {
    pub sections: IndexMap<String, String>,
}

impl ComparisonConfig {
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// A section with its template text loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionTemplate {
    pub title: String,
    pub file_name: String,
    pub sql: String,
}
