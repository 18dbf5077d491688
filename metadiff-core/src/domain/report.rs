// metadiff-core/src/domain/report.rs

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::domain::instance::InstancePair;
use crate::domain::value::Record;

/// Rows returned by one section's query.
#[derive(Debug, Clone, Serialize)]
pub struct SectionResult {
    pub title: String,
    pub template: String,
    pub records: Vec<Record>,
}

impl SectionResult {
    /// Column headers, taken from the first record only.
    pub fn headers(&self) -> Vec<&str> {
        self.records
            .first()
            .map(|r| r.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }
}

/// Everything a renderer needs.
#[derive(Debug, Clone, Serialize)]
pub struct ComparisonReport {
    pub instances: InstancePair,
    pub sections: Vec<SectionResult>,
    pub generated_at: DateTime<Local>,
}

/// HTML anchor of a section: the title with spaces replaced by `_`.
pub fn section_anchor(title: &str) -> String {
    title.replace(' ', "_")
}
