// metadiff-core/src/application/ports/renderer.rs

use crate::domain::report::ComparisonReport;
use crate::error::MetadiffError;

pub trait ReportRenderer: Send + Sync {
    fn render(&self, report: &ComparisonReport) -> Result<String, MetadiffError>;
}
