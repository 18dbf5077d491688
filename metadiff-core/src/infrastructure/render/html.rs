// metadiff-core/src/infrastructure/render/html.rs

use minijinja::{Environment, context};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::application::ports::ReportRenderer;
use crate::domain::naming::report_file_name;
use crate::domain::report::{ComparisonReport, section_anchor};
use crate::error::MetadiffError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::atomic_write;

const TEMPLATE_NAME: &str = "report.html";

#[derive(Serialize)]
struct SectionView<'a> {
    title: &'a str,
    anchor: String,
    headers: Vec<&'a str>,
    // Each row keeps its own value order; headers come from the first row.
    rows: Vec<Vec<String>>,
}

/// Self-contained HTML report: index, sortable tables, back-to-top button.
/// Cell text is escaped by the template engine (`.html` templates auto-escape).
pub struct HtmlRenderer {
    env: Environment<'static>,
}

impl HtmlRenderer {
    pub fn new() -> Result<Self, InfrastructureError> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, include_str!("templates/report.html"))?;
        Ok(Self { env })
    }
}

impl ReportRenderer for HtmlRenderer {
    fn render(&self, report: &ComparisonReport) -> Result<String, MetadiffError> {
        let sections: Vec<SectionView<'_>> = report
            .sections
            .iter()
            .map(|section| SectionView {
                title: &section.title,
                anchor: section_anchor(&section.title),
                headers: section.headers(),
                rows: section
                    .records
                    .iter()
                    .map(|record| record.values().map(|v| v.to_string()).collect())
                    .collect(),
            })
            .collect();

        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(InfrastructureError::TemplateError)?;
        let html = template
            .render(context! {
                instances => &report.instances,
                generated_at => report.generated_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                sections => sections,
            })
            .map_err(InfrastructureError::TemplateError)?;
        Ok(html)
    }
}

/// Write `html` to `database_comparison_report_<timestamp>.html` under `output_dir`.
pub fn write_html_report(
    output_dir: &Path,
    html: &str,
    report: &ComparisonReport,
) -> Result<PathBuf, InfrastructureError> {
    std::fs::create_dir_all(output_dir)?;
    let path = output_dir.join(report_file_name(&report.generated_at));
    atomic_write(&path, html)?;
    Ok(path)
}
