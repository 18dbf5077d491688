// metadiff-core/src/infrastructure/render/text.rs

use comfy_table::{Table, presets::ASCII_MARKDOWN};

use crate::application::ports::ReportRenderer;
use crate::domain::report::{ComparisonReport, SectionResult};
use crate::error::MetadiffError;

/// Plain-text report with markdown-style tables. Output depends only on the report content.
#[derive(Debug, Default)]
pub struct TextRenderer;

fn section_table(section: &SectionResult) -> String {
    let headers = section.headers();
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN);
    table.set_header(headers.clone());
    for record in &section.records {
        table.add_row(
            headers
                .iter()
                .map(|h| record.get(*h).map(|v| v.to_string()).unwrap_or_default())
                .collect::<Vec<String>>(),
        );
    }
    table.to_string()
}

impl ReportRenderer for TextRenderer {
    fn render(&self, report: &ComparisonReport) -> Result<String, MetadiffError> {
        let mut out = String::from("## Database Comparison Report\n\n");
        out.push_str(&format!("Instance 1: {}\n", report.instances.first));
        out.push_str(&format!("Instance 2: {}\n", report.instances.second));

        for section in &report.sections {
            out.push_str(&format!("\n### {}\n\n", section.title));
            if section.records.is_empty() {
                out.push_str("No results found.\n");
            } else {
                out.push_str(&section_table(section));
                out.push('\n');
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::instance::InstancePair;
    use crate::domain::value::{Record, Value};
    use anyhow::Result;
    use chrono::Local;

    fn report() -> ComparisonReport {
        let mut row = Record::new();
        row.insert("owner".into(), Value::from("HR"));
        row.insert("table_name".into(), Value::from("EMPLOYEES"));
        row.insert("num_rows".into(), Value::Int(107));
        ComparisonReport {
            instances: InstancePair {
                first: "orcl".into(),
                second: "pgprod".into(),
            },
            sections: vec![
                SectionResult {
                    title: "Tables".into(),
                    template: "tables.sql".into(),
                    records: vec![row],
                },
                SectionResult {
                    title: "Columns".into(),
                    template: "columns.sql".into(),
                    records: vec![],
                },
            ],
            generated_at: Local::now(),
        }
    }

    #[test]
    fn test_empty_section_says_no_results() -> Result<()> {
        let text = TextRenderer.render(&report())?;
        let columns = text
            .split("### Columns")
            .nth(1)
            .ok_or_else(|| anyhow::anyhow!("Columns section missing"))?;
        assert!(columns.contains("No results found."));

        let tables = text
            .split("### Tables")
            .nth(1)
            .and_then(|s| s.split("### Columns").next())
            .ok_or_else(|| anyhow::anyhow!("Tables section missing"))?;
        assert!(tables.contains("| owner"));
        assert!(tables.contains("EMPLOYEES"));
        assert!(tables.contains("107"));
        assert!(!tables.contains("No results found."));
        Ok(())
    }

    #[test]
    fn test_header_and_instances() -> Result<()> {
        let text = TextRenderer.render(&report())?;
        assert!(text.starts_with("## Database Comparison Report\n"));
        assert!(text.contains("Instance 1: orcl\n"));
        assert!(text.contains("Instance 2: pgprod\n"));
        Ok(())
    }

    #[test]
    fn test_output_is_deterministic() -> Result<()> {
        let a = report();
        let mut b = a.clone();
        b.generated_at = Local::now();
        assert_eq!(TextRenderer.render(&a)?, TextRenderer.render(&b)?);
        Ok(())
    }
}
