// metadiff-core/src/application/mod.rs

pub mod engine;
pub mod extract;
pub mod pipeline;
pub mod ports;
pub mod report;
pub mod stage;

pub use extract::{ExtractOutcome, ExtractRequest, prepare_queries, run_extraction};
pub use pipeline::{
    CompareOptions, CompareOutcome, build_report, extract_source, run_comparison, stage_extracts,
};
pub use report::{ReportOutput, ReportRequest, discover_instances, publish_report, run_report};
pub use stage::{LoadedFile, StageOptions, StageReport, run_staging};
