// metadiff-core/src/domain/mod.rs

pub mod comparison;
pub mod error;
pub mod inference;
pub mod instance;
pub mod kind;
pub mod naming;
pub mod query;
pub mod report;
pub mod settings;
pub mod staging;
pub mod template;
pub mod value;

pub use comparison::{ComparisonConfig, SectionTemplate};
pub use error::DomainError;
pub use instance::InstancePair;
pub use kind::{ReportFormat, ResetStrategy, SourceKind, ViewType, WarehouseKind};
pub use query::{QuerySet, QuerySpec};
pub use report::{ComparisonReport, SectionResult};
pub use settings::{ReportSettings, Settings};
pub use value::{Record, ResultSet, Value};
