// metadiff-core/src/domain/template/mod.rs

pub mod filters;
pub mod placeholder;
pub mod scope;

pub use filters::{ReportBindings, SchemaFilter, SchemaMapping};
pub use placeholder::{Bindings, Placeholder};
pub use scope::rewrite_for_user_scope;
