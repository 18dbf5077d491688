// metadiff-core/src/ports/mod.rs

pub mod connector;
pub mod secrets;
