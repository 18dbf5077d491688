// metadiff-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod archive;
pub mod audit;
pub mod config;
pub mod delimited;
pub mod error;
pub mod fs;
pub mod render;
