// metadiff-core/src/lib.rs

#![allow(missing_docs)]
// 1. Memory safety
#![deny(unsafe_code)]
// 2. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 3. Performance
#![warn(clippy::perf)]

// --- HEXAGONAL MODULES ---

// 1. Ports (Interfaces / Traits)
// Contracts the pipeline needs: Connector, SecretStore.
pub mod ports;

// 2. Domain
// Placeholders, scope rewrite, file naming, instance pairing, type inference.
// Depends on nothing else in the crate.
pub mod domain;

// 3. Infrastructure (Adapters)
// DuckDB / Postgres / Oracle, config files, zip archives, delimited files, renderers.
pub mod infrastructure;

// 4. Application (Use Cases)
// Extraction, staging, report execution.
pub mod application;

// --- GLOBAL ERROR HANDLING ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
pub use error::MetadiffError;
