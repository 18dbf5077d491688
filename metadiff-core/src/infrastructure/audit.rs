// metadiff-core/src/infrastructure/audit.rs

use chrono::Local;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

use crate::infrastructure::error::InfrastructureError;

/// Append-only record of every SQL statement a report run executed.
pub struct QueryAuditLog {
    file: File,
}

impl QueryAuditLog {
    /// Open `path`, truncating what a previous run left there.
    pub fn create(path: &Path) -> Result<Self, InfrastructureError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self { file })
    }

    pub fn record(&mut self, template: &str, sql: &str) -> Result<(), InfrastructureError> {
        write!(
            self.file,
            "-- {} - Executed Query {}:\n{}\n\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            template,
            sql
        )?;
        self.file.flush()?;
        Ok(())
    }
}
