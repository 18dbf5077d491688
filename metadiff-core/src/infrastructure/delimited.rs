// metadiff-core/src/infrastructure/delimited.rs

// Extract files: `|` delimited, one header row, empty field = NULL.

use std::path::Path;

use crate::domain::staging::DelimitedTable;
use crate::domain::value::ResultSet;
use crate::infrastructure::error::InfrastructureError;

pub const DELIMITER: u8 = b'|';

/// Serialize a result set with its column names as header.
pub fn encode(result: &ResultSet) -> Result<Vec<u8>, InfrastructureError> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .from_writer(Vec::new());

    writer.write_record(&result.columns)?;
    for row in &result.rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }

    writer
        .into_inner()
        .map_err(|e| InfrastructureError::Io(std::io::Error::other(e.to_string())))
}

pub fn read(path: &Path) -> Result<DelimitedTable, InfrastructureError> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(DELIMITER)
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(
            record
                .iter()
                .map(|field| (!field.is_empty()).then(|| field.to_string()))
                .collect(),
        );
    }

    Ok(DelimitedTable::new(headers, rows))
}
