// metadiff-core/src/application/stage.rs

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};
use walkdir::WalkDir;

use crate::domain::kind::ResetStrategy;
use crate::domain::naming::{ARCHIVE_EXTENSION, DELIMITED_EXTENSION, is_excluded, staging_table_name};
use crate::error::MetadiffError;
use crate::infrastructure::error::InfrastructureError;
use crate::infrastructure::fs::move_replacing;
use crate::infrastructure::{archive, delimited};
use crate::ports::connector::Connector;

#[derive(Debug, Clone)]
pub struct StageOptions<'a> {
    pub dir: &'a Path,
    pub schema: &'a str,
    pub reset: ResetStrategy,
    pub exclude_patterns: &'a [String],
    /// Subdirectory of `dir` consumed archives are moved to.
    pub archive_dir: &'a str,
    pub batch_size: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedFile {
    pub file: String,
    pub table: String,
    pub rows: u64,
}

/// What a staging run did, file by file.
#[derive(Debug, Clone, Default)]
pub struct StageReport {
    pub archives_expanded: Vec<PathBuf>,
    pub corrupt_archives: Vec<PathBuf>,
    pub tables_reset: Vec<String>,
    pub loaded: Vec<LoadedFile>,
    /// File name and error of every file whose load failed.
    pub failed: Vec<(String, String)>,
    /// Files without a table name, left in place.
    pub skipped: Vec<String>,
    pub excluded: Vec<String>,
}

impl StageReport {
    pub fn total_rows(&self) -> u64 {
        self.loaded.iter().map(|l| l.rows).sum()
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn files_with_extension(dir: &Path, extension: &str) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .is_some_and(|x| x.eq_ignore_ascii_case(extension))
        })
        .collect()
}

/// Expand every archive in `dir`, then load every delimited file into `schema`.
///
/// Each target table is reset exactly once per run before anything is appended to it, so the
/// staged contents always equal the union of this run's files.
#[instrument(skip_all, fields(dir = ?options.dir, schema = options.schema))]
pub async fn run_staging(
    connector: &dyn Connector,
    options: &StageOptions<'_>,
) -> Result<StageReport, MetadiffError> {
    if !options.dir.is_dir() {
        return Err(InfrastructureError::ConfigNotFound(format!("{:?}", options.dir)).into());
    }
    let mut report = StageReport::default();

    // 1. Archives. They stay in place until the load has finished.
    let mut expanded: Vec<PathBuf> = Vec::new();
    for path in files_with_extension(options.dir, ARCHIVE_EXTENSION) {
        match archive::unpack(&path, options.dir) {
            Ok(files) => {
                info!(archive = ?path, files = files.len(), "Expanded archive");
                expanded.push(path);
            }
            Err(e) => {
                error!(archive = ?path, "Skipping corrupt archive: {}", e);
                report.corrupt_archives.push(path);
            }
        }
    }

    // 2. Candidate files
    let mut targets: Vec<(PathBuf, String)> = Vec::new();
    let mut consumed: Vec<PathBuf> = Vec::new();
    for path in files_with_extension(options.dir, DELIMITED_EXTENSION) {
        let name = file_name(&path);
        if is_excluded(&name, options.exclude_patterns) {
            info!(file = %name, "Excluded from staging");
            report.excluded.push(name);
            consumed.push(path);
            continue;
        }
        match staging_table_name(&name) {
            Ok(table) => targets.push((path, table)),
            Err(e) => {
                warn!(file = %name, "{}", e);
                report.skipped.push(name);
            }
        }
    }

    connector.ensure_schema(options.schema).await?;

    // 3. Reset, whole schema variant
    if options.reset == ResetStrategy::WholeSchema {
        for table in connector.list_tables(options.schema).await? {
            connector.drop_table(options.schema, &table).await?;
            report.tables_reset.push(table);
        }
    }

    // 4. Load
    let mut reset_done: HashSet<String> = HashSet::new();
    for (path, table) in targets {
        let name = file_name(&path);
        if options.reset == ResetStrategy::PerTable && reset_done.insert(table.clone()) {
            connector.drop_table(options.schema, &table).await?;
            report.tables_reset.push(table.clone());
        }

        let outcome = match delimited::read(&path) {
            Ok(data) => {
                connector
                    .bulk_load(options.schema, &table, &data, options.batch_size)
                    .await
            }
            Err(e) => Err(e.into()),
        };
        match outcome {
            Ok(rows) => {
                info!(file = %name, table = %table, rows, "Loaded");
                report.loaded.push(LoadedFile {
                    file: name,
                    table,
                    rows,
                });
            }
            Err(e) => {
                error!(file = %name, table = %table, "Load failed: {}", e);
                report.failed.push((name, e.to_string()));
            }
        }
        consumed.push(path);
    }

    // 5. Cleanup
    let archive_dir = options.dir.join(options.archive_dir);
    if !expanded.is_empty() {
        fs::create_dir_all(&archive_dir)?;
    }
    for path in expanded {
        let target = archive_dir.join(file_name(&path));
        move_replacing(&path, &target)?;
        report.archives_expanded.push(target);
    }
    for path in consumed {
        if let Err(e) = fs::remove_file(&path) {
            warn!(file = ?path, "Could not delete staged file: {}", e);
        }
    }

    info!(
        loaded = report.loaded.len(),
        failed = report.failed.len(),
        rows = report.total_rows(),
        "Staging complete"
    );
    Ok(report)
}
