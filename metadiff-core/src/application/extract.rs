// metadiff-core/src/application/extract.rs

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};

use crate::application::engine::run_named_query;
use crate::domain::error::DomainError;
use crate::domain::kind::ViewType;
use crate::domain::naming::{archive_name, extract_file_name};
use crate::domain::query::QuerySpec;
use crate::domain::template::{Bindings, Placeholder, rewrite_for_user_scope};
use crate::error::MetadiffError;
use crate::infrastructure::archive;
use crate::infrastructure::config::connection::SourceIdentity;
use crate::infrastructure::delimited;
use crate::infrastructure::fs::atomic_write;
use crate::ports::connector::Connector;

/// What to extract and where to put it.
#[derive(Debug, Clone)]
pub struct ExtractRequest<'a> {
    pub identity: &'a SourceIdentity,
    pub queries: &'a [QuerySpec],
    pub view_type: ViewType,
    /// Connecting user; bound into the owner column for the `user` view scope.
    pub user: Option<&'a str>,
    pub host_prefix: bool,
    pub out_dir: &'a Path,
}

#[derive(Debug, Clone)]
pub struct ExtractOutcome {
    pub archive: PathBuf,
    /// Delimited file names inside the archive, in query order.
    pub files: Vec<String>,
    pub total_rows: usize,
}

/// A query with every placeholder resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedQuery {
    pub name: String,
    pub sql: String,
}

/// Resolve every query up front so that a bad template fails before anything runs.
pub fn prepare_queries(
    queries: &[QuerySpec],
    view_type: ViewType,
    db_token: &str,
    user: Option<&str>,
) -> Result<Vec<PreparedQuery>, DomainError> {
    let bindings = Bindings::new()
        .bind(Placeholder::ViewType, view_type.as_str())
        .bind(Placeholder::DbName, db_token);

    queries
        .iter()
        .map(|spec| {
            let template = match (view_type, user) {
                (ViewType::User, Some(user)) => rewrite_for_user_scope(&spec.query, user),
                _ => spec.query.clone(),
            };
            Ok(PreparedQuery {
                name: spec.name.clone(),
                sql: bindings.resolve(&spec.name, &template)?,
            })
        })
        .collect()
}

/// Run every query, then write one delimited file per query and bundle them into the
/// source's archive. Nothing is written unless every query succeeded.
#[instrument(skip_all, fields(source = %request.identity.label, kind = %request.identity.kind))]
pub async fn run_extraction(
    connector: &dyn Connector,
    request: &ExtractRequest<'_>,
) -> Result<ExtractOutcome, MetadiffError> {
    let identity = request.identity;
    let prepared = prepare_queries(
        request.queries,
        request.view_type,
        &identity.db_token,
        request.user,
    )?;

    let host_token = request.host_prefix.then_some(identity.db_token.as_str());
    let mut buffered: Vec<(String, Vec<u8>)> = Vec::with_capacity(prepared.len());
    let mut total_rows = 0;
    for query in &prepared {
        let result = run_named_query(connector, &query.name, &query.sql).await?;
        info!(query = %query.name, rows = result.len(), "Extracted");
        total_rows += result.len();
        buffered.push((
            extract_file_name(host_token, &query.name),
            delimited::encode(&result)?,
        ));
    }

    fs::create_dir_all(request.out_dir)?;
    let archive_path = request
        .out_dir
        .join(archive_name(identity.kind, &identity.label));
    if archive_path.exists() {
        info!(path = ?archive_path, "Purging previous archive");
        fs::remove_file(&archive_path)?;
    }

    let mut written = Vec::with_capacity(buffered.len());
    let packed = write_and_pack(request.out_dir, &archive_path, &buffered, &mut written);
    for path in &written {
        if let Err(e) = fs::remove_file(path) {
            warn!(path = ?path, "Could not remove extract file: {}", e);
        }
    }
    packed?;

    info!(path = ?archive_path, files = buffered.len(), "Archive written");
    Ok(ExtractOutcome {
        archive: archive_path,
        files: buffered.into_iter().map(|(name, _)| name).collect(),
        total_rows,
    })
}

// `written` collects every file created, so the caller can clean up on any exit path.
fn write_and_pack(
    out_dir: &Path,
    archive_path: &Path,
    buffered: &[(String, Vec<u8>)],
    written: &mut Vec<PathBuf>,
) -> Result<(), MetadiffError> {
    for (name, content) in buffered {
        let path = out_dir.join(name);
        atomic_write(&path, content)?;
        written.push(path);
    }
    archive::pack(archive_path, written)?;
    Ok(())
}
