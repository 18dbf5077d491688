// metadiff-core/src/infrastructure/config/secrets.rs

use std::fs;
use std::path::PathBuf;
use tracing::debug;

use crate::error::MetadiffError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::secrets::SecretStore;

pub const SECRETS_DIR_ENV: &str = "METADIFF_SECRETS_DIR";
pub const PROJECT_ENV: &str = "GOOGLE_CLOUD_PROJECT";
pub const DEFAULT_SECRETS_DIR: &str = "/var/run/secrets/metadiff";

/// Secrets mounted as files: `<root>/<project>/<name>`.
#[derive(Debug, Clone)]
pub struct FileSecretStore {
    root: PathBuf,
    project: Option<String>,
}

impl FileSecretStore {
    pub fn new(root: impl Into<PathBuf>, project: Option<String>) -> Self {
        Self {
            root: root.into(),
            project,
        }
    }

    pub fn from_env() -> Self {
        let root = std::env::var(SECRETS_DIR_ENV).unwrap_or_else(|_| DEFAULT_SECRETS_DIR.into());
        let project = std::env::var(PROJECT_ENV).ok().filter(|p| !p.is_empty());
        Self::new(root, project)
    }
}

impl SecretStore for FileSecretStore {
    fn get_secret(&self, name: &str) -> Result<String, MetadiffError> {
        let project = self.project.as_deref().ok_or_else(|| {
            InfrastructureError::MissingConfiguration(format!(
                "{} must be set to resolve secret '{}'",
                PROJECT_ENV, name
            ))
        })?;
        let path = self.root.join(project).join(name);
        debug!(path = ?path, "Reading secret");
        let value = fs::read_to_string(&path).map_err(|e| {
            InfrastructureError::ConfigError(format!("Cannot read secret {:?}: {}", path, e))
        })?;
        Ok(value.trim_end_matches(['\r', '\n']).to_string())
    }
}
