// metadiff-core/src/infrastructure/config/project.rs

use anyhow::Context;
use serde::{Deserialize, de::DeserializeOwned};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::domain::settings::Settings;
use crate::infrastructure::config::connection::{SourceSpec, WarehouseConnection};
use crate::infrastructure::error::InfrastructureError;

pub const CONFIG_CANDIDATES: [&str; 2] = ["metadiff.yaml", "metadiff.yml"];

/// Everything `metadiff.yaml` may hold.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ProjectConfig {
    #[serde(flatten)]
    pub settings: Settings,

    #[serde(default)]
    pub warehouse: WarehouseConnection,

    /// The two sources `compare` extracts, in order.
    #[serde(default)]
    pub sources: Vec<SourceSpec>,
}

/// Load settings from `explicit` (which must exist) or from the first candidate file in
/// `project_dir`. Without any file the defaults apply, relative to `project_dir`.
#[instrument(skip(project_dir))]
pub fn load_project_config(
    explicit: Option<&Path>,
    project_dir: &Path,
) -> Result<ProjectConfig, InfrastructureError> {
    let config_path = match explicit {
        Some(path) if path.exists() => Some(path.to_path_buf()),
        Some(path) => {
            return Err(InfrastructureError::ConfigNotFound(format!("{:?}", path)));
        }
        None => find_main_config(project_dir),
    };

    let mut config = match &config_path {
        Some(path) => {
            info!(path = ?path, "Loading metadiff settings");
            let mut config: ProjectConfig = load_fragment(path)?;
            let base = path.parent().unwrap_or(project_dir);
            config.settings.rebase(base);
            rebase_duckdb(&mut config.warehouse, base);
            config
        }
        None => {
            info!("No settings file found, using defaults");
            let mut config = ProjectConfig::default();
            config.settings.rebase(project_dir);
            config
        }
    };

    apply_env_overrides(&mut config.settings);
    Ok(config)
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    CONFIG_CANDIDATES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

fn rebase_duckdb(warehouse: &mut WarehouseConnection, base: &Path) {
    if let WarehouseConnection::DuckDB(params) = warehouse {
        let path = Path::new(&params.path);
        if params.path != ":memory:" && path.is_relative() {
            params.path = base.join(path).to_string_lossy().into_owned();
        }
    }
}

/// Load a typed YAML document.
pub fn load_fragment<T: DeserializeOwned>(path: &Path) -> Result<T, InfrastructureError> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {:?}", path))?;
    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse YAML at {:?}", path))
        .map_err(Into::into)
}

fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

/// Layer `METADIFF_*` values from `lookup` over the file settings.
pub fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("METADIFF_EXTRACTS_DIR") {
        info!(old = ?settings.extracts_dir, new = ?val, "Overriding extracts dir via ENV");
        settings.extracts_dir = PathBuf::from(val);
    }
    if let Some(val) = lookup("METADIFF_STAGING_SCHEMA") {
        info!(old = ?settings.staging_schema, new = ?val, "Overriding staging schema via ENV");
        settings.staging_schema = val;
    }
    if let Some(val) = lookup("METADIFF_OUTPUT_DIR") {
        info!(old = ?settings.report.output_dir, new = ?val, "Overriding output dir via ENV");
        settings.report.output_dir = PathBuf::from(val);
    }
}
