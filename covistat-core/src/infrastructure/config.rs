// covistat-core/src/infrastructure/config.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::infrastructure::error::InfrastructureError;

/// Runtime configuration, passed explicitly into the pipeline and the
/// server (no ambient process state).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Project root the relative directories are resolved against.
    #[serde(skip)]
    pub project_dir: PathBuf,

    /// Where uploaded datasets are stored.
    #[serde(rename = "upload-dir", default = "default_upload_dir")]
    pub upload_dir: PathBuf,

    /// Where the six artifacts are written.
    #[serde(rename = "output-dir", default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Maximum accepted request body size for uploads.
    #[serde(rename = "max-upload-bytes", default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    /// Row cap of the raw data preview artifact.
    #[serde(rename = "preview-rows", default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}
fn default_max_upload_bytes() -> usize {
    16 * 1024 * 1024 // 16 MiB
}
fn default_preview_rows() -> usize {
    20
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            project_dir: PathBuf::new(),
            upload_dir: default_upload_dir(),
            output_dir: default_output_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl AppConfig {
    /// Anchor relative directories under `project_dir`.
    fn resolved(mut self, project_dir: &Path) -> Self {
        if self.upload_dir.is_relative() {
            self.upload_dir = project_dir.join(&self.upload_dir);
        }
        if self.output_dir.is_relative() {
            self.output_dir = project_dir.join(&self.output_dir);
        }
        self.project_dir = project_dir.to_path_buf();
        self
    }

    pub fn artifact_path(&self, name: &str) -> PathBuf {
        self.output_dir.join(name)
    }

    /// Create the upload and output folders if they do not exist yet.
    pub fn bootstrap_dirs(&self) -> Result<(), InfrastructureError> {
        fs::create_dir_all(&self.upload_dir)?;
        fs::create_dir_all(&self.output_dir)?;
        Ok(())
    }
}

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_config(project_dir: &Path) -> Result<AppConfig, InfrastructureError> {
    // 1. Découverte du fichier principal (optionnel : defaults sinon)
    let mut config = match find_main_config(project_dir) {
        Some(config_path) => {
            info!(path = ?config_path, "Loading configuration");
            let content = fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&content)?
        }
        None => {
            info!("No configuration file found, using defaults");
            AppConfig::default()
        }
    };

    // 2. Override via Variables d'Environnement (Pattern 'Layering')
    // Permet de faire: COVISTAT_OUTPUT_DIR=/tmp/out covistat serve
    apply_env_overrides(&mut config);

    Ok(config.resolved(project_dir))
}

fn find_main_config(root: &Path) -> Option<PathBuf> {
    let candidates = ["covistat_conf.yaml", "covistat.yaml"];
    candidates
        .iter()
        .map(|filename| root.join(filename))
        .find(|p| p.exists())
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(val) = std::env::var("COVISTAT_UPLOAD_DIR") {
        info!(old = ?config.upload_dir, new = ?val, "Overriding upload dir via ENV");
        config.upload_dir = PathBuf::from(val);
    }
    if let Ok(val) = std::env::var("COVISTAT_OUTPUT_DIR") {
        info!(old = ?config.output_dir, new = ?val, "Overriding output dir via ENV");
        config.output_dir = PathBuf::from(val);
    }
}
