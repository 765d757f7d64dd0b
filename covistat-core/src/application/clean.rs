// covistat-core/src/application/clean.rs

use crate::error::CovistatError;
use crate::infrastructure::config::AppConfig;
use std::fs;

/// Remove generated artifacts and stored uploads.
///
/// Only folders sitting under the project directory are touched; an
/// override pointing elsewhere is rejected rather than deleted.
pub fn clean_workspace(config: &AppConfig) -> Result<(), CovistatError> {
    tracing::info!("🧹 Initializing cleanup sequence...");

    for dir in [&config.output_dir, &config.upload_dir] {
        // Zero-Trust Path Traversal Guard
        if !dir.starts_with(&config.project_dir) {
            return Err(CovistatError::UnsafePath(dir.display().to_string()));
        }

        if dir.exists() {
            fs::remove_dir_all(dir)?;
            println!("   🗑️  Folder removed: {}", dir.display());
        }
    }

    Ok(())
}
