// covistat/src/state.rs

//! Shared application state for all handlers.

use covistat_core::infrastructure::config::AppConfig;
use minijinja::Environment;
use tokio::sync::Mutex;

/// Shared state available to all Axum handlers via `State<Arc<AppState>>`.
pub struct AppState {
    /// Runtime configuration (directories, upload limit, preview size).
    pub config: AppConfig,
    /// Template environment with the embedded pages.
    pub templates: Environment<'static>,
    /// Serializes analysis runs so two concurrent uploads cannot
    /// interleave their artifact writes.
    pub run_lock: Mutex<()>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, minijinja::Error> {
        Ok(Self {
            config,
            templates: crate::render::build_environment()?,
            run_lock: Mutex::new(()),
        })
    }
}
