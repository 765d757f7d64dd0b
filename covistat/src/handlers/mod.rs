// covistat/src/handlers/mod.rs

//! Dashboard route handlers: assembles all endpoint routes into a single
//! Axum router.

pub mod dashboard;
pub mod upload;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;

use crate::state::AppState;

/// Build the complete router with all routes and the upload body cap.
pub fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    Router::new()
        .merge(dashboard::routes())
        .merge(upload::routes())
        .layer(body_limit)
        .with_state(state)
}
