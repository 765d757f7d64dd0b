// covistat/src/handlers/dashboard.rs

//! `GET /`: render the published summaries, or the upload prompt when no
//! complete result set exists yet.

use std::sync::Arc;

use axum::Router;
use axum::extract::State;
use axum::response::Html;
use axum::routing::get;
use minijinja::context;
use serde::Serialize;

use covistat_core::application::{PREVIEW_ARTIFACT, SUMMARIES};
use covistat_core::infrastructure::config::AppConfig;
use covistat_core::infrastructure::csv::read_delimited;
use covistat_core::infrastructure::error::InfrastructureError;

use crate::error::AppError;
use crate::state::AppState;

/// Register dashboard routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(index))
}

/// One rendered table: title, header and pre-formatted rows.
#[derive(Debug, Serialize)]
struct TableView {
    title: String,
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    // All-or-nothing: a single unreadable artifact means "no results",
    // never a partially populated dashboard.
    match load_dashboard_tables(&state.config) {
        Ok((summaries, preview)) => {
            let template = state
                .templates
                .get_template("index.html")
                .map_err(|e| AppError::internal(format!("Template error: {e}")))?;
            let rendered_at = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            let html = template
                .render(context! {
                    summaries => summaries,
                    preview => preview,
                    rendered_at => rendered_at,
                })
                .map_err(|e| AppError::internal(format!("Template error: {e}")))?;
            Ok(Html(html))
        }
        Err(e) => {
            tracing::debug!(reason = %e, "No complete result set, showing upload prompt");
            let template = state
                .templates
                .get_template("upload.html")
                .map_err(|e| AppError::internal(format!("Template error: {e}")))?;
            let html = template
                .render(context! {})
                .map_err(|e| AppError::internal(format!("Template error: {e}")))?;
            Ok(Html(html))
        }
    }
}

fn load_dashboard_tables(
    config: &AppConfig,
) -> Result<(Vec<TableView>, TableView), InfrastructureError> {
    let mut summaries = Vec::with_capacity(SUMMARIES.len());
    for spec in &SUMMARIES {
        let raw = read_delimited(&config.artifact_path(spec.artifact))?;
        summaries.push(TableView {
            title: spec.title.to_string(),
            columns: raw.headers,
            rows: raw.records,
        });
    }

    let raw = read_delimited(&config.artifact_path(PREVIEW_ARTIFACT))?;
    let preview = TableView {
        title: "Raw Data Preview".to_string(),
        columns: raw.headers,
        rows: raw.records,
    };

    Ok((summaries, preview))
}
