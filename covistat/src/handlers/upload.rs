// covistat/src/handlers/upload.rs

//! `POST /upload`: validate the multipart upload, store it, run the
//! analysis pipeline and redirect to the dashboard.

use std::path::Path;
use std::sync::{Arc, OnceLock};

use axum::Router;
use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::response::Redirect;
use axum::routing::post;
use regex::Regex;

use covistat_core::application::run_analysis;

use crate::error::AppError;
use crate::state::AppState;

/// Register upload routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/upload", post(upload))
}

async fn upload(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Redirect, AppError> {
    let (filename, data) = extract_file_field(multipart).await?;

    if filename.is_empty() {
        return Err(AppError::bad_request("No file selected"));
    }
    if !has_csv_extension(&filename) {
        return Err(AppError::bad_request(
            "Invalid file type. Only CSV files allowed.",
        ));
    }

    let safe_name = sanitize_filename(&filename)
        .ok_or_else(|| AppError::bad_request("Unusable file name"))?;
    let dest = state.config.upload_dir.join(&safe_name);
    tokio::fs::write(&dest, &data)
        .await
        .map_err(|e| AppError::internal(format!("Could not store upload: {e}")))?;
    tracing::info!(file = %safe_name, bytes = data.len(), "Upload stored");

    // One run at a time: a second upload waits here instead of racing the
    // artifact writes of the first.
    let _guard = state.run_lock.lock().await;

    let config = state.config.clone();
    let run = tokio::task::spawn_blocking(move || run_analysis(&config, &dest))
        .await
        .map_err(|e| AppError::internal(format!("Analysis task failed: {e}")))??;

    tracing::info!(rows = run.rows_clean, artifacts = run.artifacts.len(), "Analysis succeeded");
    Ok(Redirect::to("/"))
}

/// Pull the `file` field out of the multipart body.
async fn extract_file_field(mut multipart: Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(format!("Malformed upload request: {e}")))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::bad_request(format!("Could not read upload: {e}")))?;
            return Ok((filename, data));
        }
    }
    Err(AppError::bad_request("No file uploaded"))
}

fn has_csv_extension(name: &str) -> bool {
    Path::new(name)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Reduce a client-declared filename to something safe to use as a storage
/// path: final path component only, unsafe characters collapsed, leading
/// dots stripped. `None` when nothing usable remains.
fn sanitize_filename(name: &str) -> Option<String> {
    static UNSAFE_CHARS: OnceLock<Regex> = OnceLock::new();
    let unsafe_chars = UNSAFE_CHARS
        .get_or_init(|| Regex::new(r"[^A-Za-z0-9._-]+").expect("hardcoded pattern is valid"));

    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned = unsafe_chars.replace_all(base, "_");
    let cleaned = cleaned.trim_start_matches('.');

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '_') {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::handlers::testutil::test_app;
    use anyhow::Result;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use tower::ServiceExt;

    const SAMPLE: &str = "country,new_cases,new_deaths,vaccinated\nUS,100,1,50\nUS,200,2,60\n";
    const BOUNDARY: &str = "covistat-test-boundary";

    fn multipart_request(field_name: &str, filename: &str, content: &str) -> Request<Body> {
        let body = format!(
            "--{BOUNDARY}\r\n\
             Content-Disposition: form-data; name=\"{field_name}\"; filename=\"{filename}\"\r\n\
             Content-Type: text/csv\r\n\r\n\
             {content}\r\n\
             --{BOUNDARY}--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri("/upload")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_text(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_upload_without_file_field_is_rejected() {
        let (_dir, _state, router) = test_app();
        let response = router
            .oneshot(multipart_request("other", "data.csv", SAMPLE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("No file uploaded"));
    }

    #[tokio::test]
    async fn test_upload_with_empty_filename_is_rejected() {
        let (_dir, _state, router) = test_app();
        let response = router
            .oneshot(multipart_request("file", "", SAMPLE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("No file selected"));
    }

    #[tokio::test]
    async fn test_upload_with_wrong_extension_is_rejected() {
        let (_dir, _state, router) = test_app();
        let response = router
            .oneshot(multipart_request("file", "data.txt", SAMPLE))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Invalid file type"));
    }

    #[tokio::test]
    async fn test_valid_upload_redirects_and_writes_artifacts() -> Result<()> {
        let (_dir, state, router) = test_app();
        let response = router
            .oneshot(multipart_request("file", "data.csv", SAMPLE))
            .await
            .unwrap();

        assert!(response.status().is_redirection());
        assert_eq!(response.headers()[header::LOCATION], "/");

        for name in covistat_core::application::artifact_names() {
            assert!(
                state.config.artifact_path(name).exists(),
                "missing artifact {name}"
            );
        }
        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_upload_is_a_pipeline_failure() {
        let (_dir, _state, router) = test_app();
        // ragged row: second line has one field
        let response = router
            .oneshot(multipart_request("file", "data.csv", "a,b\n1,2\n3\n"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body_text(response).await.contains("Analysis failed"));
    }

    #[test]
    fn test_csv_extension_check_is_case_insensitive() {
        assert!(has_csv_extension("data.csv"));
        assert!(has_csv_extension("DATA.CSV"));
        assert!(!has_csv_extension("data.txt"));
        assert!(!has_csv_extension("csv"));
    }

    #[test]
    fn test_sanitize_filename_neutralizes_traversal() {
        assert_eq!(sanitize_filename("data.csv").as_deref(), Some("data.csv"));
        assert_eq!(
            sanitize_filename("../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(
            sanitize_filename("..\\..\\boot.ini").as_deref(),
            Some("boot.ini")
        );
        assert_eq!(
            sanitize_filename("my data (1).csv").as_deref(),
            Some("my_data_1_.csv")
        );
        assert_eq!(sanitize_filename("...."), None);
        assert_eq!(sanitize_filename("///"), None);
    }
}
