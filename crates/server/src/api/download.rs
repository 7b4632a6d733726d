//! Download job API handlers.

use axum::{
    body::Body,
    extract::{Path, Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::{debug, error};

use playlist2album_core::{
    AlbumMeta, JobError, JobOutcome, JobStatus, LaunchedJob, ProgressSnapshot,
};

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for starting a download
#[derive(Debug, Deserialize)]
pub struct DownloadBody {
    pub playlist_url: String,
    #[serde(default)]
    pub album: AlbumMeta,
}

/// Returned with 202 while a job is still running
#[derive(Debug, Serialize)]
pub struct PendingResponse {
    pub detail: String,
    pub status: JobStatus,
}

// ============================================================================
// Handlers
// ============================================================================

/// Start a download job and return immediately
pub async fn start_download(
    State(state): State<Arc<AppState>>,
    Json(body): Json<DownloadBody>,
) -> Result<Json<LaunchedJob>, ApiError> {
    match state.jobs().launch(&body.playlist_url, &body.album).await {
        Ok(job) => Ok(Json(job)),
        Err(e @ JobError::InvalidRequest(_)) => {
            Err(api_error(StatusCode::BAD_REQUEST, e.to_string()))
        }
        Err(e @ JobError::NotFound { .. }) => {
            Err(api_error(StatusCode::NOT_FOUND, e.to_string()))
        }
        Err(e) => {
            error!("Failed to launch download job: {}", e);
            Err(api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

/// Get the track manifest of a finished job
pub async fn get_result(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Response {
    match state.jobs().result(&job_id) {
        Ok(job) => Json(job).into_response(),
        Err(JobOutcome::Pending(status)) => (
            StatusCode::ACCEPTED,
            Json(PendingResponse {
                detail: "still in progress".to_string(),
                status,
            }),
        )
            .into_response(),
        Err(JobOutcome::Failed(message)) => {
            api_error(StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
        }
        Err(JobOutcome::NotFound) | Err(JobOutcome::Completed(_)) => {
            api_error(StatusCode::NOT_FOUND, "job_id not found").into_response()
        }
    }
}

/// Get the progress of a job; unknown ids get a zeroed record
pub async fn get_progress(
    State(state): State<Arc<AppState>>,
    Path(job_id): Path<String>,
) -> Json<ProgressSnapshot> {
    Json(state.jobs().progress(&job_id))
}

/// Stream a finished archive
pub async fn serve_archive(
    State(state): State<Arc<AppState>>,
    Path(zip_name): Path<String>,
    request: Request,
) -> Response {
    if !is_single_component(&zip_name) {
        debug!(zip_name = %zip_name, "Rejected archive name");
        return api_error(StatusCode::NOT_FOUND, "not found").into_response();
    }

    let path = state.storage().out_dir().join(&zip_name);
    if !tokio::fs::metadata(&path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
    {
        return api_error(StatusCode::NOT_FOUND, "not found").into_response();
    }

    let mut response = match ServeFile::new(&path).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(e) => match e {},
    };

    if response.status().is_success() {
        if let Ok(value) = HeaderValue::from_str(&content_disposition(&zip_name)) {
            response
                .headers_mut()
                .insert(header::CONTENT_DISPOSITION, value);
        }
    }
    response
}

/// Whether `name` is a plain file name that cannot leave the output directory.
fn is_single_component(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.contains(['/', '\\', '\0'])
}

/// `attachment` disposition with an ASCII fallback and the UTF-8 name.
fn content_disposition(name: &str) -> String {
    let fallback: String = name
        .chars()
        .map(|c| if c.is_ascii_graphic() || c == ' ' { c } else { '_' })
        .filter(|c| *c != '"')
        .collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        fallback,
        urlencoding::encode(name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_component_names() {
        assert!(is_single_component("The Band - Road Trip.zip"));
        assert!(is_single_component("..hidden.zip"));
        assert!(!is_single_component(""));
        assert!(!is_single_component(".."));
        assert!(!is_single_component("../secret.zip"));
        assert!(!is_single_component("a/b.zip"));
        assert!(!is_single_component("a\\b.zip"));
    }

    #[test]
    fn test_content_disposition() {
        assert_eq!(
            content_disposition("Band - Album.zip"),
            "attachment; filename=\"Band - Album.zip\"; filename*=UTF-8''Band%20-%20Album.zip"
        );
        assert_eq!(
            content_disposition("Björk.zip"),
            "attachment; filename=\"Bj_rk.zip\"; filename*=UTF-8''Bj%C3%B6rk.zip"
        );
    }
}
