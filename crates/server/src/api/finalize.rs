use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;
use tracing::error;

use playlist2album_core::{FinalizeError, FinalizeRequest, FinalizeResult};

use super::handlers::{api_error, ApiError};
use crate::state::AppState;

/// Tag, rename and archive a completed job's tracks
pub async fn finalize(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FinalizeRequest>,
) -> Result<Json<FinalizeResult>, ApiError> {
    state
        .finalizer()
        .finalize(request)
        .await
        .map(Json)
        .map_err(|e| match e {
            FinalizeError::NotFound { .. } => api_error(StatusCode::NOT_FOUND, e.to_string()),
            e if e.is_validation() => api_error(StatusCode::BAD_REQUEST, e.to_string()),
            e => {
                error!("Finalize failed: {}", e);
                api_error(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        })
}
