//! Upload HTTP Route
//!
//! Replaces the backing table file wholesale from a multipart `file` field.

use std::sync::Arc;

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};

use super::errors::{ApiError, ApiResult};
use super::response::{MessageResponse, FILE_UPLOADED};
use super::table_routes::{run_blocking, TableState};

/// Multipart field holding the new table
const FILE_FIELD: &str = "file";

/// Create upload routes
pub fn upload_routes(state: Arc<TableState>) -> Router {
    let limit = state.max_upload_bytes;
    Router::new()
        .route("/upload", post(upload_handler))
        .layer(DefaultBodyLimit::max(limit))
        .with_state(state)
}

async fn upload_handler(
    State(state): State<Arc<TableState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<MessageResponse>> {
    let mut multipart = multipart.map_err(|e| ApiError::Multipart(e.body_text()))?;
    let limit = state.max_upload_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limit))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;

        run_blocking(&state, move |store| store.replace_file(&data)).await?;
        return Ok(Json(MessageResponse::new(FILE_UPLOADED)));
    }

    Err(ApiError::MissingFile)
}

fn multipart_error(e: MultipartError, limit: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(limit)
    } else {
        ApiError::Multipart(e.body_text())
    }
}
