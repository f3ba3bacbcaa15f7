//! Table HTTP Routes
//!
//! CRUD over the rows of the backing table on `/api`.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::table::{NewRow, Row, TableError, TableResult, TableStore, UpsertOutcome};

use super::errors::{ApiError, ApiResult};
use super::request::RequestArgs;
use super::response::{
    ListResponse, MessageResponse, RECORD_ADDED, RECORD_CREATED_ON_NO_MATCH, RECORD_DELETED,
    RECORD_NOT_FOUND, RECORD_UPDATED,
};

// ==================
// Shared State
// ==================

/// State shared by the table and upload handlers
#[derive(Debug)]
pub struct TableState {
    pub store: TableStore,
    pub max_upload_bytes: usize,
}

impl TableState {
    pub fn new(store: TableStore, max_upload_bytes: usize) -> Self {
        Self {
            store,
            max_upload_bytes,
        }
    }
}

// ==================
// Table Routes
// ==================

/// Create table routes
pub fn table_routes(state: Arc<TableState>) -> Router {
    Router::new()
        .route(
            "/api",
            get(list_handler)
                .post(create_handler)
                .put(upsert_handler)
                .delete(delete_handler),
        )
        .with_state(state)
}

/// Run a store call on the blocking pool. Each call decodes, encodes and
/// fsyncs the whole file under the store mutex.
pub(super) async fn run_blocking<T, F>(state: &Arc<TableState>, op: F) -> ApiResult<T>
where
    F: FnOnce(&TableStore) -> TableResult<T> + Send + 'static,
    T: Send + 'static,
{
    let state = Arc::clone(state);
    match tokio::task::spawn_blocking(move || op(&state.store)).await {
        Ok(result) => Ok(result?),
        Err(e) => Err(TableError::Internal(format!("store task failed: {}", e)).into()),
    }
}

async fn list_handler(State(state): State<Arc<TableState>>) -> ApiResult<Json<ListResponse>> {
    let data = run_blocking(&state, |store| store.read_all()).await?;
    Ok(Json(ListResponse::new(data)))
}

async fn create_handler(
    State(state): State<Arc<TableState>>,
    args: RequestArgs,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let fields = NewRow {
        novel: args.required_text("novel")?,
        author: args.required_text("author")?,
        country: args.required_text("country")?,
    };

    run_blocking(&state, move |store| store.append_row(&fields)).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new(RECORD_ADDED))))
}

async fn upsert_handler(
    State(state): State<Arc<TableState>>,
    args: RequestArgs,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let row = Row::new(
        args.required_int("bookno")?.to_string(),
        args.required_text("novel")?,
        args.required_text("author")?,
        args.required_text("country")?,
    );

    let outcome = run_blocking(&state, move |store| store.upsert(&row)).await?;
    let (status, message) = match outcome {
        UpsertOutcome::Updated(_) => (StatusCode::OK, RECORD_UPDATED),
        UpsertOutcome::Created(_) => (StatusCode::CREATED, RECORD_CREATED_ON_NO_MATCH),
    };
    Ok((status, Json(MessageResponse::new(message))))
}

async fn delete_handler(
    State(state): State<Arc<TableState>>,
    args: RequestArgs,
) -> ApiResult<Json<MessageResponse>> {
    let key = args.required_int("bookno")?.to_string();

    match run_blocking(&state, move |store| store.delete_by_key(&key)).await? {
        Some(_) => Ok(Json(MessageResponse::new(RECORD_DELETED))),
        None => Err(ApiError::NotFound(RECORD_NOT_FOUND.to_string())),
    }
}
