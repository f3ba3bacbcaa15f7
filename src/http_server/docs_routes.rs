//! Documentation and health routes

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};

use super::response::HealthResponse;

const INDEX_HTML: &str = include_str!("../../assets/index.html");

/// `/` documentation page and `/health`
pub fn docs_routes() -> Router {
    Router::new()
        .route("/", get(docs_handler))
        .route("/health", get(health_handler))
}

async fn docs_handler() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn health_handler() -> impl IntoResponse {
    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    };

    (StatusCode::OK, Json(response))
}
