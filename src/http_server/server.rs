//! # HTTP Server
//!
//! Combines the table, upload and docs routers behind CORS and request
//! logging, and runs the serve loop.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::observability::{log_event, log_event_with_fields, Event};
use crate::table::TableStore;

use super::config::HttpServerConfig;
use super::docs_routes::docs_routes;
use super::table_routes::{table_routes, TableState};
use super::upload_routes::upload_routes;

/// HTTP server exposing one table file
pub struct HttpServer {
    config: HttpServerConfig,
    router: Router,
}

impl HttpServer {
    /// Create a server over `store`
    pub fn new(config: HttpServerConfig, store: TableStore) -> Self {
        let state = Arc::new(TableState::new(store, config.max_upload_bytes));
        let router = Self::build_router(&config, state);
        Self { config, router }
    }

    /// Build the combined router with all endpoints
    fn build_router(config: &HttpServerConfig, state: Arc<TableState>) -> Router {
        let cors = if config.cors_origins.is_empty() {
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        } else {
            let origins: Vec<_> = config
                .cors_origins
                .iter()
                .filter_map(|s| s.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(Any)
                .allow_headers(Any)
        };

        Router::new()
            .merge(docs_routes())
            .merge(table_routes(state.clone()))
            .merge(upload_routes(state))
            .layer(middleware::from_fn(log_request))
            .layer(cors)
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Serve until Ctrl-C
    pub async fn start(self) -> Result<(), io::Error> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?.to_string();
        log_event_with_fields(Event::ServerListening, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete);
        Ok(())
    }
}

async fn shutdown_signal() {
    // A failed signal install leaves the server running until killed
    if tokio::signal::ctrl_c().await.is_ok() {
        log_event(Event::ShutdownStart);
    } else {
        std::future::pending::<()>().await;
    }
}

/// One REQUEST_HANDLED line per request
async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let started = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    let elapsed = started.elapsed().as_millis().to_string();
    log_event_with_fields(
        Event::RequestHandled,
        &[
            ("elapsed_ms", elapsed.as_str()),
            ("method", method.as_str()),
            ("path", path.as_str()),
            ("status", status.as_str()),
        ],
    );
    response
}
