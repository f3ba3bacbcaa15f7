//! # HTTP Server Module
//!
//! Exposes the table file as a JSON API.
//!
//! # Endpoints
//!
//! - `GET /api` - every row
//! - `POST /api` - append a row with a synthetic key
//! - `PUT /api` - update by `bookno`, or append when absent
//! - `DELETE /api` - delete by `bookno`
//! - `POST /upload` - replace the table file (multipart field `file`)
//! - `GET /` - documentation page
//! - `GET /health` - health check

pub mod config;
pub mod docs_routes;
pub mod errors;
pub mod request;
pub mod response;
pub mod server;
pub mod table_routes;
pub mod upload_routes;

pub use config::HttpServerConfig;
pub use errors::{ApiError, ApiResult};
pub use server::HttpServer;
pub use table_routes::TableState;
