//! Async HTTP server with an explicit route table.
//!
//! Each connection carries one request and is closed after the response.
//! Connections are capped by a semaphore and answered with a 503 beyond it.

mod response;
mod config;
mod error;
mod handler;
mod http_server;

// Re-export public items
pub use response::{HttpResponse, StatusCode};
pub use config::ServerConfig;
pub use error::Error;
pub use http_server::HttpServer;
