//! The greeting routes served to HTTP clients under test.
//!
//! A [`MockServer`] wraps an [`HttpServer`](crate::server::HttpServer) whose
//! route table is chosen by a [`Profile`]. Every route answers with a canned
//! `text/html` greeting; `/slow` routes wait first, and protected routes
//! require HTTP Basic credentials.

mod config;
mod greeting;
mod profile;
mod routes;

// Re-export public items
pub use config::{MockConfig, UserConfig, ENV_ADDR, ENV_CONFIG, ENV_PROFILE};
pub use greeting::{capitalize, greet, MISSING_FIELD};
pub use profile::Profile;
pub use routes::MockServer;
