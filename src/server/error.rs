//! Server and configuration errors.

use thiserror::Error;

use crate::parser::{Error as ParserError, Method};

#[derive(Debug, Error)]
pub enum Error {
    /// Answered with 400.
    #[error("bad request: {0}")]
    ParseError(#[from] ParserError),

    /// Socket or config-file I/O. On a connection this is usually a client
    /// hanging up early.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Answered with 404.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Answered with 405.
    #[error("Method {0} not allowed for path: {1}")]
    MethodNotAllowed(Method, String),

    /// Answered with 413; carries the configured limit.
    #[error("Request exceeds {0} bytes")]
    PayloadTooLarge(usize),

    /// A handler failed; answered with 500.
    #[error("Internal server error: {0}")]
    InternalError(String),

    #[error("invalid configuration: {0}")]
    ConfigError(String),

    /// The config file is not valid JSON for [`MockConfig`](crate::MockConfig).
    #[error("config file: {0}")]
    JsonError(#[from] serde_json::Error),
}
