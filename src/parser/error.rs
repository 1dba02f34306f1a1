//! Why a request could not be parsed. Every variant is answered with a 400.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown method {0:?}")]
    InvalidMethod(String),

    /// The target does not start with `/`.
    #[error("request target must be an absolute path")]
    InvalidPath,

    /// Not `METHOD SP PATH SP VERSION`, or not UTF-8.
    #[error("malformed request line: {0}")]
    MalformedRequestLine(String),

    #[error("unsupported protocol version {0:?}")]
    InvalidVersion(String),

    #[error("missing {0} header")]
    MissingHeader(String),

    /// A header line without a colon.
    #[error("header line is not `Name: value`")]
    InvalidHeaderFormat,

    #[error("no request line")]
    EmptyRequest,

    #[error("Content-Length {0:?} is not a byte count")]
    InvalidContentLength(String),
}
