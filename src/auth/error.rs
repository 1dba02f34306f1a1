//! Error types for basic authentication.

use thiserror::Error;

/// Errors that can occur while authenticating a request.
#[derive(Debug, Error)]
pub enum Error {
    /// The request carried no `Authorization` header.
    #[error("Missing Authorization header")]
    MissingCredentials,

    /// The header is not `<scheme> <payload>`.
    #[error("Malformed Authorization header")]
    MalformedHeader,

    /// The header uses a scheme other than Basic.
    #[error("Unsupported authorization scheme: {0}")]
    UnsupportedScheme(String),

    /// The Basic payload is not valid base64.
    #[error("Invalid base64 payload: {0}")]
    InvalidEncoding(#[from] base64::DecodeError),

    /// The decoded payload is not UTF-8.
    #[error("Credentials are not valid UTF-8")]
    InvalidUtf8,

    /// The decoded payload has no `:` between username and password.
    #[error("Credentials are missing the ':' separator")]
    MissingSeparator,

    /// The username/password pair did not match.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// A stored password hash could not be parsed.
    #[error("Invalid password hash: {0}")]
    InvalidPasswordHash(String),
}
