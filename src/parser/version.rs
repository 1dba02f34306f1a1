//! Protocol versions on the request line.

use std::fmt;
use std::str::FromStr;

use crate::parser::error::Error;

/// Versions a client under test may put on the request line. Responses are
/// always written as `HTTP/1.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpVersion {
    Http10,
    /// Requires a `Host` header.
    Http11,
    Http20,
}

impl HttpVersion {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpVersion::Http10 => "HTTP/1.0",
            HttpVersion::Http11 => "HTTP/1.1",
            HttpVersion::Http20 => "HTTP/2",
        }
    }

    pub fn requires_host(self) -> bool {
        self == HttpVersion::Http11
    }
}

impl FromStr for HttpVersion {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let version = match token {
            "HTTP/1.0" => HttpVersion::Http10,
            "HTTP/1.1" => HttpVersion::Http11,
            // Both spellings are seen in the wild
            "HTTP/2" | "HTTP/2.0" => HttpVersion::Http20,
            other => return Err(Error::InvalidVersion(other.to_string())),
        };
        Ok(version)
    }
}

impl fmt::Display for HttpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
