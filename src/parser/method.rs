//! Request methods.
//!
//! The mock routes only answer `GET` and `POST`, but every method a client
//! library might send has to parse so that an unserved one gets a 405 with an
//! `Allow` header rather than a 400.

use std::fmt;
use std::str::FromStr;

use crate::parser::error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    GET,
    POST,
    PUT,
    DELETE,
    /// Served by the `GET` handler of the same path, without the body.
    HEAD,
    /// Answered from the route table with an `Allow` header.
    OPTIONS,
    PATCH,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::HEAD,
        Method::OPTIONS,
        Method::PATCH,
    ];

    /// The token as it appears on the request line.
    pub fn as_str(self) -> &'static str {
        match self {
            Method::GET => "GET",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::DELETE => "DELETE",
            Method::HEAD => "HEAD",
            Method::OPTIONS => "OPTIONS",
            Method::PATCH => "PATCH",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    /// Method tokens are case-sensitive.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        Method::ALL
            .into_iter()
            .find(|method| method.as_str() == token)
            .ok_or_else(|| Error::InvalidMethod(token.to_string()))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
