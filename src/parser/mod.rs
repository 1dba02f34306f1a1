//! HTTP parser module.
//!
//! Parses HTTP/1.x requests, including the body and the
//! `application/x-www-form-urlencoded` fields the mock routes read.

mod request;
mod method;
mod version;
mod error;
mod form;

// Re-export public items
pub use request::HttpRequest;
pub use method::Method;
pub use version::HttpVersion;
pub use error::Error;
pub use form::{parse_form, percent_decode};

// Re-export the parsing entry points
pub use request::{find_head_end, parse_request};
