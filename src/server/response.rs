//! Responses in the shape the fixture's clients expect.
//!
//! Every response carries the development-server header set: `Server`,
//! `Date`, `Content-Type`, `Content-Length` and `Connection: close`. Reason
//! phrases are upper-case (`401 UNAUTHORIZED`).

use std::collections::HashMap;

use chrono::{DateTime, Utc};

/// Content type of every greeting and error page.
pub const DEFAULT_CONTENT_TYPE: &str = "text/html; charset=utf-8";

/// Value of the `Server` header.
pub const SERVER_NAME: &str = "mockhttp-rs";

/// The status codes the mock can answer with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok = 200,
    BadRequest = 400,
    Unauthorized = 401,
    NotFound = 404,
    MethodNotAllowed = 405,
    PayloadTooLarge = 413,
    InternalServerError = 500,
    ServiceUnavailable = 503,
}

impl StatusCode {
    pub fn as_u16(self) -> u16 {
        self as u16
    }

    /// Upper-case reason phrase, as the development server writes it.
    pub fn reason_phrase(self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "BAD REQUEST",
            StatusCode::Unauthorized => "UNAUTHORIZED",
            StatusCode::NotFound => "NOT FOUND",
            StatusCode::MethodNotAllowed => "METHOD NOT ALLOWED",
            StatusCode::PayloadTooLarge => "PAYLOAD TOO LARGE",
            StatusCode::InternalServerError => "INTERNAL SERVER ERROR",
            StatusCode::ServiceUnavailable => "SERVICE UNAVAILABLE",
        }
    }
}

/// Format a timestamp as an IMF-fixdate, e.g. `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn http_date(at: DateTime<Utc>) -> String {
    at.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// An HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// An empty response with the standard headers and `Content-Length: 0`.
    pub fn new(status: StatusCode) -> Self {
        let headers = HashMap::from([
            ("Server".to_string(), SERVER_NAME.to_string()),
            ("Date".to_string(), http_date(Utc::now())),
            ("Content-Type".to_string(), DEFAULT_CONTENT_TYPE.to_string()),
            ("Content-Length".to_string(), "0".to_string()),
            // One request per connection
            ("Connection".to_string(), "close".to_string()),
        ]);

        Self {
            status,
            headers,
            body: Vec::new(),
        }
    }

    /// A response whose body is `body`.
    pub fn html(status: StatusCode, body: impl Into<String>) -> Self {
        Self::new(status).with_body_string(body)
    }

    /// Replace the body and update `Content-Length`.
    pub fn with_body_string(mut self, body: impl Into<String>) -> Self {
        self.body = body.into().into_bytes();
        let content_length = self.body.len().to_string();
        self.with_header("Content-Length", content_length)
    }

    /// Add or replace a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Drop the body but keep its `Content-Length`, as a HEAD response does.
    pub fn without_body(mut self) -> Self {
        self.body.clear();
        self
    }

    /// Get a header value, ignoring case.
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The body as text, for logging and assertions.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Serialize status line, headers and body.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut head = format!(
            "HTTP/1.1 {code} {reason}\r\n",
            code = self.status.as_u16(),
            reason = self.status.reason_phrase()
        );
        for (name, value) in &self.headers {
            head.push_str(&format!("{name}: {value}\r\n"));
        }
        head.push_str("\r\n");

        let mut bytes = head.into_bytes();
        bytes.extend_from_slice(&self.body);
        bytes
    }
}
