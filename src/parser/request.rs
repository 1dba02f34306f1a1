//! Parsed requests and the head/body split.

use std::collections::HashMap;

use crate::parser::error::Error;
use crate::parser::form::parse_form;
use crate::parser::method::Method;
use crate::parser::version::HttpVersion;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// One request as read off a connection.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    /// The request target, including any query string.
    pub path: String,
    pub version: HttpVersion,
    /// Header names keep the client's spelling; look them up with
    /// [`HttpRequest::get_header`].
    pub headers: HashMap<String, String>,
    /// At most `Content-Length` bytes.
    pub body: Vec<u8>,
}

impl HttpRequest {
    /// A request with an empty body.
    pub fn new(method: Method, path: String, version: HttpVersion, headers: HashMap<String, String>) -> Self {
        Self {
            method,
            path,
            version,
            headers,
            body: Vec::new(),
        }
    }

    /// The path routes are matched on: the target without its query string.
    pub fn route_path(&self) -> &str {
        self.path
            .split_once('?')
            .map_or(self.path.as_str(), |(path, _)| path)
    }

    /// Case-insensitive header lookup.
    pub fn get_header(&self, name: &str) -> Option<&String> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    pub fn has_header(&self, name: &str) -> bool {
        self.get_header(name).is_some()
    }

    /// The raw `Authorization` header, if the client sent one.
    pub fn authorization(&self) -> Option<&str> {
        self.get_header("Authorization").map(String::as_str)
    }

    /// Whether the body is declared as `application/x-www-form-urlencoded`.
    pub fn is_form(&self) -> bool {
        self.get_header("Content-Type").is_some_and(|ct| {
            ct.split(';')
                .next()
                .is_some_and(|mime| mime.trim().eq_ignore_ascii_case(FORM_CONTENT_TYPE))
        })
    }

    /// The decoded form fields.
    ///
    /// Empty unless [`is_form`](Self::is_form) holds: a body sent with any
    /// other content type, or none, carries no form fields.
    pub fn form(&self) -> HashMap<String, String> {
        if !self.is_form() {
            return HashMap::new();
        }
        parse_form(&String::from_utf8_lossy(&self.body))
    }

    /// A single decoded form field.
    pub fn form_field(&self, name: &str) -> Option<String> {
        self.form().remove(name)
    }

    /// The declared body length, if any.
    pub fn content_length(&self) -> Result<Option<usize>, Error> {
        self.get_header("Content-Length")
            .map(|value| parse_content_length(value))
            .transpose()
    }
}

fn parse_content_length(value: &str) -> Result<usize, Error> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|_| Error::InvalidContentLength(value.to_string()))
}

/// Locate the end of the request head.
///
/// Returns the offset of the first body byte, or `None` if the blank line
/// terminating the headers has not been received yet.
pub fn find_head_end(input: &[u8]) -> Option<usize> {
    let crlf = input
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .map(|pos| pos + 4);
    let lf = input
        .windows(2)
        .position(|w| w == b"\n\n")
        .map(|pos| pos + 2);

    match (crlf, lf) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    }
}

/// Parse a buffered request.
///
/// Bytes after the blank line are the body, truncated to `Content-Length`
/// when the header is present. An `HTTP/1.1` request without `Host` is
/// rejected.
pub fn parse_request(input: &[u8]) -> Result<HttpRequest, Error> {
    let (head, rest) = match find_head_end(input) {
        Some(end) => input.split_at(end),
        None => (input, &[][..]),
    };

    let head = std::str::from_utf8(head)
        .map_err(|_| Error::MalformedRequestLine("Invalid UTF-8".to_string()))?;
    let mut lines = head.lines();

    let request_line = lines
        .next()
        .filter(|line| !line.trim().is_empty())
        .ok_or(Error::EmptyRequest)?;

    let [method, path, version] = request_line.split_whitespace().collect::<Vec<_>>()[..] else {
        return Err(Error::MalformedRequestLine(request_line.to_string()));
    };

    let method: Method = method.parse()?;
    if !path.starts_with('/') {
        return Err(Error::InvalidPath);
    }
    let version: HttpVersion = version.parse()?;

    let mut headers = HashMap::new();
    for line in lines.take_while(|line| !line.is_empty()) {
        let (name, value) = line.split_once(':').ok_or(Error::InvalidHeaderFormat)?;
        headers.insert(name.trim().to_string(), value.trim().to_string());
    }

    let mut request = HttpRequest::new(method, path.to_string(), version, headers);
    if request.version.requires_host() && !request.has_header("Host") {
        return Err(Error::MissingHeader("Host".to_string()));
    }

    let body_len = match request.content_length()? {
        Some(len) => len.min(rest.len()),
        None => rest.len(),
    };
    request.body = rest[..body_len].to_vec();

    Ok(request)
}
