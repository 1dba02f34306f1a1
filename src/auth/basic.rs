//! Parsing of `Authorization: Basic` headers.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::auth::error::Error;
use crate::server::{HttpResponse, StatusCode};

/// Realm advertised in the `WWW-Authenticate` challenge.
pub const DEFAULT_REALM: &str = "Authentication Required";

/// A username/password pair decoded from a request.
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    pub username: String,
    pub password: String,
}

// Keep passwords out of logs
impl std::fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Decode the value of an `Authorization` header using the Basic scheme.
///
/// The scheme name is matched case-insensitively. The payload is split at the
/// first `:`, so passwords may themselves contain colons.
pub fn parse_basic_authorization(header: &str) -> Result<BasicCredentials, Error> {
    let (scheme, payload) = header
        .trim()
        .split_once(char::is_whitespace)
        .ok_or(Error::MalformedHeader)?;

    if !scheme.eq_ignore_ascii_case("Basic") {
        return Err(Error::UnsupportedScheme(scheme.to_string()));
    }

    let decoded = STANDARD.decode(payload.trim())?;
    let decoded = String::from_utf8(decoded).map_err(|_| Error::InvalidUtf8)?;

    let (username, password) = decoded.split_once(':').ok_or(Error::MissingSeparator)?;

    Ok(BasicCredentials {
        username: username.to_string(),
        password: password.to_string(),
    })
}

/// The challenge sent when a protected route is requested without valid
/// credentials.
pub fn unauthorized_response() -> HttpResponse {
    HttpResponse::html(StatusCode::Unauthorized, "Unauthorized Access")
        .with_header("WWW-Authenticate", format!("Basic realm=\"{DEFAULT_REALM}\""))
}
