//! HTTP Basic authentication.
//!
//! A request is authenticated by decoding its `Authorization: Basic` header
//! and checking the pair against a fixed, in-memory credential store. The
//! store is built once at start-up and never mutated.

mod basic;
mod credentials;
mod error;
mod tests;

// Re-export public items
pub use basic::{BasicCredentials, DEFAULT_REALM, parse_basic_authorization, unauthorized_response};
pub use credentials::{Credential, CredentialStore, Password, PasswordHash};
pub use error::Error;
