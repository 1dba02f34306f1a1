//! The user-credential record and the store that verifies against it.

use std::fmt;
use std::str::FromStr;

use sha2::{Digest, Sha256};

use crate::auth::basic::parse_basic_authorization;
use crate::auth::error::Error;
use crate::parser::HttpRequest;

const HASH_METHOD: &str = "sha256";

/// A salted SHA-256 password hash in the form `sha256$<salt>$<hex digest>`,
/// where the digest covers the salt followed by the password.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: String,
    digest: String,
}

impl PasswordHash {
    /// Hash `password` with the given salt.
    pub fn generate(password: &str, salt: &str) -> Self {
        Self {
            salt: salt.to_string(),
            digest: salted_digest(salt, password),
        }
    }

    /// Check a candidate password against this hash.
    pub fn verify(&self, password: &str) -> bool {
        salted_digest(&self.salt, password) == self.digest
    }
}

fn salted_digest(salt: &str, password: &str) -> String {
    Sha256::new()
        .chain_update(salt.as_bytes())
        .chain_update(password.as_bytes())
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

impl FromStr for PasswordHash {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, '$');
        let (Some(method), Some(salt), Some(digest)) = (parts.next(), parts.next(), parts.next()) else {
            return Err(Error::InvalidPasswordHash("expected sha256$<salt>$<digest>".to_string()));
        };

        if method != HASH_METHOD {
            return Err(Error::InvalidPasswordHash(format!("unsupported method {method}")));
        }
        if salt.is_empty() || salt.contains('$') {
            return Err(Error::InvalidPasswordHash("invalid salt".to_string()));
        }
        if digest.len() != 64 || !digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidPasswordHash("digest must be 64 hex characters".to_string()));
        }

        Ok(Self {
            salt: salt.to_string(),
            digest: digest.to_ascii_lowercase(),
        })
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{HASH_METHOD}${}${}", self.salt, self.digest)
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PasswordHash({HASH_METHOD})")
    }
}

/// How a credential's password is stored.
#[derive(Clone, PartialEq, Eq)]
pub enum Password {
    /// Compared by exact equality.
    Plain(String),
    /// Compared by hashing the candidate.
    Hashed(PasswordHash),
}

impl Password {
    pub fn matches(&self, candidate: &str) -> bool {
        match self {
            Password::Plain(expected) => expected == candidate,
            Password::Hashed(hash) => hash.verify(candidate),
        }
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Password::Plain(_) => write!(f, "Plain(***)"),
            Password::Hashed(hash) => write!(f, "Hashed({hash:?})"),
        }
    }
}

/// A user allowed through basic authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub username: String,
    pub password: Password,
}

impl Credential {
    /// A credential checked by plaintext equality.
    pub fn plain(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Password::Plain(password.into()),
        }
    }

    /// A credential checked against a password hash.
    pub fn hashed(username: impl Into<String>, hash: PasswordHash) -> Self {
        Self {
            username: username.into(),
            password: Password::Hashed(hash),
        }
    }
}

/// Immutable table of users accepted by protected routes.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    credentials: Vec<Credential>,
}

impl CredentialStore {
    /// Create a store holding the given credentials.
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    /// Create a store holding a single user.
    pub fn single(credential: Credential) -> Self {
        Self::new(vec![credential])
    }

    /// The users this store accepts.
    pub fn credentials(&self) -> &[Credential] {
        &self.credentials
    }

    /// Check a username/password pair.
    ///
    /// Returns the authenticated principal, which is the stored username.
    pub fn verify(&self, username: &str, password: &str) -> Option<&str> {
        self.credentials
            .iter()
            .find(|c| c.username == username)
            .filter(|c| c.password.matches(password))
            .map(|c| c.username.as_str())
    }

    /// Authenticate a request by its `Authorization` header.
    pub fn authenticate(&self, request: &HttpRequest) -> Result<&str, Error> {
        let header = request.authorization().ok_or(Error::MissingCredentials)?;
        let supplied = parse_basic_authorization(header)?;

        self.verify(&supplied.username, &supplied.password)
            .ok_or(Error::InvalidCredentials)
    }
}

impl Default for CredentialStore {
    /// The fixture's single hard-coded user.
    fn default() -> Self {
        Self::single(Credential::plain("aladdin", "opensesame"))
    }
}
