//! Mock server configuration.
//!
//! Defaults reproduce the fixture exactly. A JSON file and a few environment
//! variables can override them:
//!
//! ```json
//! {
//!   "server": { "addr": "127.0.0.1:5000" },
//!   "profile": "secured",
//!   "slow_delay_ms": 1000,
//!   "user": { "username": "aladdin", "password": "opensesame" }
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use log::debug;
use serde::Deserialize;

use crate::auth::{Credential, CredentialStore, PasswordHash};
use crate::mock::profile::Profile;
use crate::server::{Error, ServerConfig};

/// Path to a JSON configuration file.
pub const ENV_CONFIG: &str = "MOCKHTTP_CONFIG";
/// Bind address, overriding the file.
pub const ENV_ADDR: &str = "MOCKHTTP_ADDR";
/// Profile name, overriding the file.
pub const ENV_PROFILE: &str = "MOCKHTTP_PROFILE";

/// The user accepted by protected routes.
///
/// Exactly one of `password` and `password_hash` must be set.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    pub username: String,
    pub password: Option<String>,
    /// A `sha256$<salt>$<hex digest>` hash.
    pub password_hash: Option<String>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            username: "aladdin".to_string(),
            password: Some("opensesame".to_string()),
            password_hash: None,
        }
    }
}

impl UserConfig {
    /// Build the credential record this user describes.
    pub fn credential(&self) -> Result<Credential, Error> {
        if self.username.is_empty() {
            return Err(Error::ConfigError("user.username must not be empty".to_string()));
        }

        match (&self.password, &self.password_hash) {
            (Some(password), None) => Ok(Credential::plain(self.username.clone(), password.clone())),
            (None, Some(hash)) => {
                let hash: PasswordHash = hash
                    .parse()
                    .map_err(|e| Error::ConfigError(format!("user.password_hash: {e}")))?;
                Ok(Credential::hashed(self.username.clone(), hash))
            }
            (Some(_), Some(_)) => Err(Error::ConfigError(
                "set either user.password or user.password_hash, not both".to_string(),
            )),
            (None, None) => Err(Error::ConfigError(
                "user needs a password or password_hash".to_string(),
            )),
        }
    }
}

/// Everything needed to run a mock server.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct MockConfig {
    pub server: ServerConfig,
    pub profile: Profile,
    /// How long `/slow` routes wait before answering.
    pub slow_delay_ms: u64,
    pub user: UserConfig,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            profile: Profile::default(),
            slow_delay_ms: 1000,
            user: UserConfig::default(),
        }
    }
}

impl MockConfig {
    pub fn slow_delay(&self) -> Duration {
        Duration::from_millis(self.slow_delay_ms)
    }

    /// The credential store protected routes check against.
    pub fn credential_store(&self) -> Result<CredentialStore, Error> {
        Ok(CredentialStore::single(self.user.credential()?))
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, Error> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Load the configuration from the process environment.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration using `lookup` to read variables.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let mut config = match lookup(ENV_CONFIG) {
            Some(path) => Self::from_json_file(path)?,
            None => Self::default(),
        };

        if let Some(addr) = lookup(ENV_ADDR) {
            config.server.addr = addr
                .parse()
                .map_err(|_| Error::ConfigError(format!("{ENV_ADDR}: invalid address {addr}")))?;
        }

        if let Some(profile) = lookup(ENV_PROFILE) {
            config.profile = profile.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the server cannot run with.
    pub fn validate(&self) -> Result<(), Error> {
        if self.server.max_connections == 0 {
            return Err(Error::ConfigError("server.max_connections must be positive".to_string()));
        }
        if self.server.read_buffer_size == 0 {
            return Err(Error::ConfigError("server.read_buffer_size must be positive".to_string()));
        }
        self.user.credential().map(|_| ())
    }
}
