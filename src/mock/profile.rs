//! Which variant of the fixture is served.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

use crate::server::Error;

/// The route table a [`MockServer`](crate::mock::MockServer) registers.
///
/// Names are case-insensitive wherever they are read: JSON config,
/// `MOCKHTTP_PROFILE` and [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Profile {
    /// `GET /`, `GET /slow`, `POST /`.
    Client,
    /// `GET /`, `GET /secured`, `POST /`, `POST /slow`.
    Secured,
    /// `GET /` and `POST /` answering with the method name; logs what it got.
    Echo,
    /// Everything in `Client` and `Secured`, plus `GET /auth`.
    #[default]
    Full,
}

impl Profile {
    pub fn serves_slow_get(&self) -> bool {
        matches!(self, Profile::Client | Profile::Full)
    }

    pub fn serves_slow_post(&self) -> bool {
        matches!(self, Profile::Secured | Profile::Full)
    }

    /// Paths that require basic authentication.
    pub fn secured_paths(&self) -> &'static [&'static str] {
        match self {
            Profile::Secured => &["/secured"],
            Profile::Full => &["/secured", "/auth"],
            Profile::Client | Profile::Echo => &[],
        }
    }
}

impl FromStr for Profile {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "client" => Ok(Profile::Client),
            "secured" => Ok(Profile::Secured),
            "echo" => Ok(Profile::Echo),
            "full" => Ok(Profile::Full),
            _ => Err(Error::ConfigError(format!("unknown profile: {s}"))),
        }
    }
}

impl<'de> Deserialize<'de> for Profile {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Profile::Client => "client",
            Profile::Secured => "secured",
            Profile::Echo => "echo",
            Profile::Full => "full",
        };
        f.write_str(name)
    }
}
