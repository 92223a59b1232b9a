//! Bridge configuration.

use std::fmt;
use std::str::FromStr;

use super::parse::env_parse;
use super::ConfigError;

/// What to do when two request headers normalize to the same key.
///
/// This happens when a request carries both a renamed header such as
/// `Php-Auth-User` and the literal target key `PHP_AUTH_USER`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum CollisionPolicy {
    /// The later header overwrites the earlier value; the key keeps its first position.
    #[default]
    LastWins,
    /// The earlier value is kept; later headers are dropped.
    FirstWins,
}

impl FromStr for CollisionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "last" | "last-wins" | "last_wins" => Ok(CollisionPolicy::LastWins),
            "first" | "first-wins" | "first_wins" => Ok(CollisionPolicy::FirstWins),
            other => Err(format!("expected 'last' or 'first', got '{}'", other)),
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionPolicy::LastWins => f.write_str("last"),
            CollisionPolicy::FirstWins => f.write_str("first"),
        }
    }
}

/// Bridge configuration loaded from environment.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Header key collision handling (HEADER_COLLISION).
    pub collision_policy: CollisionPolicy,
}

impl BridgeConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            collision_policy: env_parse("HEADER_COLLISION", CollisionPolicy::default())?,
        })
    }
}
