//! Errors raised while loading bridge and logging settings from the environment.

use std::fmt;

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// Variable is set but its value does not parse (e.g. `HEADER_COLLISION=sometimes`).
    Parse {
        key: String,
        value: String,
        error: String,
    },
    /// Variable parses but is rejected (e.g. a blank `SERVICE_NAME`).
    Invalid { key: String, message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse { key, value, error } => {
                write!(f, "{}={:?} is not a valid setting: {}", key, value, error)
            }
            ConfigError::Invalid { key, message } => {
                write!(f, "{} rejected: {}", key, message)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
