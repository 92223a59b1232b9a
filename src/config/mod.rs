//! Configuration module for oauth2_bridge.
//!
//! Configuration is loaded from environment variables.
//!
//! # Example
//!
//! ```rust,ignore
//! use oauth2_bridge::config::Config;
//! use oauth2_bridge::MessageBridge;
//!
//! let config = Config::from_env()?;
//! oauth2_bridge::logging::init(&config.logging)?;
//! let bridge = MessageBridge::from_config(&config.bridge);
//! ```

mod bridge;
mod error;
mod logging;
mod parse;

pub use bridge::{BridgeConfig, CollisionPolicy};
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

/// Complete application configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Bridge configuration.
    pub bridge: BridgeConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            bridge: BridgeConfig::from_env()?,
            logging: LoggingConfig::from_env()?,
        })
    }

    /// Print configuration summary to log.
    pub fn log_summary(&self) {
        use tracing::info;

        info!("Configuration loaded:");
        info!("  Header collision: {}", self.bridge.collision_policy);
        info!("  Log filter: {}", self.logging.filter);
        info!("  Log format: {}", self.logging.format);
        info!("  Service: {}", self.logging.service_name);
    }
}

/// Serializes tests that touch process environment variables.
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};

    static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    LOCK.get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|e| e.into_inner())
}
