//! oauth2_bridge - Glue between a web framework's HTTP messages and an OAuth2
//! authorization server's request/response types.
//!
//! The authorization server never sees framework types directly. A
//! [`MessageBridge`] snapshots an incoming framework request into an
//! [`oauth2::Request`] and writes an authorization response back onto a
//! framework response.
//!
//! # Features
//!
//! - **Header normalization**: credential headers renamed to `PHP_AUTH_USER`,
//!   `PHP_AUTH_PW`, `PHP_AUTH_DIGEST` and `AUTH_TYPE`; list values reduced
//!   to one scalar
//! - **Framework messages**: request built from a server environment or an
//!   `http::Request`, with query, cookie and body parsing
//! - **Response mapping**: status, headers and body copied onto any
//!   writable, seekable body stream
//! - **Structured logging**: JSON lines via tracing
//!
//! # Example
//!
//! ```rust,ignore
//! use oauth2_bridge::framework::{Environment, Request, Response};
//! use oauth2_bridge::{Config, MessageBridge};
//!
//! let config = Config::from_env()?;
//! oauth2_bridge::logging::init(&config.logging)?;
//! let bridge = MessageBridge::from_config(&config.bridge);
//!
//! let env = Environment::mock([
//!     ("REQUEST_METHOD", "POST"),
//!     ("CONTENT_TYPE", "application/x-www-form-urlencoded"),
//! ]);
//! let request = Request::from_environment(&env, "grant_type=client_credentials")?;
//! let auth_request = bridge.translate_incoming_request(&request);
//!
//! let auth_response = server.handle_token_request(&auth_request);
//! let response = bridge.apply_authorization_response(&auth_response, Response::default())?;
//! ```

/// Package version from Cargo.toml
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git commit hash (8 chars) with optional "-dirty" suffix
pub const BUILD_VERSION: &str = env!("BUILD_VERSION");

/// Full version string: "0.1.0 (abc12345)" or "0.1.0 (abc12345-dirty)"
pub const VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_VERSION"), ")");

pub mod bridge;
pub mod config;
pub mod core;
pub mod framework;
pub mod logging;
pub mod oauth2;
pub mod types;

// Re-exports for convenience
pub use bridge::{apply_authorization_response, translate_incoming_request, MessageBridge};
pub use config::{CollisionPolicy, Config};
pub use crate::core::{Error, Result};
pub use framework::{FrameworkResponse, IncomingRequest};
pub use oauth2::AuthorizationResponse;
pub use types::{HeaderEntry, Scalar};
