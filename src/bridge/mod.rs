//! Translation between framework messages and authorization server messages.
//!
//! [`MessageBridge`] holds no per-request state. Both operations take every
//! input as a parameter, so one bridge can be shared across threads.
//!
//! # Example
//!
//! ```rust,ignore
//! use oauth2_bridge::framework::{Environment, Request, Response};
//! use oauth2_bridge::MessageBridge;
//!
//! let bridge = MessageBridge::default();
//! let request = Request::from_environment(&Environment::mock([("REQUEST_METHOD", "POST")]), "")?;
//! let auth_request = bridge.translate_incoming_request(&request);
//!
//! let auth_response = server.handle_token_request(&auth_request);
//! let response = bridge.apply_authorization_response(&auth_response, Response::default())?;
//! ```

mod headers;

use std::io::{Seek, SeekFrom, Write};

use serde_json::Map;
use tracing::debug;

use crate::config::{BridgeConfig, CollisionPolicy};
use crate::core::Result;
use crate::framework::{FrameworkResponse, IncomingRequest};
use crate::oauth2::{self, AuthorizationResponse, RequestParts};

use headers::cleanup_headers;

/// Stateless adapter between the two message models.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MessageBridge {
    collision: CollisionPolicy,
}

impl MessageBridge {
    /// Create a bridge with the default collision policy.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a bridge from loaded configuration.
    pub fn from_config(config: &BridgeConfig) -> Self {
        Self {
            collision: config.collision_policy,
        }
    }

    /// Set the header collision policy.
    #[inline]
    pub fn with_collision_policy(mut self, policy: CollisionPolicy) -> Self {
        self.collision = policy;
        self
    }

    /// Get the header collision policy.
    #[inline]
    pub fn collision_policy(&self) -> CollisionPolicy {
        self.collision
    }

    /// Snapshot a framework request as an authorization request.
    ///
    /// An unparsed body becomes an empty parameter map and uploaded files are
    /// always empty. The raw body shares its buffer with the source request.
    pub fn translate_incoming_request<R>(&self, request: &R) -> oauth2::Request
    where
        R: IncomingRequest + ?Sized,
    {
        let parsed = request.parsed_body().cloned().unwrap_or_default();
        let headers = cleanup_headers(request.headers().iter(), self.collision);

        debug!(
            query = request.query_params().len(),
            body_params = parsed.len(),
            headers = headers.len(),
            content_length = request.body().len(),
            "translated incoming request"
        );

        oauth2::Request::from_parts(RequestParts {
            query: request.query_params().to_vec(),
            request: parsed,
            attributes: request.attributes().clone(),
            cookies: request.cookie_params().to_vec(),
            files: Map::new(),
            server: request.server_params().to_vec(),
            content: request.body().clone(),
            headers,
        })
    }

    /// Copy status, headers and body of an authorization response onto a
    /// framework response.
    ///
    /// The body is written at the stream's current position without
    /// truncating, then the stream is rewound to offset zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the body stream cannot be
    /// written or rewound.
    pub fn apply_authorization_response<A, R>(&self, auth: &A, response: R) -> Result<R>
    where
        A: AuthorizationResponse + ?Sized,
        R: FrameworkResponse,
    {
        let mut response = auth
            .http_headers()
            .iter()
            .fold(response, |res, (name, value)| res.with_header(name, value))
            .with_status(auth.status_code(), auth.status_text());

        let body = auth.response_body();
        let stream = response.body_mut();
        stream.write_all(body.as_bytes())?;
        stream.seek(SeekFrom::Start(0))?;

        debug!(
            status = auth.status_code().as_u16(),
            headers = auth.http_headers().len(),
            body_len = body.len(),
            "applied authorization response"
        );

        Ok(response)
    }
}

/// Translate a framework request with the default bridge.
#[inline]
pub fn translate_incoming_request<R>(request: &R) -> oauth2::Request
where
    R: IncomingRequest + ?Sized,
{
    MessageBridge::default().translate_incoming_request(request)
}

/// Apply an authorization response with the default bridge.
#[inline]
pub fn apply_authorization_response<A, R>(auth: &A, response: R) -> Result<R>
where
    A: AuthorizationResponse + ?Sized,
    R: FrameworkResponse,
{
    MessageBridge::default().apply_authorization_response(auth, response)
}
