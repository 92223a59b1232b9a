//! Web framework message types.
//!
//! The bridge consumes requests through [`IncomingRequest`] and writes
//! responses through [`FrameworkResponse`]. This module also provides a
//! concrete implementation of both:
//!
//! - [`Request`] - built from an [`Environment`] or an `http::Request`
//! - [`Response`] - immutable-with-copy response over a body stream
//! - [`Headers`] - ordered, case-insensitive header collection
//! - [`Body`] - in-memory writable and seekable body stream
//!
//! # Example
//!
//! ```rust,ignore
//! use oauth2_bridge::framework::{Environment, Request};
//!
//! let env = Environment::mock([
//!     ("REQUEST_METHOD", "POST"),
//!     ("CONTENT_TYPE", "application/x-www-form-urlencoded"),
//! ]);
//! let req = Request::from_environment(&env, "grant_type=client_credentials")?;
//! assert_eq!(req.parsed_body_param("grant_type"), Some(&"client_credentials".into()));
//! ```

mod body;
mod environment;
mod headers;
pub mod parser;
mod request;
mod response;

use std::io::{Seek, Write};

use bytes::Bytes;
use http::StatusCode;
use serde_json::{Map, Value};

use crate::types::Scalar;

pub use body::Body;
pub use environment::{keys, Environment};
pub use headers::{camel_case, Headers};
pub use request::Request;
pub use response::Response;

/// Read access to a framework request.
pub trait IncomingRequest {
    /// Query parameters in order; duplicates allowed.
    fn query_params(&self) -> &[(String, String)];

    /// Parsed body, or `None` when the body was not parsed or is absent.
    fn parsed_body(&self) -> Option<&Map<String, Value>>;

    /// Request attributes.
    fn attributes(&self) -> &Map<String, Value>;

    /// Cookies in order.
    fn cookie_params(&self) -> &[(String, String)];

    /// Server/environment parameters.
    fn server_params(&self) -> &[(String, Scalar)];

    /// Headers in the framework's casing.
    fn headers(&self) -> &Headers;

    /// Raw body.
    fn body(&self) -> &Bytes;
}

/// Write access to a framework response.
///
/// Setters consume the response and return the updated one, so both
/// copy-on-write and in-place implementations fit.
pub trait FrameworkResponse: Sized {
    /// Body stream type.
    type Body: Write + Seek;

    /// Set a header, overwriting any previous value for the key.
    fn with_header(self, name: &str, value: &str) -> Self;

    /// Set the status code and reason phrase.
    fn with_status(self, status: StatusCode, reason: Option<&str>) -> Self;

    /// Get the body stream.
    fn body_mut(&mut self) -> &mut Self::Body;
}
