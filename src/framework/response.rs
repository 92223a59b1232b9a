//! Framework response.

use std::io::{Seek, Write};

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue};
use http::StatusCode;

use super::{Body, FrameworkResponse, Headers};
use crate::core::{Error, Result};
use crate::types::{HeaderEntry, Scalar};

/// HTTP response as the web framework sees it.
///
/// Immutable-with-copy: `with_*` methods consume the response and return an
/// updated one. The body is a stream that can be written to in place.
#[derive(Debug)]
pub struct Response<B = Body> {
    status: StatusCode,
    reason_phrase: Option<String>,
    headers: Headers,
    body: B,
}

impl Response<Body> {
    /// Create a response with an empty in-memory body.
    #[inline]
    pub fn new(status: StatusCode) -> Self {
        Self::with_body_stream(status, Body::new())
    }
}

impl Default for Response<Body> {
    fn default() -> Self {
        Self::new(StatusCode::OK)
    }
}

impl<B> Response<B> {
    /// Create a response around an existing body stream.
    #[inline]
    pub fn with_body_stream(status: StatusCode, body: B) -> Self {
        Self {
            status,
            reason_phrase: None,
            headers: Headers::new(),
            body,
        }
    }

    // Getters

    /// Get the status code.
    #[inline]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the reason phrase: the one set explicitly, or the canonical one.
    #[inline]
    pub fn reason_phrase(&self) -> &str {
        self.reason_phrase
            .as_deref()
            .or_else(|| self.status.canonical_reason())
            .unwrap_or("")
    }

    /// Get the headers.
    #[inline]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Get all values of a header joined with a comma (empty if missing).
    #[inline]
    pub fn header_line(&self, name: &str) -> String {
        self.headers.get_line(name)
    }

    /// Get the body stream.
    #[inline]
    pub fn body(&self) -> &B {
        &self.body
    }

    /// Get a mutable reference to the body stream.
    #[inline]
    pub fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }

    /// Consume the response, returning the body stream.
    #[inline]
    pub fn into_body(self) -> B {
        self.body
    }

    // Modifiers

    /// Set the status code and an optional reason phrase.
    #[inline]
    pub fn with_status(mut self, status: StatusCode, reason: Option<&str>) -> Self {
        self.status = status;
        self.reason_phrase = reason.filter(|r| !r.is_empty()).map(str::to_string);
        self
    }

    /// Set a header, replacing any existing value.
    #[inline]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<HeaderEntry>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Append a value to a header.
    #[inline]
    pub fn with_added_header(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Remove a header.
    #[inline]
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }

    // Status checks

    /// Check if this is a successful response (2xx).
    #[inline]
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Check if this is an error response (4xx or 5xx).
    #[inline]
    pub fn is_error(&self) -> bool {
        self.status.is_client_error() || self.status.is_server_error()
    }
}

impl<B> FrameworkResponse for Response<B>
where
    B: Write + Seek,
{
    type Body = B;

    fn with_header(self, name: &str, value: &str) -> Self {
        Response::with_header(self, name, value)
    }

    fn with_status(self, status: StatusCode, reason: Option<&str>) -> Self {
        Response::with_status(self, status, reason)
    }

    fn body_mut(&mut self) -> &mut B {
        &mut self.body
    }
}

impl TryFrom<Response<Body>> for http::Response<Bytes> {
    type Error = Error;

    /// Convert using the full body buffer. Repeated values become repeated headers.
    fn try_from(res: Response<Body>) -> Result<Self> {
        let mut builder = http::Response::builder().status(res.status);

        if let Some(headers) = builder.headers_mut() {
            for (name, entry) in res.headers.iter() {
                let name = HeaderName::try_from(name)
                    .map_err(|e| Error::InvalidResponse(format!("header name '{}': {}", name, e)))?;
                for value in entry.values() {
                    let value = HeaderValue::try_from(value.to_string()).map_err(|e| {
                        Error::InvalidResponse(format!("header '{}' value: {}", name, e))
                    })?;
                    headers.append(name.clone(), value);
                }
            }
        }

        Ok(builder.body(res.body.to_bytes())?)
    }
}
