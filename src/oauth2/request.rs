//! Authorization server request.

use bytes::buf::Reader;
use bytes::{Buf, Bytes};
use serde_json::{Map, Value};

use crate::types::{lookup, ParamList, Scalar, ServerParams};

/// Fields of an authorization request.
///
/// This is a Parameter Object that consolidates the request parts into a
/// single struct, reducing constructor argument count.
#[derive(Debug, Clone, Default)]
pub struct RequestParts {
    /// Query parameters ($_GET)
    pub query: ParamList,
    /// Body parameters ($_POST)
    pub request: Map<String, Value>,
    /// Request attributes
    pub attributes: Map<String, Value>,
    /// Cookies ($_COOKIE)
    pub cookies: ParamList,
    /// Uploaded files ($_FILES)
    pub files: Map<String, Value>,
    /// Server variables ($_SERVER)
    pub server: ServerParams,
    /// Raw body
    pub content: Bytes,
    /// Single-valued headers
    pub headers: Vec<(String, Scalar)>,
}

/// Request as the authorization server consumes it.
///
/// Every lookup returns a single value or `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Request {
    query: ParamList,
    request: Map<String, Value>,
    attributes: Map<String, Value>,
    cookies: ParamList,
    files: Map<String, Value>,
    server: ServerParams,
    content: Bytes,
    headers: Vec<(String, Scalar)>,
}

impl Request {
    /// Create a request from its parts.
    pub fn from_parts(parts: RequestParts) -> Self {
        Self {
            query: parts.query,
            request: parts.request,
            attributes: parts.attributes,
            cookies: parts.cookies,
            files: parts.files,
            server: parts.server,
            content: parts.content,
            headers: parts.headers,
        }
    }

    /// Get a query parameter.
    #[inline]
    pub fn query(&self, name: &str) -> Option<&str> {
        lookup(&self.query, name).map(String::as_str)
    }

    /// Get a body parameter.
    #[inline]
    pub fn request(&self, name: &str) -> Option<&Value> {
        self.request.get(name)
    }

    /// Get a request attribute.
    #[inline]
    pub fn attributes(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Get a cookie.
    #[inline]
    pub fn cookies(&self, name: &str) -> Option<&str> {
        lookup(&self.cookies, name).map(String::as_str)
    }

    /// Get an uploaded file entry.
    #[inline]
    pub fn files(&self, name: &str) -> Option<&Value> {
        self.files.get(name)
    }

    /// Get a server variable.
    #[inline]
    pub fn server(&self, name: &str) -> Option<&Scalar> {
        lookup(&self.server, name)
    }

    /// Get a header, ignoring ASCII case. The last matching key wins.
    ///
    /// `_` and `-` are distinct: `Content_Length` does not find `Content-Length`.
    #[inline]
    pub fn headers(&self, name: &str) -> Option<&Scalar> {
        self.headers
            .iter()
            .rev()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v)
    }

    /// Get the request method from `REQUEST_METHOD`.
    #[inline]
    pub fn method(&self) -> Option<&str> {
        self.server("REQUEST_METHOD").and_then(Scalar::as_str)
    }

    /// Get the raw body.
    #[inline]
    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// Get a reader over the raw body.
    #[inline]
    pub fn content_reader(&self) -> Reader<Bytes> {
        self.content.clone().reader()
    }

    /// All query parameters.
    #[inline]
    pub fn query_params(&self) -> &[(String, String)] {
        &self.query
    }

    /// All body parameters.
    #[inline]
    pub fn request_params(&self) -> &Map<String, Value> {
        &self.request
    }

    /// All headers in order.
    #[inline]
    pub fn header_map(&self) -> &[(String, Scalar)] {
        &self.headers
    }

    /// All server variables in order.
    #[inline]
    pub fn server_params(&self) -> &[(String, Scalar)] {
        &self.server
    }
}
