//! Framework request.

use std::net::SocketAddr;

use bytes::Bytes;
use http::{Method, Uri};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde_json::{Map, Value};

use super::environment::keys;
use super::parser::{parse_body, parse_cookies, parse_query_string};
use super::{Environment, Headers, IncomingRequest};
use crate::core::{Error, Result};
use crate::types::{lookup, HeaderEntry, ParamList, Scalar, ServerParams};

/// Bytes a raw CGI path or query may carry that `Uri` rejects. `%` is kept
/// so existing escapes survive.
const URI_UNSAFE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'[')
    .add(b'\\')
    .add(b']')
    .add(b'^')
    .add(b'`')
    .add(b'{')
    .add(b'|')
    .add(b'}');

/// Auth variables surfaced as headers for requests built from `http`.
const AUTH_VARS: [&str; 4] = [
    keys::PHP_AUTH_USER,
    keys::PHP_AUTH_PW,
    keys::PHP_AUTH_DIGEST,
    keys::AUTH_TYPE,
];

/// HTTP request as the web framework sees it.
///
/// Copy-on-write: `with_*` methods consume the request and return an updated one.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: Headers,
    query_params: ParamList,
    parsed_body: Option<Map<String, Value>>,
    attributes: Map<String, Value>,
    cookies: ParamList,
    server_params: ServerParams,
    body: Bytes,
}

impl Request {
    /// Build a request from a server environment and a raw body.
    ///
    /// Query parameters come from `QUERY_STRING`, cookies from `HTTP_COOKIE`,
    /// the parsed body from `CONTENT_TYPE` and the raw body.
    pub fn from_environment(env: &Environment, body: impl Into<Bytes>) -> Result<Self> {
        let headers = Headers::from_environment(env);
        Self::from_parts(env, headers, body.into())
    }

    /// Build a request from an `http` request and the peer address.
    pub fn from_http<B>(req: http::Request<B>, remote_addr: Option<SocketAddr>) -> Result<Self>
    where
        B: Into<Bytes>,
    {
        let env = Environment::from_http(&req, remote_addr);

        let mut headers = Headers::from_header_map(req.headers());
        for key in AUTH_VARS {
            if let Some(value) = env.get(key) {
                headers.set(super::camel_case(key), HeaderEntry::List(vec![value.clone()]));
            }
        }

        Self::from_parts(&env, headers, req.into_body().into())
    }

    fn from_parts(env: &Environment, headers: Headers, body: Bytes) -> Result<Self> {
        let method_str = env
            .get_string(keys::REQUEST_METHOD)
            .unwrap_or_else(|| "GET".to_string());
        let method = Method::from_bytes(method_str.as_bytes())
            .map_err(|_| Error::InvalidRequest(format!("invalid method '{}'", method_str)))?;

        let uri = build_uri(env)?;
        let query_params = env
            .get_string(keys::QUERY_STRING)
            .map(|q| parse_query_string(&q))
            .unwrap_or_default();
        let cookies = headers
            .get("Cookie")
            .map(HeaderEntry::line)
            .or_else(|| env.get_string(keys::HTTP_COOKIE))
            .map(|c| parse_cookies(&c))
            .unwrap_or_default();

        let content_type = headers.get("Content-Type").map(HeaderEntry::line);
        let parsed_body = parse_body(content_type.as_deref(), &body);

        tracing::trace!(
            method = %method,
            uri = %uri,
            headers = headers.len(),
            body_bytes = body.len(),
            parsed = parsed_body.is_some(),
            "framework request built"
        );

        Ok(Self {
            method,
            uri,
            headers,
            query_params,
            parsed_body,
            attributes: Map::new(),
            cookies,
            server_params: env.vars().to_vec(),
            body,
        })
    }

    /// Get the HTTP method.
    #[inline]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Get the full URI.
    #[inline]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Get a query parameter (last one wins).
    #[inline]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        lookup(&self.query_params, name).map(String::as_str)
    }

    /// Get a parsed body parameter.
    #[inline]
    pub fn parsed_body_param(&self, name: &str) -> Option<&Value> {
        self.parsed_body.as_ref().and_then(|b| b.get(name))
    }

    /// Get a request attribute.
    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    /// Get a cookie.
    #[inline]
    pub fn cookie_param(&self, name: &str) -> Option<&str> {
        lookup(&self.cookies, name).map(String::as_str)
    }

    /// Get a server parameter.
    #[inline]
    pub fn server_param(&self, name: &str) -> Option<&Scalar> {
        lookup(&self.server_params, name)
    }

    /// Get all values of a header joined with a comma (empty if missing).
    #[inline]
    pub fn header_line(&self, name: &str) -> String {
        self.headers.get_line(name)
    }

    /// Get the media type and parameters from Content-Type.
    #[inline]
    pub fn content_type(&self) -> Option<String> {
        self.headers.get("Content-Type").map(HeaderEntry::line)
    }

    /// Get Content-Length.
    pub fn content_length(&self) -> Option<u64> {
        let entry = self.headers.get("Content-Length")?;
        let first = entry.values().next()?;
        match first {
            Scalar::Int(n) => u64::try_from(*n).ok(),
            Scalar::Str(s) => s.trim().parse().ok(),
        }
    }

    // Modifiers

    /// Set a request attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    /// Replace the parsed body. `None` marks the body as not parsed.
    pub fn with_parsed_body(mut self, parsed: Option<Map<String, Value>>) -> Self {
        self.parsed_body = parsed;
        self
    }

    /// Replace the raw body and re-parse it using the current Content-Type.
    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self.parsed_body = parse_body(self.content_type().as_deref(), &self.body);
        self
    }

    /// Set a header, replacing any existing value.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<HeaderEntry>) -> Self {
        self.headers.set(name, value);
        self
    }

    /// Append a value to a header.
    pub fn with_added_header(mut self, name: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Remove a header.
    pub fn without_header(mut self, name: &str) -> Self {
        self.headers.remove(name);
        self
    }
}

impl IncomingRequest for Request {
    #[inline]
    fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    #[inline]
    fn parsed_body(&self) -> Option<&Map<String, Value>> {
        self.parsed_body.as_ref()
    }

    #[inline]
    fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    #[inline]
    fn cookie_params(&self) -> &[(String, String)] {
        &self.cookies
    }

    #[inline]
    fn server_params(&self) -> &[(String, Scalar)] {
        &self.server_params
    }

    #[inline]
    fn headers(&self) -> &Headers {
        &self.headers
    }

    #[inline]
    fn body(&self) -> &Bytes {
        &self.body
    }
}

impl<B> TryFrom<http::Request<B>> for Request
where
    B: Into<Bytes>,
{
    type Error = Error;

    fn try_from(req: http::Request<B>) -> Result<Self> {
        Self::from_http(req, None)
    }
}

/// Build the request URI from `HTTPS`, `HTTP_HOST`/`SERVER_NAME`,
/// `SERVER_PORT`, `REQUEST_URI` and `QUERY_STRING`.
///
/// Path and query are escaped with [`URI_UNSAFE`] first, so a raw query such
/// as `scope=read write` still yields a URI.
fn build_uri(env: &Environment) -> Result<Uri> {
    let https = env
        .get_string(keys::HTTPS)
        .map(|v| !v.is_empty() && !v.eq_ignore_ascii_case("off"))
        .unwrap_or(false);
    let scheme = if https { "https" } else { "http" };

    let host = env
        .get_string(keys::HTTP_HOST)
        .filter(|h| !h.is_empty())
        .or_else(|| {
            let name = env.get_string(keys::SERVER_NAME)?;
            match env.get(keys::SERVER_PORT).map(Scalar::to_string) {
                Some(port) if port != "80" && port != "443" => Some(format!("{}:{}", name, port)),
                _ => Some(name),
            }
        })
        .unwrap_or_else(|| "localhost".to_string());

    let request_uri = env.get_string(keys::REQUEST_URI).unwrap_or_default();
    let path = match request_uri.split_once('?') {
        Some((path, _)) => path.to_string(),
        None => request_uri,
    };
    let path = utf8_percent_encode(&path, URI_UNSAFE).to_string();
    let path = if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    };

    let query = env
        .get_string(keys::QUERY_STRING)
        .map(|q| utf8_percent_encode(&q, URI_UNSAFE).to_string())
        .unwrap_or_default();
    let uri = if query.is_empty() {
        format!("{}://{}{}", scheme, host, path)
    } else {
        format!("{}://{}{}?{}", scheme, host, path, query)
    };

    uri.parse::<Uri>()
        .map_err(|e| Error::InvalidRequest(format!("invalid URI '{}': {}", uri, e)))
}
