//! Authorization server response.

use std::borrow::Cow;

use http::StatusCode;
use serde_json::{Map, Value};

use super::AuthorizationResponse;
use crate::core::{Error, Result};

/// Response produced by the authorization server.
///
/// The body is the JSON encoding of the response parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    parameters: Map<String, Value>,
    status: StatusCode,
    status_text: Option<String>,
    headers: Vec<(String, String)>,
}

impl Default for Response {
    fn default() -> Self {
        Self::new(Map::new(), StatusCode::OK, Vec::new())
    }
}

impl Response {
    /// Create a response from parameters, status and headers.
    pub fn new(parameters: Map<String, Value>, status: StatusCode, headers: Vec<(String, String)>) -> Self {
        let mut res = Self {
            parameters,
            status,
            status_text: None,
            headers: Vec::with_capacity(headers.len()),
        };
        res.add_http_headers(headers);
        res
    }

    /// Set the status code by number, with optional status text.
    ///
    /// Codes outside 100..=999 are rejected.
    pub fn set_status_code(&mut self, code: u16, text: Option<&str>) -> Result<()> {
        self.status = StatusCode::from_u16(code).map_err(|_| Error::InvalidStatus(code))?;
        self.status_text = text.map(str::to_string);
        Ok(())
    }

    /// Set the status code.
    #[inline]
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
        self.status_text = None;
    }

    /// Get a response parameter.
    #[inline]
    pub fn parameter(&self, name: &str) -> Option<&Value> {
        self.parameters.get(name)
    }

    /// Get all response parameters.
    #[inline]
    pub fn parameters(&self) -> &Map<String, Value> {
        &self.parameters
    }

    /// Set a response parameter.
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.parameters.insert(name.into(), value.into());
    }

    /// Merge parameters, overwriting existing keys.
    pub fn add_parameters(&mut self, parameters: Map<String, Value>) {
        self.parameters.extend(parameters);
    }

    /// Get a header by exact name.
    #[inline]
    pub fn http_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Set a header by exact name, replacing any previous value in place.
    pub fn set_http_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.headers.iter_mut().find(|(k, _)| *k == name) {
            Some(slot) => slot.1 = value,
            None => self.headers.push((name, value)),
        }
    }

    /// Set several headers.
    pub fn add_http_headers<K, V>(&mut self, headers: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<String>,
    {
        for (k, v) in headers {
            self.set_http_header(k, v);
        }
    }

    /// Turn this response into an OAuth2 error response.
    ///
    /// Parameters are replaced by `error` plus the optional `error_description`
    /// and `error_uri`, and `Cache-Control: no-store` is set.
    pub fn set_error(
        &mut self,
        status: StatusCode,
        error: &str,
        description: Option<&str>,
        uri: Option<&str>,
    ) {
        let mut parameters = Map::new();
        parameters.insert("error".into(), Value::from(error));
        if let Some(description) = description {
            parameters.insert("error_description".into(), Value::from(description));
        }
        if let Some(uri) = uri {
            parameters.insert("error_uri".into(), Value::from(uri));
        }

        self.parameters = parameters;
        self.set_status(status);
        self.set_http_header("Cache-Control", "no-store");
    }

    /// Check if this is a successful response (2xx).
    #[inline]
    pub fn is_successful(&self) -> bool {
        self.status.is_success()
    }

    /// Check if this is a redirect (3xx).
    #[inline]
    pub fn is_redirection(&self) -> bool {
        self.status.is_redirection()
    }

    /// Check if this is a client error (4xx).
    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// Check if this is a server error (5xx).
    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl AuthorizationResponse for Response {
    #[inline]
    fn http_headers(&self) -> &[(String, String)] {
        &self.headers
    }

    #[inline]
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn status_text(&self) -> Option<&str> {
        self.status_text
            .as_deref()
            .or_else(|| self.status.canonical_reason())
    }

    fn response_body(&self) -> Cow<'_, str> {
        if self.parameters.is_empty() {
            return Cow::Borrowed("");
        }
        // Serializing a map of JSON values cannot fail
        Cow::Owned(Value::Object(self.parameters.clone()).to_string())
    }
}
