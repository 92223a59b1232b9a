//! Test helpers and utilities

use std::borrow::Cow;
use std::io::{self, Read, Seek, SeekFrom, Write};

use http::StatusCode;
use oauth2_bridge::framework::{Environment, Request};
use oauth2_bridge::{AuthorizationResponse, Scalar};

/// Token request: query `one=1&two=2&three=3`, form body `foo=bar&abc=123`.
pub fn token_request() -> Request {
    let mut env = Environment::mock([
        ("REQUEST_METHOD", "POST"),
        ("REQUEST_URI", "/token?one=1&two=2&three=3"),
        ("QUERY_STRING", "one=1&two=2&three=3"),
        ("CONTENT_TYPE", "application/x-www-form-urlencoded"),
    ]);
    env.set("CONTENT_LENGTH", Scalar::Int(15));

    Request::from_environment(&env, "foo=bar&abc=123").expect("valid environment")
}

/// Authorization response with a fixed raw body.
#[derive(Debug, Clone)]
pub struct StaticResponse {
    pub status: StatusCode,
    pub text: Option<String>,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl StaticResponse {
    pub fn new(status: StatusCode, headers: &[(&str, &str)], body: &str) -> Self {
        Self {
            status,
            text: None,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: body.to_string(),
        }
    }
}

impl AuthorizationResponse for StaticResponse {
    fn http_headers(&self) -> &[(String, String)] {
        &self.headers
    }

    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn status_text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    fn response_body(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.body)
    }
}

/// Body stream that accepts writes but cannot seek.
#[derive(Debug, Default)]
pub struct ForwardOnly {
    pub written: Vec<u8>,
}

impl Write for ForwardOnly {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.written.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for ForwardOnly {
    fn seek(&mut self, _pos: SeekFrom) -> io::Result<u64> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "stream is not seekable"))
    }
}

/// Read a stream from its current position to the end.
pub fn read_all(stream: &mut impl Read) -> String {
    let mut out = String::new();
    stream.read_to_string(&mut out).expect("readable body");
    out
}
