//! CGI-style server environment.
//!
//! The environment is the source of a request's server parameters and, via
//! [`Headers::from_environment`](super::Headers::from_environment), of its
//! headers. It can be mocked for tests or derived from an `http::Request`.

use std::net::SocketAddr;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::types::{lookup, Scalar, ServerParams};

/// Server variable keys.
pub mod keys {
    pub const REQUEST_METHOD: &str = "REQUEST_METHOD";
    pub const REQUEST_URI: &str = "REQUEST_URI";
    pub const QUERY_STRING: &str = "QUERY_STRING";
    pub const SERVER_PROTOCOL: &str = "SERVER_PROTOCOL";
    pub const SERVER_NAME: &str = "SERVER_NAME";
    pub const SERVER_PORT: &str = "SERVER_PORT";
    pub const SCRIPT_NAME: &str = "SCRIPT_NAME";
    pub const REMOTE_ADDR: &str = "REMOTE_ADDR";
    pub const REMOTE_PORT: &str = "REMOTE_PORT";
    pub const REQUEST_TIME: &str = "REQUEST_TIME";
    pub const REQUEST_TIME_FLOAT: &str = "REQUEST_TIME_FLOAT";
    pub const CONTENT_TYPE: &str = "CONTENT_TYPE";
    pub const CONTENT_LENGTH: &str = "CONTENT_LENGTH";
    pub const HTTPS: &str = "HTTPS";
    pub const HTTP_HOST: &str = "HTTP_HOST";
    pub const HTTP_COOKIE: &str = "HTTP_COOKIE";
    pub const PHP_AUTH_USER: &str = "PHP_AUTH_USER";
    pub const PHP_AUTH_PW: &str = "PHP_AUTH_PW";
    pub const PHP_AUTH_DIGEST: &str = "PHP_AUTH_DIGEST";
    pub const AUTH_TYPE: &str = "AUTH_TYPE";
}

/// Ordered server variables, unique by key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    vars: ServerParams,
}

impl Environment {
    /// Create an environment from variables. Later duplicates replace earlier ones.
    pub fn new(vars: ServerParams) -> Self {
        let mut env = Self::default();
        for (k, v) in vars {
            env.set(k, v);
        }
        env
    }

    /// Create a mock environment with sensible defaults, then apply `overrides`.
    pub fn mock<K, V, I>(overrides: I) -> Self
    where
        K: Into<String>,
        V: Into<Scalar>,
        I: IntoIterator<Item = (K, V)>,
    {
        let (secs, float) = request_time();

        let mut env = Self::new(vec![
            (keys::SERVER_PROTOCOL.into(), "HTTP/1.1".into()),
            (keys::REQUEST_METHOD.into(), "GET".into()),
            (keys::SCRIPT_NAME.into(), "".into()),
            (keys::REQUEST_URI.into(), "".into()),
            (keys::QUERY_STRING.into(), "".into()),
            (keys::SERVER_NAME.into(), "localhost".into()),
            (keys::SERVER_PORT.into(), Scalar::Int(80)),
            (keys::HTTP_HOST.into(), "localhost".into()),
            (
                "HTTP_ACCEPT".into(),
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".into(),
            ),
            ("HTTP_ACCEPT_LANGUAGE".into(), "en-US,en;q=0.8".into()),
            ("HTTP_ACCEPT_CHARSET".into(), "ISO-8859-1,utf-8;q=0.7,*;q=0.3".into()),
            ("HTTP_USER_AGENT".into(), "oauth2_bridge".into()),
            (keys::REMOTE_ADDR.into(), "127.0.0.1".into()),
            (keys::REQUEST_TIME.into(), Scalar::Int(secs)),
            (keys::REQUEST_TIME_FLOAT.into(), float.into()),
        ]);

        for (k, v) in overrides {
            env.set(k, v);
        }

        env
    }

    /// Derive server variables from an `http` request.
    ///
    /// Every header becomes an `HTTP_*` variable (repeated values joined with
    /// `, `). An `Authorization` header also fills the `PHP_AUTH_*` and
    /// `AUTH_TYPE` variables.
    pub fn from_http<B>(req: &http::Request<B>, remote_addr: Option<SocketAddr>) -> Self {
        let (secs, float) = request_time();
        let uri = req.uri();
        let headers = req.headers();
        let https = uri.scheme() == Some(&http::uri::Scheme::HTTPS);

        let host = headers
            .get(http::header::HOST)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .or_else(|| uri.authority().map(|a| a.to_string()))
            .unwrap_or_default();
        let (server_name, server_port) = split_host(&host, https);

        let mut env = Self::default();
        env.set(keys::REQUEST_TIME, Scalar::Int(secs));
        env.set(keys::REQUEST_TIME_FLOAT, float);
        env.set(keys::REQUEST_METHOD, req.method().as_str());
        env.set(
            keys::REQUEST_URI,
            uri.path_and_query().map(|p| p.as_str()).unwrap_or("/"),
        );
        env.set(keys::QUERY_STRING, uri.query().unwrap_or_default());
        env.set(keys::SERVER_PROTOCOL, protocol(req.version()));
        env.set(keys::SERVER_NAME, server_name);
        env.set(keys::SERVER_PORT, server_port);

        if let Some(addr) = remote_addr {
            env.set(keys::REMOTE_ADDR, addr.ip().to_string());
            env.set(keys::REMOTE_PORT, Scalar::Int(addr.port().into()));
        }

        if https {
            env.set(keys::HTTPS, "on");
        }

        for name in headers.keys() {
            let value = headers
                .get_all(name)
                .iter()
                .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
                .collect::<Vec<_>>()
                .join(", ");

            let key = name.as_str().to_ascii_uppercase().replace('-', "_");
            match key.as_str() {
                keys::CONTENT_TYPE | keys::CONTENT_LENGTH => env.set(key.clone(), value.clone()),
                _ => {}
            }
            env.set(format!("HTTP_{}", key), value);
        }

        if let Some(auth) = headers
            .get(http::header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
        {
            env.apply_authorization(auth);
        }

        env
    }

    /// Fill the auth variables from an `Authorization` header value.
    fn apply_authorization(&mut self, auth: &str) {
        let (scheme, credentials) = match auth.trim().split_once(' ') {
            Some((scheme, rest)) => (scheme, rest.trim()),
            None => return,
        };

        if scheme.eq_ignore_ascii_case("basic") {
            let decoded = match STANDARD.decode(credentials) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::debug!(error = %e, "ignoring malformed basic credentials");
                    return;
                }
            };
            let decoded = String::from_utf8_lossy(&decoded);
            if let Some((user, password)) = decoded.split_once(':') {
                self.set(keys::PHP_AUTH_USER, user);
                self.set(keys::PHP_AUTH_PW, password);
                self.set(keys::AUTH_TYPE, "Basic");
            }
        } else if scheme.eq_ignore_ascii_case("digest") {
            self.set(keys::PHP_AUTH_DIGEST, credentials);
            self.set(keys::AUTH_TYPE, "Digest");
        }
    }

    /// Get a variable.
    #[inline]
    pub fn get(&self, key: &str) -> Option<&Scalar> {
        lookup(&self.vars, key)
    }

    /// Get a variable's string form.
    #[inline]
    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(Scalar::to_string)
    }

    /// Set a variable, replacing an existing one in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Scalar>) {
        let key = key.into();
        let value = value.into();
        match self.vars.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.vars.push((key, value)),
        }
    }

    /// Remove a variable.
    pub fn remove(&mut self, key: &str) -> Option<Scalar> {
        let pos = self.vars.iter().position(|(k, _)| k == key)?;
        Some(self.vars.remove(pos).1)
    }

    /// Iterate variables in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Scalar)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Borrow the variables.
    #[inline]
    pub fn vars(&self) -> &[(String, Scalar)] {
        &self.vars
    }

    /// Consume into the variables.
    #[inline]
    pub fn into_vars(self) -> ServerParams {
        self.vars
    }
}

/// Current time as whole seconds and as a microsecond-precision string.
fn request_time() -> (i64, String) {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    (now.as_secs() as i64, format!("{:.6}", now.as_secs_f64()))
}

/// Protocol string for `SERVER_PROTOCOL`.
fn protocol(version: http::Version) -> &'static str {
    match version {
        http::Version::HTTP_09 => "HTTP/0.9",
        http::Version::HTTP_10 => "HTTP/1.0",
        http::Version::HTTP_2 => "HTTP/2.0",
        http::Version::HTTP_3 => "HTTP/3.0",
        _ => "HTTP/1.1",
    }
}

/// Split a Host header value into server name and port.
fn split_host(host: &str, https: bool) -> (String, Scalar) {
    let default_port = Scalar::Int(if https { 443 } else { 80 });

    if host.is_empty() {
        return ("localhost".to_string(), default_port);
    }

    match host.rfind(':') {
        // IPv6 literal without port
        Some(_) if host.starts_with('[') && !host.contains("]:") => (host.to_string(), default_port),
        Some(pos) => match host[pos + 1..].parse::<i64>() {
            Ok(port) => (host[..pos].to_string(), Scalar::Int(port)),
            Err(_) => (host.to_string(), default_port),
        },
        None => (host.to_string(), default_port),
    }
}
