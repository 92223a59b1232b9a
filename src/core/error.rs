//! Core error types.

use std::fmt;

/// Errors raised while building or bridging HTTP messages.
#[derive(Debug)]
pub enum Error {
    /// Environment that cannot form a valid request (method, URI).
    InvalidRequest(String),

    /// Response that cannot be converted to an `http` response.
    InvalidResponse(String),

    /// Status code outside the valid range.
    InvalidStatus(u16),

    /// I/O error (body stream write or seek).
    Io(std::io::Error),

    /// HTTP error.
    Http(http::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRequest(msg) => write!(f, "invalid request: {}", msg),
            Error::InvalidResponse(msg) => write!(f, "invalid response: {}", msg),
            Error::InvalidStatus(code) => write!(f, "invalid status code: {}", code),
            Error::Io(e) => write!(f, "I/O error: {}", e),
            Error::Http(e) => write!(f, "HTTP error: {}", e),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<http::Error> for Error {
    fn from(e: http::Error) -> Self {
        Error::Http(e)
    }
}

/// Result type alias for bridge operations.
pub type Result<T> = std::result::Result<T, Error>;
