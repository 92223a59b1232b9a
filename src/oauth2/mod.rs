//! Authorization server message types.
//!
//! [`Request`] is what the bridge produces for the authorization server.
//! [`AuthorizationResponse`] is what the bridge reads back; [`Response`] is a
//! concrete implementation whose body is the JSON encoding of its parameters.

mod request;
mod response;

use std::borrow::Cow;

use http::StatusCode;

pub use request::{Request, RequestParts};
pub use response::Response;

/// Read access to an authorization server response.
pub trait AuthorizationResponse {
    /// Headers in order.
    fn http_headers(&self) -> &[(String, String)];

    /// Status code.
    fn status_code(&self) -> StatusCode;

    /// Status text, if any.
    fn status_text(&self) -> Option<&str>;

    /// Encoded response body.
    fn response_body(&self) -> Cow<'_, str>;
}
