//! Authorization response -> framework response.

use std::io::{Seek, SeekFrom, Write};

use crate::helpers::*;
use http::StatusCode;
use oauth2_bridge::framework::{Body, Response};
use oauth2_bridge::{apply_authorization_response, oauth2, AuthorizationResponse, Error};

const BODY: &str = r#"{"foo":"bar","abc":"123"}"#;

/// Status, headers and body are copied; the body reads back from offset 0
#[test]
fn test_apply_response() {
    let auth = StaticResponse::new(
        StatusCode::OK,
        &[("content-type", "application/json"), ("fizz", "buzz")],
        BODY,
    );

    let mut response = apply_authorization_response(&auth, Response::default()).unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.header_line("content-type"), "application/json");
    assert_eq!(response.header_line("fizz"), "buzz");
    assert_eq!(response.body().position(), 0);
    assert_eq!(read_all(response.body_mut()), BODY);
}

/// Status text is carried over, or falls back to the canonical phrase
#[test]
fn test_status_text() {
    let mut auth = StaticResponse::new(StatusCode::FOUND, &[("Location", "https://client/cb")], "");
    auth.text = Some("Found It".to_string());

    let response = apply_authorization_response(&auth, Response::default()).unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.reason_phrase(), "Found It");
    assert_eq!(response.header_line("Location"), "https://client/cb");
    assert!(response.body().is_empty());

    auth.text = None;
    let response = apply_authorization_response(&auth, Response::default()).unwrap();
    assert_eq!(response.reason_phrase(), "Found");
}

/// Existing headers are overwritten, not appended
#[test]
fn test_headers_overwrite() {
    let auth = StaticResponse::new(StatusCode::OK, &[("Cache-Control", "no-store")], BODY);
    let response = Response::default()
        .with_added_header("Cache-Control", "public")
        .with_added_header("Cache-Control", "max-age=60")
        .with_header("X-Kept", "yes");

    let response = apply_authorization_response(&auth, response).unwrap();
    assert_eq!(response.header_line("cache-control"), "no-store");
    assert_eq!(response.header_line("X-Kept"), "yes");
}

/// Error responses from the authorization server map through unchanged
#[test]
fn test_error_response() {
    let mut auth = oauth2::Response::default();
    auth.set_error(
        StatusCode::UNAUTHORIZED,
        "invalid_client",
        Some("Client authentication failed"),
        None,
    );

    let mut response = apply_authorization_response(&auth, Response::default()).unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.is_error());
    assert_eq!(response.header_line("Cache-Control"), "no-store");

    let body: serde_json::Value = serde_json::from_str(&read_all(response.body_mut())).unwrap();
    assert_eq!(body["error"], "invalid_client");
    assert_eq!(body["error_description"], "Client authentication failed");
}

/// Any writable, seekable stream can back the response
#[test]
fn test_file_body_stream() {
    let file = tempfile::tempfile().unwrap();
    let auth = StaticResponse::new(StatusCode::CREATED, &[], BODY);

    let response = Response::with_body_stream(StatusCode::OK, file);
    let response = apply_authorization_response(&auth, response).unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let mut file = response.into_body();
    assert_eq!(file.stream_position().unwrap(), 0);
    assert_eq!(read_all(&mut file), BODY);
}

/// A stream that cannot rewind surfaces as an I/O error
#[test]
fn test_unseekable_stream() {
    let auth = StaticResponse::new(StatusCode::OK, &[], BODY);
    let response = Response::with_body_stream(StatusCode::OK, ForwardOnly::default());

    let err = apply_authorization_response(&auth, response).unwrap_err();
    match err {
        Error::Io(e) => assert_eq!(e.kind(), std::io::ErrorKind::Unsupported),
        other => panic!("expected I/O error, got {:?}", other),
    }
}

/// Writing starts at the cursor and leaves trailing bytes in place
#[test]
fn test_prepositioned_body_not_truncated() {
    let mut body = Body::new();
    body.write_all(b"0123456789").unwrap();
    body.seek(SeekFrom::Start(0)).unwrap();

    let auth = StaticResponse::new(StatusCode::OK, &[], "abc");
    let response = Response::with_body_stream(StatusCode::OK, body);
    let mut response = apply_authorization_response(&auth, response).unwrap();

    assert_eq!(read_all(response.body_mut()), "abc3456789");
}

/// A body that already holds data gets the new body appended at its cursor
#[test]
fn test_body_written_at_cursor() {
    let auth = StaticResponse::new(StatusCode::OK, &[], "{}");
    let body = Body::from("prefix:");

    let response = Response::with_body_stream(StatusCode::OK, body);
    let mut response = apply_authorization_response(&auth, response).unwrap();
    assert_eq!(read_all(response.body_mut()), "prefix:{}");
    assert_eq!(response.body().len(), 9);
}

/// The concrete authorization response serializes its parameters as JSON
#[test]
fn test_parameter_body_round_trip() {
    let mut auth = oauth2::Response::default();
    auth.set_parameter("access_token", "2YotnFZFEjr1zCsicMWpAA");
    auth.set_parameter("token_type", "Bearer");
    auth.set_parameter("expires_in", 3600);
    auth.set_http_header("Content-Type", "application/json");

    let mut response = apply_authorization_response(&auth, Response::default()).unwrap();
    assert_eq!(read_all(response.body_mut()), auth.response_body());
    assert_eq!(response.header_line("Content-Type"), "application/json");
}

/// Parameters are serialized in insertion order
#[test]
fn test_parameter_body_keeps_order() {
    let mut auth = oauth2::Response::default();
    auth.set_parameter("foo", "bar");
    auth.set_parameter("abc", "123");

    let mut response = apply_authorization_response(&auth, Response::default()).unwrap();
    assert_eq!(read_all(response.body_mut()), BODY);
}
