//! http::Request -> framework -> authorization server -> framework -> http::Response.

use bytes::Bytes;
use http::{Method, StatusCode};
use oauth2_bridge::framework::{Request, Response};
use oauth2_bridge::oauth2;
use oauth2_bridge::MessageBridge;
use serde_json::{json, Value};

/// Minimal client credentials endpoint over the authorization request.
fn token_endpoint(request: &oauth2::Request) -> oauth2::Response {
    let mut response = oauth2::Response::default();

    if request.method() != Some("POST") {
        response.set_error(
            StatusCode::METHOD_NOT_ALLOWED,
            "invalid_request",
            Some("The request method must be POST when requesting an access token"),
            None,
        );
        response.set_http_header("Allow", "POST");
        return response;
    }

    let grant_type = request.request("grant_type").and_then(Value::as_str);
    if grant_type != Some("client_credentials") {
        response.set_error(
            StatusCode::BAD_REQUEST,
            "unsupported_grant_type",
            None,
            None,
        );
        return response;
    }

    let user = request.headers("PHP_AUTH_USER").and_then(|v| v.as_str());
    let password = request.headers("PHP_AUTH_PW").and_then(|v| v.as_str());
    if user != Some("test_client_id") || password != Some("test_secret") {
        response.set_error(
            StatusCode::UNAUTHORIZED,
            "invalid_client",
            Some("The client credentials are invalid"),
            None,
        );
        return response;
    }

    response.set_parameter("access_token", "token-for-test_client_id");
    response.set_parameter("token_type", "Bearer");
    response.set_parameter("expires_in", 3600);
    response.set_http_header("Content-Type", "application/json");
    response.set_http_header("Cache-Control", "no-store");
    response
}

fn round_trip(req: http::Request<Bytes>) -> http::Response<Bytes> {
    let bridge = MessageBridge::new();
    let request = Request::from_http(req, Some("192.0.2.10:50000".parse().unwrap())).unwrap();

    let auth_request = bridge.translate_incoming_request(&request);
    let auth_response = token_endpoint(&auth_request);

    let response = bridge
        .apply_authorization_response(&auth_response, Response::default())
        .unwrap();
    http::Response::try_from(response).unwrap()
}

fn token_request(authorization: &str) -> http::Request<Bytes> {
    http::Request::builder()
        .method(Method::POST)
        .uri("https://auth.example.com/token?audience=api")
        .header("Host", "auth.example.com")
        .header("Content-Type", "application/x-www-form-urlencoded")
        .header("Authorization", authorization)
        .body(Bytes::from_static(b"grant_type=client_credentials"))
        .unwrap()
}

/// Basic credentials reach the endpoint as PHP_AUTH_* headers
#[test]
fn test_client_credentials_grant() {
    // test_client_id:test_secret
    let res = round_trip(token_request("Basic dGVzdF9jbGllbnRfaWQ6dGVzdF9zZWNyZXQ="));

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], "application/json");
    assert_eq!(res.headers()["cache-control"], "no-store");

    let body: Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(
        body,
        json!({
            "access_token": "token-for-test_client_id",
            "token_type": "Bearer",
            "expires_in": 3600
        })
    );
}

/// Wrong credentials produce an OAuth2 error body
#[test]
fn test_invalid_client() {
    // test_client_id:wrong
    let res = round_trip(token_request("Basic dGVzdF9jbGllbnRfaWQ6d3Jvbmc="));

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(body["error"], "invalid_client");
}

/// Translated request carries query, server variables and the remote address
#[test]
fn test_translated_request_fields() {
    let request = Request::from_http(
        token_request("Basic dGVzdF9jbGllbnRfaWQ6dGVzdF9zZWNyZXQ="),
        Some("192.0.2.10:50000".parse().unwrap()),
    )
    .unwrap();
    let auth = MessageBridge::new().translate_incoming_request(&request);

    assert_eq!(auth.query("audience"), Some("api"));
    assert_eq!(auth.request("grant_type"), Some(&json!("client_credentials")));
    assert_eq!(auth.server("REMOTE_ADDR").unwrap(), "192.0.2.10");
    assert_eq!(auth.server("HTTPS").unwrap(), "on");
    assert_eq!(auth.headers("AUTH_TYPE").unwrap(), "Basic");
    assert_eq!(
        auth.headers("host").and_then(|v| v.as_str()),
        Some("auth.example.com")
    );
}

/// GET is rejected by the endpoint with an Allow header
#[test]
fn test_wrong_method() {
    let req = http::Request::builder()
        .method(Method::GET)
        .uri("/token")
        .header("Host", "auth.example.com")
        .body(Bytes::new())
        .unwrap();
    let res = round_trip(req);

    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(res.headers()["allow"], "POST");
}
