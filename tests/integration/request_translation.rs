//! Framework request -> authorization request.

use crate::helpers::*;
use oauth2_bridge::config::{BridgeConfig, CollisionPolicy};
use oauth2_bridge::framework::{Environment, Request};
use oauth2_bridge::{translate_incoming_request, MessageBridge, Scalar};
use serde_json::json;

/// Query, body and headers survive translation
#[test]
fn test_translate_form_request() {
    let request = token_request();
    let auth = translate_incoming_request(&request);

    assert_eq!(auth.query("two"), Some("2"));
    assert_eq!(auth.request("abc"), Some(&json!("123")));
    assert_eq!(auth.request("foo"), Some(&json!("bar")));
    assert_eq!(auth.headers("content-length"), Some(&Scalar::Int(15)));
    assert_eq!(
        auth.headers("Content-Type").and_then(Scalar::as_str),
        Some("application/x-www-form-urlencoded")
    );
    assert_eq!(auth.method(), Some("POST"));
    assert_eq!(auth.content().as_ref(), b"foo=bar&abc=123");
}

/// Non-credential headers keep the framework's Camel-Case keys
#[test]
fn test_header_keys_not_rewritten() {
    let auth = translate_incoming_request(&token_request());
    let keys: Vec<&str> = auth.header_map().iter().map(|(k, _)| k.as_str()).collect();

    assert!(keys.contains(&"Content-Type"));
    assert!(keys.contains(&"Content-Length"));
    assert!(keys.contains(&"Host"));
    assert!(!keys.contains(&"CONTENT_TYPE"));
    assert!(!keys.contains(&"HTTP_HOST"));
}

/// Credentials from the environment arrive under the canonical keys
#[test]
fn test_credentials_renamed() {
    let env = Environment::mock([
        ("REQUEST_METHOD", "POST"),
        ("PHP_AUTH_USER", "test_client_id"),
        ("PHP_AUTH_PW", "test_secret"),
        ("AUTH_TYPE", "Basic"),
    ]);
    let request = Request::from_environment(&env, "").unwrap();
    assert_eq!(request.header_line("Php-Auth-User"), "test_client_id");

    let auth = translate_incoming_request(&request);
    assert_eq!(auth.headers("PHP_AUTH_USER").unwrap(), "test_client_id");
    assert_eq!(auth.headers("PHP_AUTH_PW").unwrap(), "test_secret");
    assert_eq!(auth.headers("AUTH_TYPE").unwrap(), "Basic");
    assert!(auth.headers("Php-Auth-User").is_none());
    assert!(auth.header_map().iter().all(|(k, _)| k != "Php-Auth-User"));
}

/// Repeated header values are comma-joined
#[test]
fn test_multi_value_header_joined() {
    let request = token_request()
        .with_header("X-Forwarded-For", vec!["10.0.0.1", "10.0.0.2"])
        .with_added_header("Accept-Encoding", "gzip")
        .with_added_header("Accept-Encoding", "br");

    let auth = translate_incoming_request(&request);
    assert_eq!(auth.headers("X-Forwarded-For").unwrap(), "10.0.0.1,10.0.0.2");
    assert_eq!(auth.headers("Accept-Encoding").unwrap(), "gzip,br");
}

/// An absent parsed body looks up as absent, never as an error
#[test]
fn test_absent_parsed_body() {
    let request = token_request().with_parsed_body(None);
    let auth = translate_incoming_request(&request);

    assert!(auth.request_params().is_empty());
    assert!(auth.request("abc").is_none());
    assert!(auth.request("grant_type").is_none());
    // Raw body is still passed through
    assert_eq!(auth.content().as_ref(), b"foo=bar&abc=123");
}

/// JSON bodies are parsed into body parameters
#[test]
fn test_json_body() {
    let env = Environment::mock([
        ("REQUEST_METHOD", "POST"),
        ("CONTENT_TYPE", "application/json"),
    ]);
    let body = r#"{"grant_type":"client_credentials","scope":["read","write"]}"#;
    let request = Request::from_environment(&env, body).unwrap();

    let auth = translate_incoming_request(&request);
    assert_eq!(auth.request("grant_type"), Some(&json!("client_credentials")));
    assert_eq!(auth.request("scope"), Some(&json!(["read", "write"])));
}

/// An empty JSON body is not parsed and yields no body parameters
#[test]
fn test_empty_json_body() {
    let env = Environment::mock([
        ("REQUEST_METHOD", "POST"),
        ("CONTENT_TYPE", "application/json"),
    ]);
    let request = Request::from_environment(&env, "").unwrap();

    let auth = translate_incoming_request(&request);
    assert!(auth.request_params().is_empty());
    assert!(auth.content().is_empty());
}

/// Attributes, cookies and server variables are copied
#[test]
fn test_attributes_cookies_server() {
    let env = Environment::mock([
        ("REQUEST_METHOD", "GET"),
        ("HTTP_COOKIE", "session=abc; theme=dark"),
    ]);
    let request = Request::from_environment(&env, "")
        .unwrap()
        .with_attribute("client", json!({"id": "demo"}));

    let auth = translate_incoming_request(&request);
    assert_eq!(auth.attributes("client"), Some(&json!({"id": "demo"})));
    assert_eq!(auth.cookies("session"), Some("abc"));
    assert_eq!(auth.cookies("theme"), Some("dark"));
    assert_eq!(auth.server("SERVER_NAME").unwrap(), "localhost");
    assert!(auth.files("upload").is_none());
}

/// Translation is a snapshot and repeatable
#[test]
fn test_translation_idempotent() {
    let bridge = MessageBridge::new();
    let request = token_request();

    let first = bridge.translate_incoming_request(&request);
    let second = bridge.translate_incoming_request(&request);
    assert_eq!(first, second);

    // Later framework changes do not leak into the snapshot
    let changed = request.with_attribute("late", "value");
    assert!(first.attributes("late").is_none());
    assert_eq!(bridge.translate_incoming_request(&changed).attributes("late"), Some(&json!("value")));
}

/// Collision policy from configuration
#[test]
fn test_collision_policy_from_config() {
    let request = token_request()
        .with_header("Php-Auth-User", "renamed")
        .with_header("PHP_AUTH_USER", "literal");

    let last = MessageBridge::from_config(&BridgeConfig::default());
    let first = MessageBridge::from_config(&BridgeConfig {
        collision_policy: CollisionPolicy::FirstWins,
    });

    let from_last = last.translate_incoming_request(&request);
    let from_first = first.translate_incoming_request(&request);

    assert_eq!(from_last.headers("PHP_AUTH_USER").unwrap(), "literal");
    assert_eq!(from_first.headers("PHP_AUTH_USER").unwrap(), "renamed");
    assert_eq!(
        from_last
            .header_map()
            .iter()
            .filter(|(k, _)| k == "PHP_AUTH_USER")
            .count(),
        1
    );
}

/// Raw CGI queries with spaces still translate
#[test]
fn test_raw_query_with_space() {
    let env = Environment::mock([
        ("REQUEST_METHOD", "GET"),
        ("REQUEST_URI", "/authorize"),
        ("QUERY_STRING", "scope=read write"),
    ]);
    let request = Request::from_environment(&env, "").unwrap();

    let auth = translate_incoming_request(&request);
    assert_eq!(auth.query("scope"), Some("read write"));
}
