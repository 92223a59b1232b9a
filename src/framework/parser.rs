//! Request parsing utilities.

use std::borrow::Cow;

use serde_json::{Map, Value};

use crate::types::ParamList;

/// Media types decoded as form data.
const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";
const JSON: &str = "application/json";

/// Fast percent decode - borrows when no decoding is needed.
/// `+` is decoded to a space as in form encoding.
#[inline]
pub fn fast_percent_decode(s: &str) -> Cow<'_, str> {
    if !s.contains('%') && !s.contains('+') {
        return Cow::Borrowed(s);
    }

    let plus_decoded = s.replace('+', " ");
    Cow::Owned(
        percent_encoding::percent_decode_str(&plus_decoded)
            .decode_utf8_lossy()
            .into_owned(),
    )
}

/// Parse a query string into key-value pairs.
///
/// Duplicate keys are kept in order; lookups take the last one.
#[inline]
pub fn parse_query_string(query: &str) -> ParamList {
    let pair_count = query.matches('&').count() + 1;
    let mut params = Vec::with_capacity(pair_count.min(16));

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }

        let (key, value) = match pair.find('=') {
            Some(pos) => (&pair[..pos], &pair[pos + 1..]),
            None => (pair, ""),
        };

        if !key.is_empty() {
            params.push((
                fast_percent_decode(key).into_owned(),
                fast_percent_decode(value).into_owned(),
            ));
        }
    }

    params
}

/// Parse a Cookie header into name-value pairs.
#[inline]
pub fn parse_cookies(cookie_header: &str) -> ParamList {
    let cookie_count = cookie_header.matches(';').count() + 1;
    let mut cookies = Vec::with_capacity(cookie_count.min(16));

    for cookie in cookie_header.split(';') {
        let cookie = cookie.trim();
        if cookie.is_empty() {
            continue;
        }

        let (name, value) = match cookie.find('=') {
            Some(pos) => (cookie[..pos].trim(), cookie[pos + 1..].trim()),
            None => continue,
        };

        if !name.is_empty() {
            cookies.push((name.to_string(), fast_percent_decode(value).into_owned()));
        }
    }

    cookies
}

/// Extract the media type: lowercased, parameters stripped.
#[inline]
pub fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

/// Parse a request body according to its content type.
///
/// Returns `None` when the media type has no parser or the body does not
/// decode to a mapping (empty input, invalid JSON, JSON scalar or `null`).
pub fn parse_body(content_type: Option<&str>, body: &[u8]) -> Option<Map<String, Value>> {
    let media_type = media_type(content_type?);

    if media_type == FORM_URLENCODED {
        let text = String::from_utf8_lossy(body);
        let map = parse_query_string(&text)
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();
        return Some(map);
    }

    if media_type == JSON || media_type.ends_with("+json") {
        return match serde_json::from_slice::<Value>(body).ok()? {
            Value::Object(map) => Some(map),
            Value::Array(items) => Some(
                items
                    .into_iter()
                    .enumerate()
                    .map(|(i, v)| (i.to_string(), v))
                    .collect(),
            ),
            _ => None,
        };
    }

    None
}
