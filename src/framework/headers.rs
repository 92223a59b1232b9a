//! Ordered, case-insensitive header collection.

use http::HeaderMap;

use super::Environment;
use crate::types::{HeaderEntry, Scalar};

/// Environment keys that are headers even without the `HTTP_` prefix.
const SPECIAL: [&str; 6] = [
    "CONTENT_TYPE",
    "CONTENT_LENGTH",
    "PHP_AUTH_USER",
    "PHP_AUTH_PW",
    "PHP_AUTH_DIGEST",
    "AUTH_TYPE",
];

/// Convert a header or environment key to Camel-Case.
///
/// `CONTENT_TYPE` -> `Content-Type`, `php-auth-user` -> `Php-Auth-User`.
pub fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper_next = true;

    for c in key.chars() {
        if c == '_' || c == '-' {
            out.push('-');
            upper_next = true;
        } else if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }

    out
}

/// Header collection keyed by name, ASCII case-insensitive, in insertion order.
///
/// Keys keep the casing they were last set with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, HeaderEntry)>,
}

impl Headers {
    /// Create an empty collection.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the header variables of an environment as single-element lists.
    ///
    /// `HTTP_` is stripped and names are converted to Camel-Case.
    /// `HTTP_CONTENT_LENGTH` is skipped in favour of `CONTENT_LENGTH`.
    pub fn from_environment(env: &Environment) -> Self {
        let mut headers = Self::new();

        for (key, value) in env.iter() {
            let key = key.to_ascii_uppercase();
            if key == "HTTP_CONTENT_LENGTH" {
                continue;
            }
            let name = match key.strip_prefix("HTTP_") {
                Some(rest) => rest,
                None if SPECIAL.contains(&key.as_str()) => key.as_str(),
                None => continue,
            };
            headers.set(camel_case(name), HeaderEntry::List(vec![value.clone()]));
        }

        headers
    }

    /// Convert an `http` header map. Every header becomes a list, one
    /// element per occurrence.
    ///
    /// Values that are not visible ASCII are decoded lossily.
    pub fn from_header_map(map: &HeaderMap) -> Self {
        let mut headers = Self::new();

        for name in map.keys() {
            let values: Vec<Scalar> = map
                .get_all(name)
                .iter()
                .map(|v| Scalar::Str(String::from_utf8_lossy(v.as_bytes()).into_owned()))
                .collect();

            headers.set(camel_case(name.as_str()), HeaderEntry::List(values));
        }

        headers
    }

    #[inline]
    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Get a header by name.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&HeaderEntry> {
        self.position(name).map(|i| &self.entries[i].1)
    }

    /// Get all values of a header joined with a comma (empty if missing).
    pub fn get_line(&self, name: &str) -> String {
        self.get(name).map(HeaderEntry::line).unwrap_or_default()
    }

    /// Check whether a header is present.
    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Set a header, replacing any existing value.
    ///
    /// A replaced header keeps its position but takes the new key casing.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<HeaderEntry>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => self.entries[i] = (name, value),
            None => self.entries.push((name, value)),
        }
    }

    /// Append a value to a header, creating it if missing.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<Scalar>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(i) => self.entries[i].1.push(value),
            None => self.entries.push((name, HeaderEntry::Scalar(value))),
        }
    }

    /// Remove a header, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<HeaderEntry> {
        self.position(name).map(|i| self.entries.remove(i).1)
    }

    /// Iterate headers in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of headers.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if there are no headers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<HeaderEntry>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Self::new();
        for (k, v) in iter {
            headers.set(k, v);
        }
        headers
    }
}
