//! Value types shared by the framework and authorization sides.

use std::fmt;

/// Key-value pair type for parameters (faster than HashMap for small collections).
pub type ParamList = Vec<(String, String)>;

/// Server/environment parameters, ordered as supplied.
pub type ServerParams = Vec<(String, Scalar)>;

/// Find the last value stored under `key` (later duplicates win).
#[inline]
pub fn lookup<'a, V>(list: &'a [(String, V)], key: &str) -> Option<&'a V> {
    list.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v)
}

// =============================================================================
// Scalar
// =============================================================================

/// A single header or server value: either a number or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scalar {
    Int(i64),
    Str(String),
}

impl Scalar {
    /// Borrow the string form, if this is a string.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            Scalar::Int(_) => None,
        }
    }

    /// Get the numeric form, if this is a number.
    #[inline]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(n) => Some(*n),
            Scalar::Str(_) => None,
        }
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(n) => write!(f, "{}", n),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(n: i64) -> Self {
        Scalar::Int(n)
    }
}

impl From<i32> for Scalar {
    fn from(n: i32) -> Self {
        Scalar::Int(n.into())
    }
}

impl From<u16> for Scalar {
    fn from(n: u16) -> Self {
        Scalar::Int(n.into())
    }
}

impl PartialEq<str> for Scalar {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Scalar {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for Scalar {
    fn eq(&self, other: &i64) -> bool {
        self.as_int() == Some(*other)
    }
}

// =============================================================================
// Header Entry
// =============================================================================

/// A header value as the framework stores it: one value or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderEntry {
    Scalar(Scalar),
    List(Vec<Scalar>),
}

impl HeaderEntry {
    /// Iterate over the individual values.
    pub fn values(&self) -> std::slice::Iter<'_, Scalar> {
        match self {
            HeaderEntry::Scalar(s) => std::slice::from_ref(s).iter(),
            HeaderEntry::List(list) => list.iter(),
        }
    }

    /// Add another value, turning a scalar into a list.
    pub fn push(&mut self, value: Scalar) {
        match self {
            HeaderEntry::List(list) => list.push(value),
            HeaderEntry::Scalar(first) => {
                let first = std::mem::replace(first, Scalar::Int(0));
                *self = HeaderEntry::List(vec![first, value]);
            }
        }
    }

    /// All values joined with a comma.
    pub fn line(&self) -> String {
        join(self.values())
    }
}

/// Join scalars with `,` in order.
pub(crate) fn join<'a>(values: impl Iterator<Item = &'a Scalar>) -> String {
    let mut out = String::new();
    for (i, v) in values.enumerate() {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&v.to_string());
    }
    out
}

impl From<Scalar> for HeaderEntry {
    fn from(value: Scalar) -> Self {
        HeaderEntry::Scalar(value)
    }
}

impl From<&str> for HeaderEntry {
    fn from(value: &str) -> Self {
        HeaderEntry::Scalar(value.into())
    }
}

impl From<String> for HeaderEntry {
    fn from(value: String) -> Self {
        HeaderEntry::Scalar(value.into())
    }
}

impl From<i64> for HeaderEntry {
    fn from(value: i64) -> Self {
        HeaderEntry::Scalar(value.into())
    }
}

impl From<i32> for HeaderEntry {
    fn from(value: i32) -> Self {
        HeaderEntry::Scalar(value.into())
    }
}

impl From<Vec<Scalar>> for HeaderEntry {
    fn from(values: Vec<Scalar>) -> Self {
        HeaderEntry::List(values)
    }
}

impl From<Vec<&str>> for HeaderEntry {
    fn from(values: Vec<&str>) -> Self {
        HeaderEntry::List(values.into_iter().map(Scalar::from).collect())
    }
}

impl From<Vec<String>> for HeaderEntry {
    fn from(values: Vec<String>) -> Self {
        HeaderEntry::List(values.into_iter().map(Scalar::from).collect())
    }
}
