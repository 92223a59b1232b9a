//! Header normalization for the authorization side.
//!
//! Four credential headers are renamed to the keys the authorization server
//! reads; every value is reduced to a single scalar.

use tracing::warn;

use crate::config::CollisionPolicy;
use crate::types::{join, HeaderEntry, Scalar};

/// Source key (exact match) to authorization-side key.
const HEADER_MAP: [(&str, &str); 4] = [
    ("Php-Auth-User", "PHP_AUTH_USER"),
    ("Php-Auth-Pw", "PHP_AUTH_PW"),
    ("Php-Auth-Digest", "PHP_AUTH_DIGEST"),
    ("Auth-Type", "AUTH_TYPE"),
];

/// Target key for `name`, or `name` itself when it is not renamed.
#[inline]
fn target_key(name: &str) -> &str {
    HEADER_MAP
        .iter()
        .find(|(source, _)| *source == name)
        .map_or(name, |(_, target)| *target)
}

/// Reduce a header entry to one scalar.
///
/// A one-element list yields the element, a longer list the comma-joined
/// string, an empty list the empty string. Scalars are kept.
pub(crate) fn reduce_header(entry: &HeaderEntry) -> Scalar {
    match entry {
        HeaderEntry::Scalar(value) => value.clone(),
        HeaderEntry::List(list) => match list.as_slice() {
            [single] => single.clone(),
            values => Scalar::Str(join(values.iter())),
        },
    }
}

/// Rename and reduce headers, preserving source order.
///
/// When two source keys land on the same target key the collision policy
/// decides which value survives; the key keeps its first position.
pub(crate) fn cleanup_headers<'a, I>(headers: I, policy: CollisionPolicy) -> Vec<(String, Scalar)>
where
    I: IntoIterator<Item = (&'a str, &'a HeaderEntry)>,
{
    let headers = headers.into_iter();
    let mut out: Vec<(String, Scalar)> = Vec::with_capacity(headers.size_hint().0);

    for (name, entry) in headers {
        let key = target_key(name);
        let value = reduce_header(entry);

        match out.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => {
                warn!(
                    header = name,
                    target = key,
                    policy = %policy,
                    "header key collision"
                );
                if policy == CollisionPolicy::LastWins {
                    slot.1 = value;
                }
            }
            None => out.push((key.to_string(), value)),
        }
    }

    out
}
