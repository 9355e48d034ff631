//! `Invocation` — the context handed to a handler on dispatch.
//!
//! Carries the normalized path, the placeholder captures (coerced when the
//! router enables it), and the parsed query mapping. The query mapping is
//! external state supplied alongside the path; it is never merged into the
//! placeholder arguments and never coerced.

use crate::Coerced;
use std::collections::HashMap;
use url::form_urlencoded;

/// Parsed query string: each key maps to every value it appeared with.
pub type QueryMap = HashMap<String, Vec<String>>;

/// Parse a query string into a [`QueryMap`].
///
/// Accepts an optional leading `?`. Pairs are percent-decoded
/// (`application/x-www-form-urlencoded`, `+` as space). Keys without a
/// value, or with an empty one, are dropped.
///
/// # Example
///
/// ```
/// use routing::parse_query;
///
/// let q = parse_query("?bar=b+a%26r%2Bc&bar=two&flag");
/// assert_eq!(q["bar"], ["b a&r+c", "two"]);
/// assert!(!q.contains_key("flag"));
/// ```
#[must_use]
pub fn parse_query(query: &str) -> QueryMap {
    let raw = query.trim_start_matches('?');
    let mut map = QueryMap::new();
    for (name, value) in form_urlencoded::parse(raw.as_bytes()) {
        if value.is_empty() {
            continue;
        }
        map.entry(name.into_owned())
            .or_default()
            .push(value.into_owned());
    }
    map
}

/// One dispatched invocation, as seen by a handler.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    path: String,
    args: HashMap<String, Coerced>,
    query: QueryMap,
}

impl Invocation {
    pub(crate) fn new(path: String, args: HashMap<String, Coerced>, query: QueryMap) -> Self {
        Self { path, args, query }
    }

    /// The normalized path that was dispatched.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// All placeholder captures. Empty on an exact-match dispatch.
    #[must_use]
    pub fn args(&self) -> &HashMap<String, Coerced> {
        &self.args
    }

    /// One placeholder capture by name.
    #[must_use]
    pub fn arg(&self, name: &str) -> Option<&Coerced> {
        self.args.get(name)
    }

    /// The full query mapping.
    #[must_use]
    pub fn query(&self) -> &QueryMap {
        &self.query
    }

    /// First query value for `name`, if any.
    #[must_use]
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// All query values for `name`; empty if absent.
    #[must_use]
    pub fn query_values(&self, name: &str) -> &[String] {
        self.query.get(name).map_or(&[], Vec::as_slice)
    }
}
