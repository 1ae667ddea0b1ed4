//! Query-string construction for list and lookup endpoints.
//!
//! # Design
//! Pairs accumulate in insertion order and absent values are dropped
//! before encoding, so `?page=2&limit=10` comes out exactly as the caller
//! spelled it and an all-absent parameter set collapses to the empty
//! string rather than a dangling `?`. Encoding is
//! `application/x-www-form-urlencoded` via the `url` crate, matching what
//! the backend's query parser expects.

use url::form_urlencoded;

/// A scalar usable as a query-string value.
///
/// `to_query` returns `None` when the value should be treated as absent;
/// the blanket rule is that empty strings are absent (optional text
/// filters left blank by a form are not sent at all).
pub trait QueryValue {
    fn to_query(&self) -> Option<String>;
}

impl QueryValue for &str {
    fn to_query(&self) -> Option<String> {
        if self.is_empty() {
            None
        } else {
            Some((*self).to_string())
        }
    }
}

impl QueryValue for String {
    fn to_query(&self) -> Option<String> {
        self.as_str().to_query()
    }
}

impl QueryValue for u32 {
    fn to_query(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl QueryValue for i64 {
    fn to_query(&self) -> Option<String> {
        Some(self.to_string())
    }
}

impl QueryValue for bool {
    fn to_query(&self) -> Option<String> {
        Some(self.to_string())
    }
}

/// Ordered builder for a URL query string.
#[derive(Debug, Default)]
pub struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `key=value` when the value is present and non-empty;
    /// otherwise the pair is omitted entirely.
    pub fn param<V: QueryValue>(mut self, key: &str, value: Option<V>) -> Self {
        if let Some(text) = value.and_then(|v| v.to_query()) {
            self.pairs.push((key.to_string(), text));
        }
        self
    }

    /// Renders the accumulated pairs as `?k=v&...`, percent-encoded, or
    /// the empty string when nothing survived.
    pub fn build(&self) -> String {
        if self.pairs.is_empty() {
            return String::new();
        }

        let mut serializer = form_urlencoded::Serializer::new(String::new());
        for (key, value) in &self.pairs {
            serializer.append_pair(key, value);
        }
        format!("?{}", serializer.finish())
    }
}
