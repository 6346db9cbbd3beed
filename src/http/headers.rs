//! HTTP header map with case-insensitive name lookup.

use std::fmt;

/// An order-preserving, case-insensitive HTTP header map.
///
/// Header names compare case-insensitively per RFC 9110 §5; insertion order
/// is preserved when serializing a response.
///
/// # Examples
///
/// ```
/// use webroot::http::Headers;
///
/// let mut headers = Headers::new();
/// headers.insert("Content-Type", "text/html");
/// assert_eq!(headers.get("content-type"), Some("text/html"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    /// Creates an empty header map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a header map with room for `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    /// Appends a header entry. Duplicate names are preserved.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Returns the first value for `name` (case-insensitive), or `None`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if at least one entry with `name` exists.
    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(name))
    }

    /// Returns the number of header entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over all `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, value) in &self.entries {
            write!(f, "{name}: {value}\r\n")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_get() {
        let mut h = Headers::new();
        h.insert("Content-Length", "12");
        assert_eq!(h.get("content-length"), Some("12"));
        assert_eq!(h.get("CONTENT-LENGTH"), Some("12"));
    }

    #[test]
    fn first_value_wins() {
        let mut h = Headers::new();
        h.insert("X-Tag", "a");
        h.insert("X-Tag", "b");
        assert_eq!(h.get("x-tag"), Some("a"));
        assert_eq!(h.len(), 2);
    }

    #[test]
    fn contains_and_empty() {
        let mut h = Headers::new();
        assert!(h.is_empty());
        h.insert("Host", "localhost");
        assert!(h.contains("host"));
        assert!(!h.contains("x-missing"));
    }
}
