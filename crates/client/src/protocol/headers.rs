//! Ordered, case-insensitive, multi-valued header list.
//!
//! `http::HeaderMap` lowercases names and does not promise iteration order, while
//! this client has to echo headers back to the wire exactly in the order they
//! were set and with the casing the peer used. [`Headers`] keeps one entry per
//! distinct (case-insensitive) name, in first-insertion order, and accumulates
//! repeated values under that entry.

use std::borrow::Cow;
use std::fmt;

/// Separator used when a multi-valued header is read as a single value.
pub const VALUE_SEPARATOR: &str = ", ";

#[derive(Debug, Clone, PartialEq, Eq)]
struct HeaderEntry {
    name: String,
    values: Vec<String>,
}

/// An ordered multimap from header name to values.
///
/// Lookups ignore ASCII case, so `headers.get("content-type")` and
/// `headers.get(http::header::CONTENT_TYPE)` both find a `Content-Type` entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<HeaderEntry>,
}

impl Headers {
    pub fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Replaces every value of `name` with `value`.
    ///
    /// An existing entry keeps its position and its original casing.
    pub fn set<N: AsRef<str>, V: Into<String>>(&mut self, name: N, value: V) {
        let value = value.into();
        match self.position(name.as_ref()) {
            Some(index) => self.entries[index].values = vec![value],
            None => self.entries.push(HeaderEntry { name: name.as_ref().to_string(), values: vec![value] }),
        }
    }

    /// Adds `value` to `name`, creating the entry when it is missing.
    pub fn append<N: AsRef<str>, V: Into<String>>(&mut self, name: N, value: V) {
        let value = value.into();
        match self.position(name.as_ref()) {
            Some(index) => self.entries[index].values.push(value),
            None => self.entries.push(HeaderEntry { name: name.as_ref().to_string(), values: vec![value] }),
        }
    }

    /// Returns the value of `name`, multiple values joined with `", "`.
    pub fn get<N: AsRef<str>>(&self, name: N) -> Option<Cow<'_, str>> {
        let entry = &self.entries[self.position(name.as_ref())?];
        match entry.values.as_slice() {
            [single] => Some(Cow::Borrowed(single.as_str())),
            values => Some(Cow::Owned(values.join(VALUE_SEPARATOR))),
        }
    }

    /// Returns every value of `name` in insertion order; empty when absent.
    pub fn get_all<N: AsRef<str>>(&self, name: N) -> &[String] {
        match self.position(name.as_ref()) {
            Some(index) => &self.entries[index].values,
            None => &[],
        }
    }

    pub fn contains<N: AsRef<str>>(&self, name: N) -> bool {
        self.position(name.as_ref()).is_some()
    }

    /// Removes `name`, returning whether it was present.
    pub fn remove<N: AsRef<str>>(&mut self, name: N) -> bool {
        match self.position(name.as_ref()) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Iterates entries as `(name, values)` in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|entry| (entry.name.as_str(), entry.values.as_slice()))
    }

    /// Number of distinct header names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries.iter().position(|entry| entry.name.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Headers {
    /// Writes one `Name: Value\r\n` line per distinct name.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in self.iter() {
            write!(f, "{name}: {}\r\n", values.join(VALUE_SEPARATOR))?;
        }
        Ok(())
    }
}

impl<N: AsRef<str>, V: Into<String>> FromIterator<(N, V)> for Headers {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.append(name, value);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::header::CONTENT_TYPE;

    #[test]
    fn lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.set("Content-Type", "text/plain");

        assert_eq!(headers.get("content-type").as_deref(), Some("text/plain"));
        assert_eq!(headers.get(CONTENT_TYPE).as_deref(), Some("text/plain"));
        assert!(headers.contains("CONTENT-TYPE"));
        assert!(headers.get("Content-Length").is_none());
    }

    #[test]
    fn repeated_values_join() {
        let mut headers = Headers::new();
        headers.append("Accept", "text/html");
        headers.append("accept", "application/json");

        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("Accept").as_deref(), Some("text/html, application/json"));
        assert_eq!(headers.get_all("ACCEPT"), &["text/html".to_string(), "application/json".to_string()]);
    }

    #[test]
    fn set_replaces_in_place() {
        let mut headers = Headers::new();
        headers.set("one", "two");
        headers.set("three", "four");
        headers.append("one", "extra");
        headers.set("ONE", "five");

        let names: Vec<&str> = headers.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["one", "three"]);
        assert_eq!(headers.get("one").as_deref(), Some("five"));
    }

    #[test]
    fn display_preserves_order() {
        let headers: Headers = [("one", "two"), ("three", "four")].into_iter().collect();
        assert_eq!(headers.to_string(), "one: two\r\nthree: four\r\n");
    }

    #[test]
    fn remove_entry() {
        let mut headers = Headers::new();
        headers.set("Transfer-Encoding", "chunked");

        assert!(headers.remove("transfer-encoding"));
        assert!(!headers.remove("transfer-encoding"));
        assert!(headers.is_empty());
        assert!(headers.get_all("Transfer-Encoding").is_empty());
    }
}
