//! Ordered header multimap shared by transport and application values.
//!
//! Names keep the case they arrived with; lookups ignore ASCII case, as
//! HTTP field names are case-insensitive.

use axum::http::HeaderMap;

/// Headers in received order, one entry per distinct name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBag {
    entries: Vec<(String, Vec<String>)>,
}

impl HeaderBag {
    /// Create an empty header set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy an `http` header map. Values that are not visible ASCII are
    /// decoded lossily.
    pub fn from_http(headers: &HeaderMap) -> Self {
        let mut bag = Self::new();
        for (name, value) in headers {
            bag.append(name.as_str(), String::from_utf8_lossy(value.as_bytes()));
        }
        bag
    }

    /// Append a value, merging into an entry with the exact same name.
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((name, vec![value])),
        }
    }

    /// All values for `name`, case-insensitively.
    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, values)| values.as_slice())
    }

    /// First value for `name`.
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate entries in received order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for HeaderBag
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (name, value) in iter {
            bag.append(name, value);
        }
        bag
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_ignores_case() {
        let bag: HeaderBag = [("Content-Type", "text/plain")].into_iter().collect();
        assert_eq!(bag.first("content-type"), Some("text/plain"));
        assert!(bag.contains("CONTENT-TYPE"));
        assert!(!bag.contains("Host"));
    }

    #[test]
    fn test_preserves_order_and_case() {
        let bag: HeaderBag = [
            ("X-B", "1"),
            ("X-A", "2"),
            ("X-B", "3"),
        ]
        .into_iter()
        .collect();

        let names: Vec<&str> = bag.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["X-B", "X-A"]);
        assert_eq!(bag.get("x-b").unwrap(), ["1".to_string(), "3".to_string()]);
        assert_eq!(bag.len(), 2);
    }
}
