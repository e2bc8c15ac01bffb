use std::collections::HashMap;
use std::str::FromStr;

/// String-valued captures taken from the matched URI path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams {
    inner: HashMap<String, String>,
}

impl PathParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: &str, value: String) {
        self.inner.insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner.get(name).map(String::as_str)
    }

    /// Parses a capture into any `FromStr` type. `None` when the capture is
    /// missing or fails to parse.
    pub fn get_as<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|value| value.parse().ok())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }
}

impl From<HashMap<String, String>> for PathParams {
    fn from(inner: HashMap<String, String>) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typed_lookup_parses_values() {
        let mut params = PathParams::new();
        params.insert("id", "42".to_string());
        params.insert("name", "widget".to_string());

        assert_eq!(params.get_as::<u64>("id"), Some(42));
        assert_eq!(params.get_as::<u64>("name"), None);
        assert_eq!(params.get("name"), Some("widget"));
        assert_eq!(params.get("missing"), None);
    }
}
