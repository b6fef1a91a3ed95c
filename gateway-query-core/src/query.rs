//! Decoded query string values.

use std::collections::HashMap;

/// Query string values grouped by key.
///
/// Values of a repeated key keep their order of appearance.
///
/// # Example
///
/// ```
/// use gateway_query_core::QueryValues;
///
/// let values: QueryValues = [("id", "1"), ("tag", "a"), ("tag", "b")].into_iter().collect();
///
/// assert_eq!(values.get("tag"), Some(&["a".to_string(), "b".to_string()][..]));
/// assert_eq!(values.len(), 2);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryValues {
    entries: HashMap<String, Vec<String>>,
}

impl QueryValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value to a key.
    pub fn append<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) {
        self.entries.entry(key.into()).or_default().push(value.into());
    }

    /// Set all values of a key, replacing earlier ones.
    pub fn insert<K: Into<String>>(&mut self, key: K, values: Vec<String>) {
        self.entries.insert(key.into(), values);
    }

    /// Get the values of a key.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// Iterate over keys and their values, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        values.extend(iter);
        values
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for QueryValues {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.append(key, value);
        }
    }
}
