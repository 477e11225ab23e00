//! Insertion-ordered string map

use std::fmt;

use ahash::AHashMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An ordered mapping from string keys to string values.
///
/// Keys keep the position of their first insertion. Inserting an existing
/// key replaces its value in place (last-write-wins), so the key order of a
/// map is the order in which keys were first seen.
///
/// Serializes as a JSON object with keys in insertion order.
#[derive(Clone, Default)]
pub struct Fields {
    /// Key/value pairs in first-seen order
    entries: Vec<(String, String)>,
    /// Fast lookup from key to position in `entries`
    index_map: AHashMap<String, usize>,
}

impl Fields {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty map with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index_map: AHashMap::with_capacity(capacity),
        }
    }

    /// Insert or overwrite a value, returning the previous value if any
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        let key = key.into();
        let value = value.into();

        if let Some(&idx) = self.index_map.get(&key) {
            return Some(std::mem::replace(&mut self.entries[idx].1, value));
        }

        self.index_map.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    /// Get the value for a key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.index_map
            .get(key)
            .map(|&idx| self.entries[idx].1.as_str())
    }

    /// Check whether a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.index_map.contains_key(key)
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map has no keys
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over key/value pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterate over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over values in key insertion order
    pub fn values(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|(_, v)| v.as_str())
    }
}

impl PartialEq for Fields {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl Eq for Fields {}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut fields = Fields::new();
        fields.extend(iter);
        fields
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for Fields {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl IntoIterator for Fields {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Fields {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FieldsVisitor;

        impl<'de> Visitor<'de> for FieldsVisitor {
            type Value = Fields;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of strings to strings")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Fields, A::Error> {
                let mut fields = Fields::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((k, v)) = access.next_entry::<String, String>()? {
                    fields.insert(k, v);
                }
                Ok(fields)
            }
        }

        deserializer.deserialize_map(FieldsVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut fields = Fields::new();
        assert_eq!(fields.insert("a", "1"), None);
        assert_eq!(fields.insert("b", "2"), None);
        assert_eq!(fields.insert("a", "3"), Some("1".to_string()));

        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("a"), Some("3"));
        assert_eq!(fields.keys().collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_missing_key() {
        let fields: Fields = [("a", "1")].into_iter().collect();
        assert_eq!(fields.get("z"), None);
        assert!(!fields.contains_key("z"));
        assert!(fields.contains_key("a"));
    }

    #[test]
    fn test_serializes_in_insertion_order() {
        let fields: Fields = [("zeta", "1"), ("alpha", "2"), ("mid", "3")]
            .into_iter()
            .collect();

        let json = serde_json::to_string(&fields).unwrap();
        assert_eq!(json, r#"{"zeta":"1","alpha":"2","mid":"3"}"#);
    }

    #[test]
    fn test_deserialize_keeps_document_order() {
        let fields: Fields = serde_json::from_str(r#"{"b":"x","a":"y","b":"z"}"#).unwrap();
        assert_eq!(fields.iter().collect::<Vec<_>>(), [("b", "z"), ("a", "y")]);
    }

    #[test]
    fn test_equality_after_overwrite() {
        let a: Fields = [("k", "v")].into_iter().collect();
        let mut b = Fields::new();
        b.insert("k", "old");
        b.insert("k", "v");
        assert_eq!(a, b);
    }
}
