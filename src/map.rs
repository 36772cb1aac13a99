//! Ordered data mapping for template data.
//!
//! [`DataMap`] wraps an [`IndexMap`] so that field order follows insertion
//! order. Order never changes rendering, but it keeps `Debug` output and
//! serialized data predictable.
//!
//! ## Examples
//!
//! ```rust
//! use sectionfmt::{DataMap, Value};
//!
//! let mut map = DataMap::new();
//! map.insert("name".to_string(), Value::from("Alice"));
//! map.insert("age".to_string(), Value::from(30));
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.get("age").and_then(|v| v.as_str()), Some("30"));
//! ```

use crate::Value;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One mapping of field names to values: the root data or a single section row.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataMap(IndexMap<String, Value>);

impl DataMap {
    /// Creates an empty `DataMap`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sectionfmt::DataMap;
    ///
    /// let map = DataMap::new();
    /// assert!(map.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        DataMap(IndexMap::new())
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        DataMap(IndexMap::with_capacity(capacity))
    }

    /// Inserts a key-value pair into the map.
    ///
    /// If the map already contained this key, the old value is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sectionfmt::{DataMap, Value};
    ///
    /// let mut map = DataMap::new();
    /// assert!(map.insert("key".to_string(), Value::from("a")).is_none());
    /// assert!(map.insert("key".to_string(), Value::from("b")).is_some());
    /// ```
    pub fn insert(&mut self, key: String, value: Value) -> Option<Value> {
        self.0.insert(key, value)
    }

    /// Returns a reference to the value stored under `key`, empty or not.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the keys of the map, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over the values of the map, in insertion order.
    pub fn values(&self) -> indexmap::map::Values<'_, String, Value> {
        self.0.values()
    }

    /// Returns an iterator over the key-value pairs of the map, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, Value> {
        self.0.iter()
    }
}

impl From<HashMap<String, Value>> for DataMap {
    fn from(map: HashMap<String, Value>) -> Self {
        DataMap(map.into_iter().collect())
    }
}

impl From<DataMap> for HashMap<String, Value> {
    fn from(map: DataMap) -> Self {
        map.0.into_iter().collect()
    }
}

impl IntoIterator for DataMap {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a DataMap {
    type Item = (&'a String, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Value)> for DataMap {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        DataMap(IndexMap::from_iter(iter))
    }
}

impl Extend<(String, Value)> for DataMap {
    fn extend<T: IntoIterator<Item = (String, Value)>>(&mut self, iter: T) {
        self.0.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order() {
        let mut map = DataMap::new();
        map.insert("b".to_string(), Value::from("1"));
        map.insert("a".to_string(), Value::from("2"));
        let keys: Vec<_> = map.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
    }

    #[test]
    fn test_extend_overrides_existing_keys() {
        let mut map: DataMap = vec![
            ("x".to_string(), Value::from("old")),
            ("y".to_string(), Value::from("kept")),
        ]
        .into_iter()
        .collect();
        map.extend(vec![("x".to_string(), Value::from("new"))]);

        assert_eq!(map.get("x").and_then(|v| v.as_str()), Some("new"));
        assert_eq!(map.get("y").and_then(|v| v.as_str()), Some("kept"));
        assert_eq!(map.len(), 2);
    }
}
