//! Ordered map type for xCDN objects.
//!
//! This module provides [`Object`], a wrapper around [`IndexMap`] that keeps
//! object members in insertion order. xCDN requires key order to survive a full
//! parse → serialize cycle, and replacing an existing key must not move it.
//!
//! ## Examples
//!
//! ```rust
//! use xcdn::Object;
//!
//! let mut object = Object::new();
//! object.set("name", "demo");
//! object.set("version", "1.0.0");
//! object.set("name", "renamed");
//!
//! let keys: Vec<_> = object.keys().cloned().collect();
//! assert_eq!(keys, vec!["name", "version"]);
//! ```

use crate::access::{Items, Keys, MapLike, Values};
use crate::{Error, Node, Result};
use indexmap::IndexMap;

/// An insertion-ordered map of string keys to [`Node`]s.
///
/// Every mutating method accepts `impl Into<Node>`, so raw payloads are wrapped
/// into metadata-free nodes automatically.
///
/// # Examples
///
/// ```rust
/// use xcdn::{Node, Object, Value};
///
/// let mut object = Object::new();
/// object.set("first", 1);
/// object.set("second", Node::new(2).with_tag("pinned"));
///
/// assert_eq!(object.get("first").unwrap().value, Value::Int(1));
/// assert!(object.get("third").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Object(IndexMap<String, Node>);

impl Object {
    /// Creates an empty `Object`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xcdn::Object;
    ///
    /// let object = Object::new();
    /// assert!(object.is_empty());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Object(IndexMap::new())
    }

    /// Creates an empty `Object` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Object(IndexMap::with_capacity(capacity))
    }

    /// Returns the node for `key`, failing with [`Error::KeyNotFound`] when absent.
    pub fn get(&self, key: &str) -> Result<&Node> {
        self.0
            .get(key)
            .ok_or_else(|| Error::key_not_found(key, "object"))
    }

    pub fn get_mut(&mut self, key: &str) -> Result<&mut Node> {
        self.0
            .get_mut(key)
            .ok_or_else(|| Error::key_not_found(key, "object"))
    }

    /// Returns the node for `key`, or `default` when absent.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xcdn::{Node, Object};
    ///
    /// let object = Object::new();
    /// let fallback = Node::new("x");
    /// assert_eq!(object.get_or("missing", &fallback), &fallback);
    /// ```
    #[must_use]
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Node) -> &'a Node {
        self.0.get(key).unwrap_or(default)
    }

    /// Inserts or replaces the entry for `key`.
    ///
    /// A new key is appended at the end of iteration order; an existing key
    /// keeps its position. The replaced node, if any, is returned.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xcdn::Object;
    ///
    /// let mut object = Object::new();
    /// assert!(object.set("key", 42).is_none());
    /// assert!(object.set("key", 43).is_some());
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Node>) -> Option<Node> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes the entry for `key`, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.0.shift_remove(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
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

    /// Returns an iterator over the keys, in insertion order.
    pub fn keys(&self) -> Keys<'_> {
        self.0.keys()
    }

    /// Returns an iterator over the nodes, in insertion order.
    pub fn values(&self) -> Values<'_> {
        self.0.values()
    }

    pub fn values_mut(&mut self) -> indexmap::map::ValuesMut<'_, String, Node> {
        self.0.values_mut()
    }

    /// Returns an iterator over `(key, node)` pairs, in insertion order.
    pub fn items(&self) -> Items<'_> {
        self.0.iter()
    }

    pub fn iter(&self) -> Items<'_> {
        self.0.iter()
    }
}

impl MapLike for Object {
    fn get(&self, key: &str) -> Result<&Node> {
        Object::get(self, key)
    }

    fn get_mut(&mut self, key: &str) -> Result<&mut Node> {
        Object::get_mut(self, key)
    }

    fn get_or<'a>(&'a self, key: &str, default: &'a Node) -> &'a Node {
        Object::get_or(self, key, default)
    }

    fn set(&mut self, key: String, node: Node) -> Option<Node> {
        Object::set(self, key, node)
    }

    fn contains(&self, key: &str) -> bool {
        Object::contains(self, key)
    }

    fn keys(&self) -> Keys<'_> {
        Object::keys(self)
    }

    fn values(&self) -> Values<'_> {
        Object::values(self)
    }

    fn items(&self) -> Items<'_> {
        Object::items(self)
    }

    fn len(&self) -> usize {
        Object::len(self)
    }
}

impl IntoIterator for Object {
    type Item = (String, Node);
    type IntoIter = indexmap::map::IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Node);
    type IntoIter = Items<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<(String, Node)> for Object {
    fn from_iter<T: IntoIterator<Item = (String, Node)>>(iter: T) -> Self {
        Object(IndexMap::from_iter(iter))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    #[test]
    fn test_insertion_order_preserved() {
        let mut object = Object::new();
        for key in ["zeta", "alpha", "mid"] {
            object.set(key, key);
        }
        let keys: Vec<_> = object.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_replace_keeps_position() {
        let mut object = Object::new();
        object.set("a", 1);
        object.set("b", 2);
        object.set("c", 3);

        let previous = object.set("a", 10).unwrap();
        assert_eq!(previous.value, Value::Int(1));

        let items: Vec<_> = object
            .items()
            .map(|(k, n)| (k.as_str(), n.value.clone()))
            .collect();
        assert_eq!(
            items,
            vec![("a", Value::Int(10)), ("b", Value::Int(2)), ("c", Value::Int(3))]
        );
    }

    #[test]
    fn test_remove_keeps_remaining_order() {
        let mut object: Object = ["a", "b", "c"]
            .into_iter()
            .map(|k| (k.to_string(), Node::new(k)))
            .collect();
        assert!(object.remove("b").is_some());
        assert!(object.remove("b").is_none());
        let keys: Vec<_> = object.keys().cloned().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_strict_and_default_lookup() {
        let mut object = Object::new();
        object.set("present", true);

        assert!(object.contains("present"));
        assert!(!object.contains("absent"));
        assert!(matches!(
            object.get("absent"),
            Err(Error::KeyNotFound { ref key, .. }) if key == "absent"
        ));

        let fallback = Node::new("x");
        assert_eq!(object.get_or("absent", &fallback).value, Value::from("x"));
        assert_eq!(object.get_or("present", &fallback).value, Value::Bool(true));
    }

    #[test]
    fn test_map_like_dispatch() {
        let mut object = Object::new();
        let map: &mut dyn MapLike = &mut object;
        map.set("k".to_string(), Node::new(1));
        assert_eq!(map.len(), 1);
        assert!(map.contains("k"));
        assert_eq!(map.keys().count(), 1);
    }
}
