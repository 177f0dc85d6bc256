//! Capability interfaces and keys for navigating xCDN containers.
//!
//! Two narrow, object-safe traits describe what a container can do:
//!
//! - [`MapLike`]: keyed access in insertion order (implemented by [`Object`])
//! - [`SeqLike`]: positional access and appends (implemented by [`Array`])
//!
//! A [`Value`] hands out a capability view only when its active variant
//! implements it (see [`Value::as_map_like`] and [`Value::as_seq_like`]), which
//! is how [`Node`] decides between delegating and failing with
//! [`Error::UnsupportedOperation`].
//!
//! [`Key`] is the single key type accepted by every indexing entry point: a
//! position for arrays and top-level document values, or a name for objects.
//!
//! ```rust
//! use xcdn::{Key, MapLike, Object, Value};
//!
//! let mut object = Object::new();
//! object.set("port", 8080);
//!
//! let value = Value::Object(object);
//! let map = value.as_map_like().unwrap();
//! assert!(map.contains("port"));
//! assert_eq!(Key::from("port"), Key::Name("port"));
//! ```
//!
//! [`Object`]: crate::Object
//! [`Array`]: crate::Array
//! [`Value`]: crate::Value
//! [`Value::as_map_like`]: crate::Value::as_map_like
//! [`Value::as_seq_like`]: crate::Value::as_seq_like
//! [`Node`]: crate::Node
//! [`Error::UnsupportedOperation`]: crate::Error::UnsupportedOperation

use crate::{Error, Node, Result, Value};
use std::fmt;

/// Iterator over object keys, in insertion order.
pub type Keys<'a> = indexmap::map::Keys<'a, String, Node>;

/// Iterator over object nodes, in insertion order.
pub type Values<'a> = indexmap::map::Values<'a, String, Node>;

/// Iterator over `(key, node)` pairs, in insertion order.
pub type Items<'a> = indexmap::map::Iter<'a, String, Node>;

/// Keyed access to an insertion-ordered collection of nodes.
pub trait MapLike {
    /// Returns the node stored under `key`, or [`Error::KeyNotFound`].
    fn get(&self, key: &str) -> Result<&Node>;

    fn get_mut(&mut self, key: &str) -> Result<&mut Node>;

    /// Returns the node stored under `key`, or `default` when absent.
    fn get_or<'a>(&'a self, key: &str, default: &'a Node) -> &'a Node;

    /// Inserts or replaces an entry, returning the replaced node.
    ///
    /// New keys go to the end of iteration order; replaced keys keep their position.
    fn set(&mut self, key: String, node: Node) -> Option<Node>;

    fn contains(&self, key: &str) -> bool;

    fn keys(&self) -> Keys<'_>;

    fn values(&self) -> Values<'_>;

    fn items(&self) -> Items<'_>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Positional access to an ordered sequence of nodes.
pub trait SeqLike {
    /// Returns the node at `index`, or [`Error::IndexOutOfRange`].
    fn get(&self, index: usize) -> Result<&Node>;

    fn get_mut(&mut self, index: usize) -> Result<&mut Node>;

    /// Replaces the node at `index`, returning the previous one.
    fn set(&mut self, index: usize, node: Node) -> Result<Node>;

    fn append(&mut self, node: Node);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn iter(&self) -> std::slice::Iter<'_, Node>;
}

/// A container key: a position or a name.
///
/// # Examples
///
/// ```rust
/// use xcdn::{Key, Value};
/// use std::convert::TryFrom;
///
/// assert_eq!(Key::from(2usize), Key::Index(2));
/// assert_eq!(Key::from("name"), Key::Name("name"));
///
/// let dynamic = Value::from("name");
/// assert_eq!(Key::try_from(&dynamic).unwrap(), Key::Name("name"));
/// assert!(Key::try_from(&Value::Bool(true)).is_err());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key<'a> {
    Index(usize),
    Name(&'a str),
}

impl fmt::Display for Key<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{}", i),
            Key::Name(name) => write!(f, "{}", name),
        }
    }
}

impl From<usize> for Key<'_> {
    fn from(index: usize) -> Self {
        Key::Index(index)
    }
}

impl<'a> From<&'a str> for Key<'a> {
    fn from(name: &'a str) -> Self {
        Key::Name(name)
    }
}

impl<'a> From<&'a String> for Key<'a> {
    fn from(name: &'a String) -> Self {
        Key::Name(name.as_str())
    }
}

/// Conversion into a [`Key`], accepted by every indexing entry point.
///
/// Implemented for `usize` positions, `str`/`String` names, and [`Key`] itself,
/// so `node.get(0)` and `node.get("name")` both resolve without annotations.
pub trait IntoKey<'a> {
    fn into_key(self) -> Key<'a>;
}

impl<'a> IntoKey<'a> for Key<'a> {
    fn into_key(self) -> Key<'a> {
        self
    }
}

impl<'a> IntoKey<'a> for usize {
    fn into_key(self) -> Key<'a> {
        Key::Index(self)
    }
}

impl<'a> IntoKey<'a> for &'a str {
    fn into_key(self) -> Key<'a> {
        Key::Name(self)
    }
}

impl<'a> IntoKey<'a> for &'a String {
    fn into_key(self) -> Key<'a> {
        Key::Name(self.as_str())
    }
}

impl<'a> TryFrom<&'a Value> for Key<'a> {
    type Error = Error;

    fn try_from(value: &'a Value) -> Result<Self> {
        match value {
            Value::Int(i) => usize::try_from(*i)
                .map(Key::Index)
                .map_err(|_| Error::invalid_key_type("negative Int")),
            Value::String(s) => Ok(Key::Name(s)),
            other => Err(Error::invalid_key_type(other.type_name())),
        }
    }
}

/// Iterator over the members of an array or object.
///
/// Arrays yield `(Key::Index(i), node)` in positional order; objects yield
/// `(Key::Name(key), node)` in insertion order.
#[derive(Clone, Debug)]
pub enum Members<'a> {
    Array(std::iter::Enumerate<std::slice::Iter<'a, Node>>),
    Object(Items<'a>),
}

impl<'a> Iterator for Members<'a> {
    type Item = (Key<'a>, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Members::Array(iter) => iter.next().map(|(i, node)| (Key::Index(i), node)),
            Members::Object(iter) => iter.next().map(|(k, node)| (Key::Name(k.as_str()), node)),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Members::Array(iter) => iter.size_hint(),
            Members::Object(iter) => iter.size_hint(),
        }
    }
}

impl ExactSizeIterator for Members<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Array, Object};

    #[test]
    fn test_key_from_dynamic_value() {
        assert_eq!(Key::try_from(&Value::Int(0)).unwrap(), Key::Index(0));
        assert!(matches!(
            Key::try_from(&Value::Int(-1)),
            Err(Error::InvalidKeyType(_))
        ));
        assert!(matches!(
            Key::try_from(&Value::Float(1.0)),
            Err(Error::InvalidKeyType(ref found)) if found == "Float"
        ));
    }

    #[test]
    fn test_capability_views() {
        let mut array = Array::new();
        array.append(1);
        let value = Value::Array(array);
        assert!(value.as_map_like().is_none());

        let seq = value.as_seq_like().unwrap();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.get(0).unwrap().value, Value::Int(1));
        assert!(seq.get(1).is_err());
    }

    #[test]
    fn test_members_yield_keys_and_positions() {
        let mut object = Object::new();
        object.set("b", 2);
        object.set("a", 1);
        let value = Value::Object(object);

        let keys: Vec<_> = value.iter().unwrap().map(|(key, _)| key).collect();
        assert_eq!(keys, vec![Key::Name("b"), Key::Name("a")]);
        assert_eq!(value.iter().unwrap().len(), 2);
    }
}
