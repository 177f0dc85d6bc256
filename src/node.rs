//! Nodes: values enriched with `#tags` and `@annotations`.
//!
//! A [`Node`] owns exactly one [`Value`] plus its metadata, and forwards the
//! collection operations a caller usually wants to run on "whatever is inside":
//!
//! - positional/keyed access, membership, length and iteration go to the
//!   value's container operations and fail with [`Error::TypeMismatch`] on
//!   the wrong kind
//! - `get_or`, `keys`, `values` and `items` go through [`MapLike`] and
//!   `append` through [`SeqLike`]; other variants fail with
//!   [`Error::UnsupportedOperation`]
//!
//! ```rust
//! use xcdn::{Error, Node, Object, Value};
//!
//! let mut config = Node::new(Object::new());
//! config.set("name", "demo").unwrap();
//! config.set("ids", Value::from(vec![Node::new(1), Node::new(2)])).unwrap();
//!
//! assert_eq!(config.get("name").unwrap().value, "demo");
//! assert_eq!(config.get("ids").unwrap().len().unwrap(), 2);
//! assert!(matches!(config.append(3), Err(Error::UnsupportedOperation { .. })));
//! ```

use crate::access::{IntoKey, Items, Keys, MapLike, Members, Values};
use crate::{Array, Error, Object, Result, Value};
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// A bare metadata label such as `#deprecated`.
///
/// Tags compare and hash by name only.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Tag {
    pub name: String,
}

impl Tag {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Tag { name: name.into() }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.name)
    }
}

/// A named metadata label with ordered arguments, such as `@mime("image/png")`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Annotation {
    pub name: String,
    pub args: Vec<Value>,
}

impl Annotation {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Annotation {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Appends an argument, builder style.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<Value>) -> Self {
        self.args.push(arg.into());
        self
    }
}

impl fmt::Display for Annotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.args.is_empty() {
            let args: Vec<_> = self.args.iter().map(|a| a.to_string()).collect();
            write!(f, "({})", args.join(", "))?;
        }
        Ok(())
    }
}

/// A [`Value`] together with its ordered tags and annotations.
///
/// # Examples
///
/// ```rust
/// use xcdn::{Annotation, Node};
///
/// let node = Node::new("aGVsbG8=")
///     .with_tag("secret")
///     .with_annotation(Annotation::new("mime").with_arg("text/plain"));
///
/// assert!(node.has_tag("secret"));
/// assert_eq!(node.annotation("mime").unwrap().args.len(), 1);
/// assert_eq!(node.to_string(), "aGVsbG8=");
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Node {
    pub tags: Vec<Tag>,
    pub annotations: Vec<Annotation>,
    pub value: Value,
}

impl Node {
    /// Wraps a value in a node without metadata.
    ///
    /// This is the construction path behind every `From<payload> for Node`
    /// conversion, so containers accept raw payloads wherever they accept nodes.
    #[must_use]
    pub fn new(value: impl Into<Value>) -> Self {
        Node {
            tags: Vec::new(),
            annotations: Vec::new(),
            value: value.into(),
        }
    }

    #[must_use]
    pub fn with_tag(mut self, name: impl Into<String>) -> Self {
        self.tags.push(Tag::new(name));
        self
    }

    #[must_use]
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    #[must_use]
    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|t| t.name == name)
    }

    /// First annotation named `name`, if any.
    #[must_use]
    pub fn annotation(&self, name: &str) -> Option<&Annotation> {
        self.annotations.iter().find(|a| a.name == name)
    }

    pub fn get<'k>(&self, key: impl IntoKey<'k>) -> Result<&Node> {
        self.value.get(key)
    }

    pub fn get_mut<'k>(&mut self, key: impl IntoKey<'k>) -> Result<&mut Node> {
        self.value.get_mut(key)
    }

    /// Replaces an array slot or sets an object entry, wrapping raw payloads.
    pub fn set<'k>(&mut self, key: impl IntoKey<'k>, value: impl Into<Node>) -> Result<()> {
        self.value.set(key, value)
    }

    pub fn contains_key<'k>(&self, key: impl IntoKey<'k>) -> Result<bool> {
        self.value.contains_key(key)
    }

    pub fn len(&self) -> Result<usize> {
        self.value.len()
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.value.is_empty()
    }

    pub fn iter(&self) -> Result<Members<'_>> {
        self.value.iter()
    }

    /// Object lookup with a fallback node.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use xcdn::{Node, Object};
    ///
    /// let config = Node::new(Object::new());
    /// let fallback = Node::new("x");
    /// assert_eq!(config.get_or("missing", &fallback).unwrap().value, "x");
    /// assert!(Node::new(1).get_or("missing", &fallback).is_err());
    /// ```
    pub fn get_or<'a>(&'a self, key: &str, default: &'a Node) -> Result<&'a Node> {
        Ok(self.map_like("get_or")?.get_or(key, default))
    }

    pub fn keys(&self) -> Result<Keys<'_>> {
        Ok(self.map_like("keys")?.keys())
    }

    pub fn values(&self) -> Result<Values<'_>> {
        Ok(self.map_like("values")?.values())
    }

    pub fn items(&self) -> Result<Items<'_>> {
        Ok(self.map_like("items")?.items())
    }

    /// Appends to an array value, wrapping raw payloads.
    pub fn append(&mut self, value: impl Into<Node>) -> Result<()> {
        let variant = self.value.type_name();
        self.value
            .as_seq_like_mut()
            .ok_or_else(|| Error::unsupported_operation(variant, "append"))?
            .append(value.into());
        Ok(())
    }

    fn map_like(&self, operation: &str) -> Result<&dyn MapLike> {
        self.value
            .as_map_like()
            .ok_or_else(|| Error::unsupported_operation(self.value.type_name(), operation))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.value, f)
    }
}

/// Nodes serialize as their bare value; tags and annotations have no
/// counterpart in the serde data model.
impl Serialize for Node {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Node::new)
    }
}

impl From<Value> for Node {
    fn from(value: Value) -> Self {
        Node::new(value)
    }
}

macro_rules! node_from_payload {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                fn from(value: $ty) -> Self {
                    Node::new(value)
                }
            }
        )*
    };
}

node_from_payload!(
    bool,
    i8,
    i16,
    i32,
    i64,
    u8,
    u16,
    u32,
    f32,
    f64,
    BigDecimal,
    String,
    &str,
    Vec<u8>,
    &[u8],
    DateTime<FixedOffset>,
    DateTime<Utc>,
    Uuid,
    Array,
    Object,
);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_config() -> Node {
        let mut ids = Array::new();
        for id in 1..=3 {
            ids.append(id);
        }
        let mut config = Object::new();
        config.set("name", "demo");
        config.set("ids", ids);
        Node::new(config)
    }

    #[test]
    fn test_default_node_is_null() {
        let node = Node::default();
        assert!(node.value.is_null());
        assert!(node.tags.is_empty());
        assert!(node.annotations.is_empty());
    }

    #[test]
    fn test_delegated_access() {
        let config = sample_config();
        assert_eq!(config.get("name").unwrap().value, "demo");
        assert_eq!(config.get("ids").unwrap().get(0).unwrap().value, 1);
        assert_eq!(config.get("ids").unwrap().len().unwrap(), 3);
        assert!(!config.contains_key("missing").unwrap());
        assert!(config.contains_key("name").unwrap());
    }

    #[test]
    fn test_type_mismatch_policy() {
        let config = sample_config();
        let ids = config.get("ids").unwrap();
        assert!(matches!(ids.get("x"), Err(Error::TypeMismatch { .. })));
        assert!(matches!(config.get(0), Err(Error::TypeMismatch { .. })));

        let scalar = Node::new(7);
        assert!(matches!(scalar.len(), Err(Error::TypeMismatch { .. })));
        assert!(matches!(scalar.iter(), Err(Error::TypeMismatch { .. })));
    }

    #[test]
    fn test_map_only_operations() {
        let config = sample_config();
        let keys: Vec<_> = config.keys().unwrap().cloned().collect();
        assert_eq!(keys, vec!["name", "ids"]);
        assert_eq!(config.values().unwrap().count(), 2);
        assert_eq!(config.items().unwrap().next().unwrap().0, "name");

        let ids = config.get("ids").unwrap();
        assert!(matches!(
            ids.keys(),
            Err(Error::UnsupportedOperation { ref variant, .. }) if variant == "Array"
        ));
        let fallback = Node::new("x");
        assert!(matches!(
            ids.get_or("k", &fallback),
            Err(Error::UnsupportedOperation { .. })
        ));
    }

    #[test]
    fn test_append_only_on_arrays() {
        let mut config = sample_config();
        config.get_mut("ids").unwrap().append(4).unwrap();
        assert_eq!(config.get("ids").unwrap().len().unwrap(), 4);

        assert!(matches!(
            config.append(1),
            Err(Error::UnsupportedOperation { ref operation, .. }) if operation == "append"
        ));
        assert_eq!(config.len().unwrap(), 2);
    }

    #[test]
    fn test_set_auto_wraps() {
        let mut config = sample_config();
        config.set("name", "renamed").unwrap();
        let explicit = Node::new(Value::from("renamed"));
        assert_eq!(config.get("name").unwrap(), &explicit);

        let ids = config.get_mut("ids").unwrap();
        ids.set(0, 10).unwrap();
        assert!(matches!(
            ids.set(9, 10),
            Err(Error::IndexOutOfRange { index: 9, len: 3 })
        ));
    }

    #[test]
    fn test_iteration_over_members() {
        let config = sample_config();
        let ids = config.get("ids").unwrap();
        let values: Vec<_> = ids.iter().unwrap().map(|(_, n)| n.value.clone()).collect();
        assert_eq!(values, vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    }

    #[test]
    fn test_tag_equality_by_name() {
        use std::collections::HashSet;
        let tags: HashSet<_> = [Tag::new("a"), Tag::new("a"), Tag::new("b")]
            .into_iter()
            .collect();
        assert_eq!(tags.len(), 2);
    }

    #[test]
    fn test_annotation_display() {
        let annotation = Annotation::new("range").with_arg(1).with_arg(10);
        assert_eq!(annotation.to_string(), "@range(1, 10)");
        assert_eq!(Annotation::new("flag").to_string(), "@flag");
    }
}
