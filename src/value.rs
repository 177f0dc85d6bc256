//! Dynamic value representation for xCDN data.
//!
//! This module provides the [`Value`] enum, the closed tagged union over the
//! twelve xCDN value kinds. Scalars that look alike in text stay distinct in
//! memory: `3` is [`Value::Int`], `3.0` is [`Value::Float`] and `d"3.0"` is
//! [`Value::Decimal`]; `"aGk="` is a [`Value::String`] while `b"aGk="` is
//! [`Value::Bytes`].
//!
//! ## Creating Values
//!
//! ```rust
//! use xcdn::Value;
//!
//! let null = Value::Null;
//! let flag = Value::from(true);
//! let count = Value::from(42);
//! let ratio = Value::from(0.5);
//! let text = Value::from("hello");
//! let timeout = Value::duration("PT30S");
//!
//! assert!(count.is_int());
//! assert!(!ratio.is_int());
//! assert_eq!(timeout.as_duration(), Some("PT30S"));
//! ```
//!
//! ## Navigating Containers
//!
//! Arrays and objects expose their nodes through [`Key`]-based accessors.
//! Using the wrong key kind, or any container operation on a scalar, fails
//! with [`Error::TypeMismatch`]:
//!
//! ```rust
//! use xcdn::{Array, Error, Value};
//!
//! let mut array = Array::new();
//! array.append(1);
//! let value = Value::Array(array);
//!
//! assert_eq!(value.get(0).unwrap().value, Value::Int(1));
//! assert!(matches!(value.get("name"), Err(Error::TypeMismatch { .. })));
//! assert!(matches!(Value::Int(1).len(), Err(Error::TypeMismatch { .. })));
//! ```

use crate::access::{IntoKey, Key, MapLike, Members, SeqLike};
use crate::{Array, Error, Node, Object, Result};
use base64::prelude::*;
use bigdecimal::BigDecimal;
use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use uuid::Uuid;

/// A dynamically-typed xCDN value.
///
/// Exactly one variant is active per instance. Container variants own their
/// nodes; there is no way to share a node between two parents.
///
/// # Examples
///
/// ```rust
/// use xcdn::Value;
///
/// let value = Value::Int(3);
/// assert_eq!(value.type_name(), "Int");
/// assert_eq!(value.as_i64(), Some(3));
/// assert_eq!(value.as_f64(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    /// Arbitrary-precision decimal, written `d"..."`.
    Decimal(BigDecimal),
    String(String),
    /// Raw bytes, written as Base64 in `b"..."`.
    Bytes(Vec<u8>),
    /// RFC 3339 instant with its original offset, written `t"..."`.
    DateTime(DateTime<FixedOffset>),
    /// ISO 8601 duration kept in textual form, written `r"..."`.
    Duration(String),
    /// Written `u"..."`.
    Uuid(Uuid),
    Array(Array),
    Object(Object),
}

impl Value {
    /// Creates a [`Value::Duration`] from its ISO 8601 text (e.g. `PT30S`).
    ///
    /// The text is stored as given; it is validated when parsed from or
    /// written to xCDN text.
    #[must_use]
    pub fn duration(text: impl Into<String>) -> Self {
        Value::Duration(text.into())
    }

    /// Returns the variant name, as used in error messages.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "Null",
            Value::Bool(_) => "Bool",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
            Value::Decimal(_) => "Decimal",
            Value::String(_) => "String",
            Value::Bytes(_) => "Bytes",
            Value::DateTime(_) => "DateTime",
            Value::Duration(_) => "Duration",
            Value::Uuid(_) => "Uuid",
            Value::Array(_) => "Array",
            Value::Object(_) => "Object",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    #[inline]
    #[must_use]
    pub const fn is_bool(&self) -> bool {
        matches!(self, Value::Bool(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_int(&self) -> bool {
        matches!(self, Value::Int(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_float(&self) -> bool {
        matches!(self, Value::Float(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_decimal(&self) -> bool {
        matches!(self, Value::Decimal(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_string(&self) -> bool {
        matches!(self, Value::String(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_bytes(&self) -> bool {
        matches!(self, Value::Bytes(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_datetime(&self) -> bool {
        matches!(self, Value::DateTime(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_duration(&self) -> bool {
        matches!(self, Value::Duration(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_uuid(&self) -> bool {
        matches!(self, Value::Uuid(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_array(&self) -> bool {
        matches!(self, Value::Array(_))
    }

    #[inline]
    #[must_use]
    pub const fn is_object(&self) -> bool {
        matches!(self, Value::Object(_))
    }

    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the payload of an [`Value::Int`]; other numeric kinds give `None`.
    #[inline]
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the payload of a [`Value::Float`]; integers are not widened.
    #[inline]
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_decimal(&self) -> Option<&BigDecimal> {
        match self {
            Value::Decimal(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_datetime(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            Value::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_duration(&self) -> Option<&str> {
        match self {
            Value::Duration(d) => Some(d),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_uuid(&self) -> Option<&Uuid> {
        match self {
            Value::Uuid(u) => Some(u),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    pub fn as_array_mut(&mut self) -> Option<&mut Array> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    #[inline]
    pub fn as_object_mut(&mut self) -> Option<&mut Object> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Map-like view of this value; `Some` only for [`Value::Object`].
    #[must_use]
    pub fn as_map_like(&self) -> Option<&dyn MapLike> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    pub fn as_map_like_mut(&mut self) -> Option<&mut dyn MapLike> {
        match self {
            Value::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// Sequence-like view of this value; `Some` only for [`Value::Array`].
    #[must_use]
    pub fn as_seq_like(&self) -> Option<&dyn SeqLike> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_seq_like_mut(&mut self) -> Option<&mut dyn SeqLike> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns the node at a position (arrays) or under a name (objects).
    ///
    /// # Errors
    ///
    /// [`Error::TypeMismatch`] when the key kind does not match the container
    /// kind or the value is a scalar; [`Error::IndexOutOfRange`] or
    /// [`Error::KeyNotFound`] when the member is missing.
    pub fn get<'k>(&self, key: impl IntoKey<'k>) -> Result<&Node> {
        match (self, key.into_key()) {
            (Value::Array(arr), Key::Index(i)) => arr.get(i),
            (Value::Object(obj), Key::Name(name)) => obj.get(name),
            (other, key) => Err(other.key_mismatch(key)),
        }
    }

    pub fn get_mut<'k>(&mut self, key: impl IntoKey<'k>) -> Result<&mut Node> {
        match (self, key.into_key()) {
            (Value::Array(arr), Key::Index(i)) => arr.get_mut(i),
            (Value::Object(obj), Key::Name(name)) => obj.get_mut(name),
            (other, key) => Err(other.key_mismatch(key)),
        }
    }

    /// Replaces an array slot or inserts/replaces an object entry.
    pub fn set<'k>(&mut self, key: impl IntoKey<'k>, value: impl Into<Node>) -> Result<()> {
        match (self, key.into_key()) {
            (Value::Array(arr), Key::Index(i)) => arr.set(i, value).map(drop),
            (Value::Object(obj), Key::Name(name)) => {
                obj.set(name, value);
                Ok(())
            }
            (other, key) => Err(other.key_mismatch(key)),
        }
    }

    /// Membership test: a position within bounds, or a present key.
    pub fn contains_key<'k>(&self, key: impl IntoKey<'k>) -> Result<bool> {
        match (self, key.into_key()) {
            (Value::Array(arr), Key::Index(i)) => Ok(i < arr.len()),
            (Value::Object(obj), Key::Name(name)) => Ok(obj.contains(name)),
            (other, key) => Err(other.key_mismatch(key)),
        }
    }

    /// Number of members of an array or object.
    pub fn len(&self) -> Result<usize> {
        match self {
            Value::Array(arr) => Ok(arr.len()),
            Value::Object(obj) => Ok(obj.len()),
            other => Err(Error::type_mismatch("take the length", other.type_name())),
        }
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.len().map(|len| len == 0)
    }

    /// Iterates the members of an array or object; see [`Members`].
    pub fn iter(&self) -> Result<Members<'_>> {
        match self {
            Value::Array(arr) => Ok(Members::Array(arr.iter().enumerate())),
            Value::Object(obj) => Ok(Members::Object(obj.items())),
            other => Err(Error::type_mismatch("iterate", other.type_name())),
        }
    }

    fn key_mismatch(&self, key: Key<'_>) -> Error {
        let operation = match key {
            Key::Index(_) => "index by position",
            Key::Name(_) => "index by key",
        };
        Error::type_mismatch(operation, self.type_name())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(fl) => write!(f, "{:?}", fl),
            Value::Decimal(d) => write!(f, "{}", d),
            Value::String(s) => write!(f, "{}", s),
            Value::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Value::DateTime(dt) => write!(f, "{}", dt.to_rfc3339()),
            Value::Duration(d) => write!(f, "{}", d),
            Value::Uuid(u) => write!(f, "{}", u.hyphenated()),
            Value::Array(arr) => write!(f, "[{} items]", arr.len()),
            Value::Object(obj) => write!(f, "{{{} entries}}", obj.len()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Decimal(d) => serializer.collect_str(d),
            Value::String(s) => serializer.serialize_str(s),
            Value::Bytes(b) => {
                if serializer.is_human_readable() {
                    serializer.serialize_str(&BASE64_STANDARD.encode(b))
                } else {
                    serializer.serialize_bytes(b)
                }
            }
            Value::DateTime(dt) => {
                serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
            }
            Value::Duration(d) => serializer.serialize_str(d),
            Value::Uuid(u) => serializer.collect_str(&u.hyphenated()),
            Value::Array(arr) => {
                use serde::ser::SerializeSeq;
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for node in arr {
                    seq.serialize_element(node)?;
                }
                seq.end()
            }
            Value::Object(obj) => {
                use serde::ser::SerializeMap;
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, node) in obj {
                    map.serialize_entry(k, node)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{self, Visitor};

        struct ValueVisitor;

        impl<'de> Visitor<'de> for ValueVisitor {
            type Value = Value;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("any valid xCDN value")
            }

            fn visit_bool<E>(self, value: bool) -> std::result::Result<Value, E> {
                Ok(Value::Bool(value))
            }

            fn visit_i64<E>(self, value: i64) -> std::result::Result<Value, E> {
                Ok(Value::Int(value))
            }

            fn visit_u64<E>(self, value: u64) -> std::result::Result<Value, E> {
                match i64::try_from(value) {
                    Ok(i) => Ok(Value::Int(i)),
                    Err(_) => Ok(Value::Decimal(BigDecimal::from(value))),
                }
            }

            fn visit_f64<E>(self, value: f64) -> std::result::Result<Value, E> {
                Ok(Value::Float(value))
            }

            fn visit_str<E>(self, value: &str) -> std::result::Result<Value, E> {
                Ok(Value::String(value.to_string()))
            }

            fn visit_string<E>(self, value: String) -> std::result::Result<Value, E> {
                Ok(Value::String(value))
            }

            fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Value, E> {
                Ok(Value::Bytes(value.to_vec()))
            }

            fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<Value, E> {
                Ok(Value::Bytes(value))
            }

            fn visit_unit<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_none<E>(self) -> std::result::Result<Value, E> {
                Ok(Value::Null)
            }

            fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                Deserialize::deserialize(deserializer)
            }

            fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
            where
                A: de::SeqAccess<'de>,
            {
                let mut array = Array::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(node) = seq.next_element::<Node>()? {
                    array.append(node);
                }
                Ok(Value::Array(array))
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
            where
                A: de::MapAccess<'de>,
            {
                let mut object = Object::new();
                while let Some((key, node)) = map.next_entry::<String, Node>()? {
                    object.set(key, node);
                }
                Ok(Value::Object(object))
            }
        }

        deserializer.deserialize_any(ValueVisitor)
    }
}

// Comparisons against raw payloads, e.g. `node.value == "demo"`
impl PartialEq<bool> for Value {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}

impl PartialEq<i64> for Value {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<i32> for Value {
    fn eq(&self, other: &i32) -> bool {
        self.as_i64() == Some(i64::from(*other))
    }
}

impl PartialEq<f64> for Value {
    fn eq(&self, other: &f64) -> bool {
        self.as_f64() == Some(*other)
    }
}

impl PartialEq<str> for Value {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == Some(other)
    }
}

impl PartialEq<&str> for Value {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

// From implementations for creating Value from payloads
impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i8> for Value {
    fn from(value: i8) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i16> for Value {
    fn from(value: i16) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u8> for Value {
    fn from(value: u8) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u16> for Value {
    fn from(value: u16) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<f32> for Value {
    fn from(value: f32) -> Self {
        Value::Float(f64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<BigDecimal> for Value {
    fn from(value: BigDecimal) -> Self {
        Value::Decimal(value)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<&[u8]> for Value {
    fn from(value: &[u8]) -> Self {
        Value::Bytes(value.to_vec())
    }
}

impl From<DateTime<FixedOffset>> for Value {
    fn from(value: DateTime<FixedOffset>) -> Self {
        Value::DateTime(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value.into())
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Value::Array(value)
    }
}

impl From<Vec<Node>> for Value {
    fn from(value: Vec<Node>) -> Self {
        Value::Array(Array::from(value))
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Value::Object(value)
    }
}
